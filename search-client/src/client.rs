//! Search client implementation.
//!
//! This module provides the main entry point application code uses to run
//! searches. It wraps a [`SearchExecutor`] and adds an opt-in retry loop that
//! honours the difference between retry-safe and ambiguous failures.

use std::time::Duration;

use search_client_shared::SearchRequest;
use tracing::{debug, info, instrument, warn};

use crate::cancellation::CancellationSignal;
use crate::config::RetryConfig;
use crate::errors::SearchError;
use crate::executor::SearchExecutor;
use crate::result::SearchResult;

/// The main client for running searches.
pub struct SearchClient {
    executor: SearchExecutor,
    config: RetryConfig,
}

impl SearchClient {
    /// Create a new SearchClient with the default retry policy.
    pub fn new(executor: SearchExecutor) -> Self {
        Self {
            executor,
            config: RetryConfig::default(),
        }
    }

    /// Create a new SearchClient with a custom retry policy.
    pub fn with_config(executor: SearchExecutor, config: RetryConfig) -> Self {
        Self { executor, config }
    }

    /// The underlying executor.
    pub fn executor(&self) -> &SearchExecutor {
        &self.executor
    }

    /// Run a single search attempt.
    ///
    /// Retry-worthy results are returned as they are; the caller decides
    /// whether to resend.
    pub async fn query(
        &self,
        request: &SearchRequest,
        cancel: &CancellationSignal,
    ) -> Result<SearchResult, SearchError> {
        self.executor.execute(request, cancel).await
    }

    /// Run a search, resending with exponential backoff while the outcome
    /// says it is safe and worthwhile to do so.
    ///
    /// Resends happen when the result is retry-worthy or the error is
    /// [`SearchError::RequestCanceled`]. An ambiguous timeout is only resent
    /// when [`RetryConfig::retry_ambiguous`] is set, and never once the
    /// caller's signal has fired. The last result or error is returned when
    /// attempts run out.
    #[instrument(skip(self, request, cancel), fields(index = %request.index()))]
    pub async fn query_with_retry(
        &self,
        request: &SearchRequest,
        cancel: &CancellationSignal,
    ) -> Result<SearchResult, SearchError> {
        let mut delay_ms = self.config.initial_retry_delay_ms;
        let mut attempt = 0;

        loop {
            let outcome = self.executor.execute(request, cancel).await;

            let retryable = match &outcome {
                Ok(result) => result.should_retry(),
                Err(e) => self.is_retryable_error(e, cancel),
            };

            if !retryable || attempt >= self.config.max_retries {
                if attempt > 0 && outcome.as_ref().is_ok_and(|r| !r.should_retry()) {
                    info!(attempt = attempt, "Search succeeded after retry");
                }
                return outcome;
            }

            attempt += 1;
            match &outcome {
                Ok(result) => warn!(
                    attempt = attempt,
                    max_retries = self.config.max_retries,
                    delay_ms = delay_ms,
                    reason = ?result.retry_reason(),
                    "Search result is retry-worthy, resending"
                ),
                Err(e) => warn!(
                    attempt = attempt,
                    max_retries = self.config.max_retries,
                    delay_ms = delay_ms,
                    error = %e,
                    "Search failed, resending"
                ),
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Cancelled while backing off");
                    return outcome;
                }
                _ = tokio::time::sleep(Duration::from_millis(delay_ms)) => {}
            }

            delay_ms = std::cmp::min(delay_ms.saturating_mul(2), self.config.max_retry_delay_ms);
        }
    }

    /// Determine if a failed attempt may be resent.
    fn is_retryable_error(&self, error: &SearchError, cancel: &CancellationSignal) -> bool {
        match error {
            SearchError::RequestCanceled(_) => true,
            SearchError::AmbiguousTimeout(_) => {
                self.config.retry_ambiguous && !cancel.is_cancelled()
            }
            SearchError::NodeUnavailable(_)
            | SearchError::MappingError(_)
            | SearchError::Serialization(_)
            | SearchError::Configuration(_) => false,
        }
    }
}
