//! Search results.

use http::StatusCode;
use search_client_shared::{SearchHit, SearchMetaData, SearchPayload};

/// Why a completed response should be resent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryReason {
    NoRetry,
    /// The service is shedding load (HTTP 429).
    SearchTooManyRequests,
}

/// The outcome of one search attempt that reached the service.
///
/// Built by the executor for a single request and stamped with the HTTP
/// status it observed. A non-success status still yields a result; check
/// [`is_success`](Self::is_success) and [`should_retry`](Self::should_retry).
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    payload: SearchPayload,
    status: Option<StatusCode>,
    diagnostic: Option<String>,
}

impl SearchResult {
    /// Wrap a mapped payload.
    pub fn from_payload(payload: SearchPayload) -> Self {
        Self {
            payload,
            status: None,
            diagnostic: None,
        }
    }

    /// A result for a non-success response, carrying its body as text.
    pub fn from_diagnostic(diagnostic: impl Into<String>) -> Self {
        Self {
            payload: SearchPayload::empty(),
            status: None,
            diagnostic: Some(diagnostic.into()),
        }
    }

    pub(crate) fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    /// Stamp `status` on the result.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.set_status(status);
        self
    }

    /// The mapped payload.
    pub fn payload(&self) -> &SearchPayload {
        &self.payload
    }

    /// Matching documents.
    pub fn hits(&self) -> &[SearchHit] {
        &self.payload.hits
    }

    /// Request metadata.
    pub fn meta_data(&self) -> SearchMetaData {
        self.payload.meta_data()
    }

    /// The HTTP status the service answered with.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Whether the service answered with a success status.
    pub fn is_success(&self) -> bool {
        self.status.is_some_and(|status| status.is_success())
    }

    /// Body text of a non-success response. Best effort; the format is not
    /// part of the service contract.
    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    /// Why the request should be resent, if it should.
    pub fn retry_reason(&self) -> RetryReason {
        match self.status {
            Some(StatusCode::TOO_MANY_REQUESTS) => RetryReason::SearchTooManyRequests,
            _ => RetryReason::NoRetry,
        }
    }

    /// Whether the caller should resend the same request.
    pub fn should_retry(&self) -> bool {
        self.retry_reason() != RetryReason::NoRetry
    }

    /// Consume the result, returning its payload.
    pub fn into_payload(self) -> SearchPayload {
        self.payload
    }
}
