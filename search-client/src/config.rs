//! Configuration types for the search client.

use std::time::Duration;

/// Default per-request timeout, applied when a request sets none.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(75);

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for the executor and its HTTP transport.
#[derive(Debug, Clone)]
pub struct SearchClientConfig {
    /// Deadline for a request that does not carry its own timeout.
    pub default_timeout: Duration,
    /// Maximum time to establish a connection to a node.
    pub connect_timeout: Duration,
    /// Idle pooled connections kept per node.
    pub max_idle_connections_per_node: usize,
}

impl Default for SearchClientConfig {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_idle_connections_per_node: 32,
        }
    }
}

impl SearchClientConfig {
    /// Set the default request timeout.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// Retry policy for [`SearchClient::query_with_retry`](crate::SearchClient::query_with_retry).
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of resends after the first attempt.
    pub max_retries: u32,
    /// Initial retry delay in milliseconds.
    pub initial_retry_delay_ms: u64,
    /// Maximum retry delay in milliseconds.
    pub max_retry_delay_ms: u64,
    /// Also resend after an ambiguous timeout.
    ///
    /// Off by default: the first attempt may still be running on the server.
    pub retry_ambiguous: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_retry_delay_ms: 100,
            max_retry_delay_ms: 5000,
            retry_ambiguous: false,
        }
    }
}

impl RetryConfig {
    /// A policy that never resends.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Set the maximum number of resends.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Allow resending after an ambiguous timeout.
    pub fn with_retry_ambiguous(mut self, retry_ambiguous: bool) -> Self {
        self.retry_ambiguous = retry_ambiguous;
        self
    }
}
