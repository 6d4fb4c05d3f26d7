//! Transport error types.
//!
//! A transport reports what went wrong on the wire; the executor decides what
//! that means for the caller.

use thiserror::Error;

/// Errors reported by a [`SearchTransport`](crate::interfaces::SearchTransport).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    /// The connection could not be established.
    #[error("Connect error: {0}")]
    Connect(String),

    /// The transport gave up waiting for the response.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The connection failed after it was established, before a status arrived.
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a status but the body could not be read.
    #[error("Incomplete response: {0}")]
    Incomplete(String),
}

impl TransportError {
    /// Create a connect error.
    pub fn connect(msg: impl Into<String>) -> Self {
        Self::Connect(msg.into())
    }

    /// Create a timeout error.
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Create a network error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an incomplete-response error.
    pub fn incomplete(msg: impl Into<String>) -> Self {
        Self::Incomplete(msg.into())
    }

    /// Whether the transport timed out, as opposed to failing outright.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Whether the request may have reached the service.
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Incomplete(_))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
