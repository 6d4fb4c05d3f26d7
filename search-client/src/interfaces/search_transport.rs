//! HTTP transport trait definition.
//!
//! This module defines the abstract interface the executor sends requests
//! through, allowing the reqwest implementation to be swapped for a mock.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::StatusCode;
use url::Url;

use crate::errors::TransportError;

/// A single POST to send.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// Absolute target URI.
    pub uri: Url,
    /// Serialized request body.
    pub body: Vec<u8>,
    /// Value of the `Content-Type` header.
    pub content_type: &'static str,
    /// How long the transport may wait for the full response.
    pub timeout: Duration,
}

/// A completed response.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Full response body.
    pub body: Bytes,
}

impl TransportResponse {
    /// Create a response.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Abstract interface for sending search requests over HTTP.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; one transport serves every
/// concurrent request.
///
/// # Error Handling
///
/// Implementations report [`TransportError::Timeout`] when they gave up
/// waiting, [`TransportError::Incomplete`] when a status arrived but the body
/// did not, and [`TransportError::Connect`] or [`TransportError::Network`] for
/// other failures on the wire. Any HTTP status, including error statuses, is
/// a successful send.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Send `request` and read the whole response.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}
