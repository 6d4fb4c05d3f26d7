//! reqwest implementation of the search transport.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, info};

use crate::config::SearchClientConfig;
use crate::errors::{SearchError, TransportError};
use crate::interfaces::{SearchTransport, TransportRequest, TransportResponse};

/// Content type of every search request body.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// HTTP transport backed by a pooled [`reqwest::Client`].
///
/// The client is cheap to share; one transport can serve every concurrent
/// search.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport from client configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(ReqwestTransport)` - A transport with its own connection pool
    /// * `Err(SearchError::Configuration)` - If the HTTP client cannot be built
    pub fn new(config: &SearchClientConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.max_idle_connections_per_node)
            .build()
            .map_err(|e| SearchError::configuration(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            connect_timeout_ms = config.connect_timeout.as_millis() as u64,
            "Created search HTTP transport"
        );

        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SearchTransport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .post(request.uri)
            .header(CONTENT_TYPE, request.content_type)
            .body(request.body)
            .timeout(request.timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::timeout(e.to_string())
            } else {
                TransportError::incomplete(e.to_string())
            }
        })?;

        debug!(status = %status, bytes = body.len(), "Received search response");
        Ok(TransportResponse { status, body })
    }
}
