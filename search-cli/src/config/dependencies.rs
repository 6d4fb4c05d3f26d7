//! Dependency initialization and wiring for the search CLI.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::Settings;
use crate::AppError;
use search_client::{
    ReqwestTransport, RetryConfig, SearchClient, SearchClientConfig, SearchExecutor,
    StaticNodeLocator,
};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured client ready to run searches.
    pub client: SearchClient,
    /// Node locator, kept for reporting node liveness.
    pub locator: Arc<StaticNodeLocator>,
}

impl Dependencies {
    /// Initialize all dependencies from settings.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AppError)` - If a node URI is invalid or the HTTP client cannot be built
    pub fn new(settings: &Settings) -> Result<Self, AppError> {
        let nodes: Vec<&str> = settings
            .nodes
            .iter()
            .map(|node| node.trim())
            .filter(|node| !node.is_empty())
            .collect();

        if nodes.is_empty() {
            return Err(AppError::config("at least one search node is required"));
        }

        info!(nodes = ?nodes, index = %settings.index, "Initializing dependencies");

        let locator = Arc::new(
            StaticNodeLocator::from_uris(&nodes)
                .map_err(|e| AppError::config(format!("Invalid search node: {}", e)))?,
        );

        let config = SearchClientConfig::default()
            .with_connect_timeout(Duration::from_millis(settings.connect_timeout_ms));

        let transport = ReqwestTransport::new(&config)
            .map_err(|e| AppError::config(format!("Failed to create HTTP transport: {}", e)))?;

        let executor = SearchExecutor::with_config(locator.clone(), Arc::new(transport), config);

        let retry = if settings.retry {
            RetryConfig::default().with_max_retries(settings.max_retries)
        } else {
            RetryConfig::disabled()
        };

        Ok(Self {
            client: SearchClient::with_config(executor, retry),
            locator,
        })
    }
}
