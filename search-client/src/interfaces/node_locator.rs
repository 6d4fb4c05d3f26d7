//! Node selection trait.

use std::sync::Arc;

use crate::errors::SearchError;
use crate::node::{SearchNode, ServiceType};

/// Picks a node that offers a given service.
///
/// Implementations must be `Send + Sync`; a single locator is shared by every
/// concurrent search.
pub trait NodeLocator: Send + Sync {
    /// Pick a node offering `service`.
    ///
    /// # Returns
    ///
    /// * `Ok(node)` - A node running the service
    /// * `Err(SearchError::NodeUnavailable)` - If no node currently offers it
    fn pick_node(&self, service: ServiceType) -> Result<Arc<SearchNode>, SearchError>;
}
