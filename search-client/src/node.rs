//! Cluster nodes and static node selection.

use std::fmt;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;
use url::Url;

use crate::errors::SearchError;
use crate::interfaces::NodeLocator;

/// Services a cluster node can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceType {
    KeyValue,
    Query,
    Search,
    Analytics,
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::KeyValue => "kv",
            Self::Query => "query",
            Self::Search => "search",
            Self::Analytics => "analytics",
        };
        f.write_str(name)
    }
}

/// A service node and its liveness marker.
///
/// The marker is the time of the last completed search against the node, in
/// milliseconds since the epoch. It only moves forward; concurrent writers
/// race harmlessly because the value is advisory.
#[derive(Debug)]
pub struct SearchNode {
    search_uri: Url,
    services: Vec<ServiceType>,
    last_used_ms: AtomicI64,
}

impl SearchNode {
    /// Create a node whose search service is rooted at `search_uri`.
    ///
    /// # Returns
    ///
    /// * `Ok(SearchNode)` - A node that has never been used
    /// * `Err(SearchError::Configuration)` - If the URI is invalid or cannot be a base
    pub fn new(search_uri: &str, services: Vec<ServiceType>) -> Result<Self, SearchError> {
        let search_uri = Url::parse(search_uri)
            .map_err(|e| SearchError::configuration(format!("Invalid node URI {}: {}", search_uri, e)))?;
        if search_uri.cannot_be_a_base() {
            return Err(SearchError::configuration(format!(
                "Node URI cannot be a base: {}",
                search_uri
            )));
        }

        Ok(Self {
            search_uri,
            services,
            last_used_ms: AtomicI64::new(0),
        })
    }

    /// Create a node that only runs the search service.
    pub fn search(search_uri: &str) -> Result<Self, SearchError> {
        Self::new(search_uri, vec![ServiceType::Search])
    }

    /// Base URI of the node's search service.
    pub fn search_uri(&self) -> &Url {
        &self.search_uri
    }

    /// Whether the node runs `service`.
    pub fn offers(&self, service: ServiceType) -> bool {
        self.services.contains(&service)
    }

    /// Build `<search base>/api/index/<index>/query`.
    ///
    /// The index name is appended as a single, percent-encoded path segment.
    pub fn query_uri(&self, index: &str) -> Result<Url, SearchError> {
        let mut uri = self.search_uri.clone();
        uri.path_segments_mut()
            .map_err(|_| {
                SearchError::configuration(format!(
                    "Node URI cannot be a base: {}",
                    self.search_uri
                ))
            })?
            .pop_if_empty()
            .extend(["api", "index", index, "query"]);
        Ok(uri)
    }

    /// Record that a search against this node just completed.
    pub fn mark_used(&self) {
        self.last_used_ms
            .fetch_max(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    /// When the node was last used, if ever.
    pub fn last_used(&self) -> Option<DateTime<Utc>> {
        match self.last_used_ms.load(Ordering::Relaxed) {
            0 => None,
            ms => Utc.timestamp_millis_opt(ms).single(),
        }
    }
}

/// Selects nodes from a fixed list, round-robin.
pub struct StaticNodeLocator {
    nodes: Vec<Arc<SearchNode>>,
    cursor: AtomicUsize,
}

impl StaticNodeLocator {
    /// Create a locator over `nodes`.
    pub fn new(nodes: Vec<SearchNode>) -> Self {
        Self {
            nodes: nodes.into_iter().map(Arc::new).collect(),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Create a locator of search-only nodes from base URIs.
    pub fn from_uris<I, S>(uris: I) -> Result<Self, SearchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let nodes = uris
            .into_iter()
            .map(|uri| SearchNode::search(uri.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(nodes))
    }

    /// All known nodes.
    pub fn nodes(&self) -> &[Arc<SearchNode>] {
        &self.nodes
    }
}

impl NodeLocator for StaticNodeLocator {
    fn pick_node(&self, service: ServiceType) -> Result<Arc<SearchNode>, SearchError> {
        let candidates: Vec<&Arc<SearchNode>> =
            self.nodes.iter().filter(|node| node.offers(service)).collect();

        if candidates.is_empty() {
            return Err(SearchError::node_unavailable(format!(
                "no node offers the {} service",
                service
            )));
        }

        let slot = self.cursor.fetch_add(1, Ordering::Relaxed) % candidates.len();
        let node = Arc::clone(candidates[slot]);
        debug!(service = %service, node = %node.search_uri(), "Picked node");
        Ok(node)
    }
}
