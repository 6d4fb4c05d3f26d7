//! Search error types.
//!
//! This module defines the failures a search attempt can resolve to. The two
//! transport classifications are kept apart on purpose: an ambiguous timeout
//! may have been applied by the service, a canceled request was not.

use std::fmt;

use search_client_shared::QueryError;
use thiserror::Error;
use uuid::Uuid;

/// Where a failed request was headed when it failed.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchErrorContext {
    /// Target index name.
    pub index: String,
    /// Full query URI, if a node had been selected.
    pub uri: Option<String>,
    /// Client context id sent with the request.
    pub client_context_id: Uuid,
    /// Underlying failure description.
    pub reason: String,
}

impl fmt::Display for SearchErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "index={}", self.index)?;
        if let Some(ref uri) = self.uri {
            write!(f, ", uri={}", uri)?;
        }
        write!(
            f,
            ", client_context_id={}: {}",
            self.client_context_id, self.reason
        )
    }
}

/// Errors that can occur while executing a search request.
#[derive(Error, Debug)]
pub enum SearchError {
    /// No node currently offers the search service.
    #[error("Node unavailable: {0}")]
    NodeUnavailable(String),

    /// The request was cancelled or timed out in flight; the server-side
    /// outcome is unknown.
    #[error("Ambiguous timeout ({0})")]
    AmbiguousTimeout(Box<SearchErrorContext>),

    /// The request failed at the network level and was not applied.
    #[error("Request canceled ({0})")]
    RequestCanceled(Box<SearchErrorContext>),

    /// The response body could not be mapped into a result.
    #[error("Mapping error: {0}")]
    MappingError(String),

    /// The request could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Client setup failed.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SearchError {
    /// Create a node unavailable error.
    pub fn node_unavailable(msg: impl Into<String>) -> Self {
        Self::NodeUnavailable(msg.into())
    }

    /// Create an ambiguous timeout error.
    pub fn ambiguous_timeout(context: SearchErrorContext) -> Self {
        Self::AmbiguousTimeout(Box::new(context))
    }

    /// Create a request canceled error.
    pub fn request_canceled(context: SearchErrorContext) -> Self {
        Self::RequestCanceled(Box::new(context))
    }

    /// Create a mapping error.
    pub fn mapping(msg: impl Into<String>) -> Self {
        Self::MappingError(msg.into())
    }

    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Whether the request is known not to have been applied, so resending
    /// it cannot duplicate a server-side effect.
    pub fn is_retry_safe(&self) -> bool {
        matches!(self, Self::RequestCanceled(_))
    }

    /// The request context, for the two transport classifications.
    pub fn context(&self) -> Option<&SearchErrorContext> {
        match self {
            Self::AmbiguousTimeout(ctx) | Self::RequestCanceled(ctx) => Some(ctx),
            _ => None,
        }
    }
}

impl From<QueryError> for SearchError {
    fn from(err: QueryError) -> Self {
        Self::Serialization(err.to_string())
    }
}
