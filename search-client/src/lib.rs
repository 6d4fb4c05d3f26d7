//! # Search Client
//!
//! This crate executes full-text search requests against a cluster's search
//! service. It picks a node, POSTs the request to
//! `<node>/api/index/<index>/query`, and turns the outcome into a
//! [`SearchResult`] or a classified [`SearchError`].
//!
//! Node selection, the HTTP transport and response mapping are traits in
//! [`interfaces`], with [`StaticNodeLocator`], [`ReqwestTransport`] and
//! [`JsonResultMapper`] as the concrete implementations.

pub mod cancellation;
pub mod client;
pub mod config;
pub mod errors;
pub mod executor;
pub mod interfaces;
pub mod mapper;
pub mod node;
pub mod result;
pub mod transport;

pub use cancellation::{cancellation, CancellationHandle, CancellationSignal};
pub use client::SearchClient;
pub use config::{RetryConfig, SearchClientConfig};
pub use errors::{SearchError, SearchErrorContext, TransportError};
pub use executor::SearchExecutor;
pub use interfaces::{
    NodeLocator, ResultMapper, SearchTransport, TransportRequest, TransportResponse,
};
pub use mapper::JsonResultMapper;
pub use node::{SearchNode, ServiceType, StaticNodeLocator};
pub use result::{RetryReason, SearchResult};
pub use transport::{ReqwestTransport, JSON_CONTENT_TYPE};

pub use http::StatusCode;
pub use search_client_shared::{
    QueryClause, QueryError, SearchHit, SearchMetaData, SearchOptions, SearchPayload,
    SearchRequest,
};
