//! Interface definitions for the executor's collaborators.
//!
//! Node selection, the HTTP transport and response mapping are injected as
//! trait objects so each can be swapped (or mocked in tests) independently.

mod node_locator;
mod result_mapper;
mod search_transport;

pub use node_locator::NodeLocator;
pub use result_mapper::ResultMapper;
pub use search_transport::{SearchTransport, TransportRequest, TransportResponse};
