//! Error types for the search client.

mod search_error;
mod transport_error;

pub use search_error::{SearchError, SearchErrorContext};
pub use transport_error::TransportError;
