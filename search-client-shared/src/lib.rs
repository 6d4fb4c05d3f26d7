//! # Search Client Shared
//!
//! Types shared between the search client and its callers: the validated
//! query object model that serializes to the search service's wire format,
//! and the response payload the service's JSON result document maps into.

pub mod error;
pub mod query;
pub mod request;
pub mod response;

pub use error::QueryError;
pub use query::QueryClause;
pub use request::{SearchOptions, SearchRequest};
pub use response::{SearchHit, SearchMetaData, SearchPayload, SearchStatus};
