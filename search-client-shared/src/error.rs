//! Query construction error types.

use thiserror::Error;

/// Errors raised while building or serializing a search query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// A required argument was empty or out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The request document could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl QueryError {
    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}
