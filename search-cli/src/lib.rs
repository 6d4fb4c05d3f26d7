//! # Search CLI
//!
//! Runs one phrase search against a search cluster and reports the result.
//!
//! This crate provides the configuration, dependency wiring and output
//! formatting behind the `search-cli` binary.

pub mod config;
pub mod output;

pub use config::{Dependencies, Settings};

use thiserror::Error;

/// Errors that can occur while configuring or running a search.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The query could not be built.
    #[error("Query error: {0}")]
    QueryError(#[from] search_client::QueryError),

    /// The search failed.
    #[error("Search error: {0}")]
    SearchError(#[from] search_client::SearchError),

    /// The result could not be written.
    #[error("Output error: {0}")]
    OutputError(#[from] serde_json::Error),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
