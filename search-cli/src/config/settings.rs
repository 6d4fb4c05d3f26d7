//! Command-line and environment settings.

use std::time::Duration;

use clap::Parser;
use search_client::{QueryClause, SearchRequest};

use crate::AppError;

/// Default search node.
const DEFAULT_SEARCH_NODES: &str = "http://localhost:8094";

/// Settings for one search run.
///
/// Every flag can also come from the environment (or a `.env` file).
#[derive(Parser, Debug, Clone)]
#[command(name = "search-cli")]
#[command(about = "Run a phrase search against a search cluster", long_about = None)]
pub struct Settings {
    /// Comma-separated search node base URIs
    #[arg(long, env = "SEARCH_NODES", value_delimiter = ',', default_value = DEFAULT_SEARCH_NODES)]
    pub nodes: Vec<String>,

    /// Index to search
    #[arg(long, env = "SEARCH_INDEX")]
    pub index: String,

    /// Phrase to match
    #[arg(long)]
    pub phrase: String,

    /// Restrict the phrase to one field
    #[arg(long)]
    pub field: Option<String>,

    /// Boost factor for the phrase (>= 0)
    #[arg(long)]
    pub boost: Option<f64>,

    /// Additional phrases that must also match
    #[arg(long = "and-phrase")]
    pub and_phrases: Vec<String>,

    /// Maximum number of hits
    #[arg(long)]
    pub limit: Option<u32>,

    /// Number of hits to skip
    #[arg(long)]
    pub skip: Option<u32>,

    /// Stored fields to return with each hit
    #[arg(long = "return-field", value_delimiter = ',')]
    pub return_fields: Vec<String>,

    /// Request timeout in milliseconds
    #[arg(long, env = "SEARCH_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Connect timeout in milliseconds
    #[arg(long, env = "SEARCH_CONNECT_TIMEOUT_MS", default_value = "5000")]
    pub connect_timeout_ms: u64,

    /// Resend retry-worthy results and retry-safe failures
    #[arg(long)]
    pub retry: bool,

    /// Maximum number of resends when --retry is set
    #[arg(long, env = "SEARCH_MAX_RETRIES", default_value = "3")]
    pub max_retries: u32,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,
}

impl Settings {
    /// Build the search request these settings describe.
    pub fn build_request(&self) -> Result<SearchRequest, AppError> {
        let mut clause = QueryClause::match_phrase(&self.phrase)?;
        if let Some(ref field) = self.field {
            clause = clause.with_field(field);
        }
        if let Some(boost) = self.boost {
            clause = clause.with_boost(boost)?;
        }

        let mut request = SearchRequest::new(&self.index, clause)?;
        for phrase in &self.and_phrases {
            request = request.and_clause(QueryClause::match_phrase(phrase)?);
        }
        if let Some(limit) = self.limit {
            request = request.with_limit(limit);
        }
        if let Some(skip) = self.skip {
            request = request.with_skip(skip);
        }
        if !self.return_fields.is_empty() {
            request = request.with_fields(&self.return_fields);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            request = request.with_timeout(Duration::from_millis(timeout_ms));
        }

        Ok(request)
    }
}
