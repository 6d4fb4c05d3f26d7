//! Search request document.

use std::time::Duration;

use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::error::QueryError;
use crate::query::QueryClause;

/// Request-level options.
///
/// Every option is optional; options that were never set are left out of the
/// request document so the service applies its own defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    /// Maximum number of hits to return (`size`).
    pub limit: Option<u32>,
    /// Number of hits to skip (`from`).
    pub skip: Option<u32>,
    /// Ask the service to explain each hit's score.
    pub explain: Option<bool>,
    /// Stored fields to return with each hit.
    pub fields: Vec<String>,
    /// Server-side timeout, also used as the client-side deadline.
    pub timeout: Option<Duration>,
}

/// A search against one index.
///
/// Holds one or more clauses plus request options. A request is built and
/// owned by the caller, then handed by reference to the executor for a single
/// attempt.
///
/// # Example
///
/// ```
/// use search_client_shared::{QueryClause, SearchRequest};
///
/// let request = SearchRequest::new("travel-sample-index", QueryClause::match_phrase("nice view")?)?
///     .with_limit(10)
///     .with_skip(20);
///
/// let doc = request.to_json();
/// assert_eq!(doc["query"]["match_phrase"], "nice view");
/// assert_eq!(doc["size"], 10);
/// # Ok::<(), search_client_shared::QueryError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    index: String,
    clauses: Vec<QueryClause>,
    options: SearchOptions,
    client_context_id: Uuid,
}

impl SearchRequest {
    /// Create a request against `index` with a single clause.
    ///
    /// Fails with [`QueryError::InvalidArgument`] if `index` is empty.
    pub fn new(index: impl Into<String>, clause: QueryClause) -> Result<Self, QueryError> {
        let index = index.into();
        if index.is_empty() {
            return Err(QueryError::invalid_argument("index name is required"));
        }

        Ok(Self {
            index,
            clauses: vec![clause],
            options: SearchOptions::default(),
            client_context_id: Uuid::new_v4(),
        })
    }

    /// Add a clause that must also match.
    pub fn and_clause(mut self, clause: QueryClause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// Replace all options at once.
    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the maximum number of hits.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.options.limit = Some(limit);
        self
    }

    /// Set the number of hits to skip.
    pub fn with_skip(mut self, skip: u32) -> Self {
        self.options.skip = Some(skip);
        self
    }

    /// Request score explanations.
    pub fn with_explain(mut self, explain: bool) -> Self {
        self.options.explain = Some(explain);
        self
    }

    /// Set the stored fields to return.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    /// Override the generated client context id.
    pub fn with_client_context_id(mut self, id: Uuid) -> Self {
        self.client_context_id = id;
        self
    }

    /// The target index name.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// The clauses, in the order they were added.
    pub fn clauses(&self) -> &[QueryClause] {
        &self.clauses
    }

    /// The request options.
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// The request timeout, if one was set.
    pub fn timeout(&self) -> Option<Duration> {
        self.options.timeout
    }

    /// Identifier sent with the request for correlating client and server logs.
    pub fn client_context_id(&self) -> Uuid {
        self.client_context_id
    }

    /// The query part of the request document.
    ///
    /// A single clause is the query itself; several clauses are wrapped in a
    /// `conjuncts` query so all of them must match.
    fn query_json(&self) -> Value {
        match self.clauses.as_slice() {
            [clause] => clause.export(),
            clauses => json!({
                "conjuncts": clauses.iter().map(QueryClause::export).collect::<Vec<_>>()
            }),
        }
    }

    /// Build the full request document.
    pub fn to_json(&self) -> Value {
        let mut ctl = Map::new();
        if let Some(timeout) = self.options.timeout {
            ctl.insert("timeout".to_string(), json!(timeout.as_millis() as u64));
        }
        ctl.insert(
            "client_context_id".to_string(),
            json!(self.client_context_id.to_string()),
        );

        let mut doc = Map::new();
        doc.insert("ctl".to_string(), Value::Object(ctl));
        doc.insert("query".to_string(), self.query_json());
        if let Some(limit) = self.options.limit {
            doc.insert("size".to_string(), json!(limit));
        }
        if let Some(skip) = self.options.skip {
            doc.insert("from".to_string(), json!(skip));
        }
        if let Some(explain) = self.options.explain {
            doc.insert("explain".to_string(), json!(explain));
        }
        if !self.options.fields.is_empty() {
            doc.insert("fields".to_string(), json!(self.options.fields));
        }
        Value::Object(doc)
    }

    /// Serialize the request document to a UTF-8 JSON body.
    pub fn to_body(&self) -> Result<Vec<u8>, QueryError> {
        serde_json::to_vec(&self.to_json()).map_err(|e| QueryError::serialization(e.to_string()))
    }
}
