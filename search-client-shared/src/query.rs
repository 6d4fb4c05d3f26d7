//! Phrase-match query clause.
//!
//! A [`QueryClause`] is one atomic search condition. It is validated when it
//! is built, so a clause that exists is always exportable.

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::error::QueryError;

/// A phrase-match condition with an optional field restriction and boost.
///
/// # Example
///
/// ```
/// use search_client_shared::QueryClause;
///
/// let clause = QueryClause::match_phrase("quick brown fox")?
///     .with_field("description")
///     .with_boost(1.5)?;
///
/// assert_eq!(
///     serde_json::to_string(&clause.export()).unwrap(),
///     r#"{"match_phrase":"quick brown fox","field":"description","boost":1.5}"#
/// );
/// # Ok::<(), search_client_shared::QueryError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QueryClause {
    match_text: String,
    field: Option<String>,
    boost: Option<f64>,
}

impl QueryClause {
    /// Create a phrase-match clause.
    ///
    /// Fails with [`QueryError::InvalidArgument`] if `text` is empty.
    pub fn match_phrase(text: impl Into<String>) -> Result<Self, QueryError> {
        let match_text = text.into();
        if match_text.is_empty() {
            return Err(QueryError::invalid_argument("match_phrase text is required"));
        }

        Ok(Self {
            match_text,
            field: None,
            boost: None,
        })
    }

    /// Restrict the match to a single field.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Set the boost factor.
    ///
    /// Fails with [`QueryError::InvalidArgument`] if `factor` is negative or NaN.
    pub fn with_boost(mut self, factor: f64) -> Result<Self, QueryError> {
        self.try_set_boost(factor)?;
        Ok(self)
    }

    /// Set the boost factor in place. The boost is left as it was on error.
    pub fn try_set_boost(&mut self, factor: f64) -> Result<(), QueryError> {
        if factor.is_nan() || factor < 0.0 {
            return Err(QueryError::invalid_argument(format!(
                "boost must be >= 0, got {}",
                factor
            )));
        }
        self.boost = Some(factor);
        Ok(())
    }

    /// The phrase to match.
    pub fn match_text(&self) -> &str {
        &self.match_text
    }

    /// The field restriction, if any.
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// The boost factor, if any.
    pub fn boost(&self) -> Option<f64> {
        self.boost
    }

    /// Export the clause as its wire-format JSON object.
    ///
    /// Keys are emitted as `match_phrase`, `field`, `boost`; unset options are
    /// left out rather than written as `null`.
    pub fn export(&self) -> Value {
        let mut doc = Map::new();
        doc.insert("match_phrase".to_string(), json!(self.match_text));
        if let Some(ref field) = self.field {
            doc.insert("field".to_string(), json!(field));
        }
        if let Some(boost) = self.boost {
            doc.insert("boost".to_string(), json!(boost));
        }
        Value::Object(doc)
    }
}

impl Serialize for QueryClause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.export().serialize(serializer)
    }
}
