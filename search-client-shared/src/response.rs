//! Response payload types.
//!
//! These mirror the search service's JSON result document. Every field has a
//! default so a sparse document still maps, and `null` counts as absent.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The mapped body of a search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPayload {
    /// Per-partition execution status.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: SearchStatus,
    /// Matching documents, best first.
    #[serde(default, deserialize_with = "null_as_default")]
    pub hits: Vec<SearchHit>,
    /// Total number of matching documents.
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_hits: u64,
    /// Highest score among the hits.
    #[serde(default, deserialize_with = "null_as_default")]
    pub max_score: f64,
    /// Server-side execution time in nanoseconds.
    #[serde(default, deserialize_with = "null_as_default")]
    pub took: u64,
}

impl SearchPayload {
    /// An empty payload, used when the service returned no result document.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Request-level metadata.
    pub fn meta_data(&self) -> SearchMetaData {
        SearchMetaData {
            total_partitions: self.status.total,
            failed_partitions: self.status.failed,
            successful_partitions: self.status.successful,
            errors: self.status.errors.clone(),
            total_hits: self.total_hits,
            max_score: self.max_score,
            took: Duration::from_nanos(self.took),
        }
    }
}

/// Partition status block of a search response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStatus {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub failed: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub successful: u64,
    /// Errors keyed by partition. Arrays of messages are keyed by position.
    #[serde(default, deserialize_with = "deserialize_errors")]
    pub errors: BTreeMap<String, String>,
}

/// A single matching document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default, deserialize_with = "null_as_default")]
    pub index: String,
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub score: f64,
    /// Stored fields requested via the `fields` option.
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: BTreeMap<String, Value>,
    /// Highlighted fragments keyed by field.
    #[serde(default, deserialize_with = "null_as_default")]
    pub fragments: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Value>,
}

/// Flattened request metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchMetaData {
    pub total_partitions: u64,
    pub failed_partitions: u64,
    pub successful_partitions: u64,
    pub errors: BTreeMap<String, String>,
    pub total_hits: u64,
    pub max_score: f64,
    pub took: Duration,
}

impl SearchMetaData {
    /// Whether some partitions failed while others answered.
    pub fn is_partial(&self) -> bool {
        self.failed_partitions > 0
    }
}

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawErrors {
    Map(BTreeMap<String, String>),
    List(Vec<String>),
}

fn deserialize_errors<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawErrors>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawErrors::Map(map)) => map,
        Some(RawErrors::List(list)) => list
            .into_iter()
            .enumerate()
            .map(|(i, msg)| (i.to_string(), msg))
            .collect(),
        None => BTreeMap::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_document() {
        let doc = json!({
            "status": {"total": 6, "failed": 0, "successful": 6},
            "request": {"query": {"match_phrase": "nice view"}},
            "hits": [
                {
                    "index": "hotels_6f1d",
                    "id": "hotel_10025",
                    "score": 0.87,
                    "fields": {"name": "Medway Youth Hostel"},
                    "fragments": {"description": ["a <mark>nice view</mark>"]}
                }
            ],
            "total_hits": 1,
            "max_score": 0.87,
            "took": 1_500_000,
            "facets": {}
        });

        let payload: SearchPayload = serde_json::from_value(doc).unwrap();

        assert_eq!(payload.hits.len(), 1);
        assert_eq!(payload.hits[0].id, "hotel_10025");
        assert_eq!(payload.hits[0].fields["name"], "Medway Youth Hostel");
        assert_eq!(payload.hits[0].fragments["description"].len(), 1);
        assert!(payload.hits[0].explanation.is_none());

        let meta = payload.meta_data();
        assert_eq!(meta.total_hits, 1);
        assert_eq!(meta.successful_partitions, 6);
        assert_eq!(meta.took, Duration::from_micros(1500));
        assert!(!meta.is_partial());
    }

    #[test]
    fn test_sparse_document() {
        let payload: SearchPayload = serde_json::from_value(json!({})).unwrap();
        assert_eq!(payload, SearchPayload::empty());
    }

    #[test]
    fn test_null_fields_map_to_defaults() {
        let doc = r#"{
            "status": {"total": 2, "failed": 2, "successful": 0, "errors": {"pindex_1": "index missing"}},
            "hits": null,
            "total_hits": 0,
            "max_score": null,
            "took": 120000,
            "facets": null
        }"#;

        let payload: SearchPayload = serde_json::from_str(doc).unwrap();

        assert!(payload.hits.is_empty());
        assert_eq!(payload.max_score, 0.0);
        let meta = payload.meta_data();
        assert!(meta.is_partial());
        assert_eq!(meta.errors["pindex_1"], "index missing");
    }

    #[test]
    fn test_hit_with_null_fields() {
        let hit: SearchHit = serde_json::from_value(json!({
            "index": "hotels_1",
            "id": "hotel_3",
            "score": 0.2,
            "fields": null,
            "fragments": null
        }))
        .unwrap();

        assert_eq!(hit.id, "hotel_3");
        assert!(hit.fields.is_empty());
        assert!(hit.fragments.is_empty());
    }

    #[test]
    fn test_partial_failure_errors_as_map() {
        let doc = json!({
            "status": {
                "total": 2,
                "failed": 1,
                "successful": 1,
                "errors": {"pindex_b": "context deadline exceeded"}
            },
            "hits": []
        });

        let meta = serde_json::from_value::<SearchPayload>(doc).unwrap().meta_data();

        assert!(meta.is_partial());
        assert_eq!(meta.errors["pindex_b"], "context deadline exceeded");
    }

    #[test]
    fn test_errors_as_list() {
        let doc = json!({
            "status": {"failed": 2, "errors": ["first", "second"]}
        });

        let payload: SearchPayload = serde_json::from_value(doc).unwrap();

        assert_eq!(payload.status.errors.len(), 2);
        assert_eq!(payload.status.errors["1"], "second");
    }

    #[test]
    fn test_hit_without_id_is_rejected() {
        let doc = json!({"hits": [{"score": 1.0}]});
        assert!(serde_json::from_value::<SearchPayload>(doc).is_err());
    }
}
