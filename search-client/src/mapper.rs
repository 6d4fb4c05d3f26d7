//! JSON response mapping.

use search_client_shared::SearchPayload;

use crate::errors::SearchError;
use crate::interfaces::ResultMapper;

/// Maps the service's JSON result document with `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonResultMapper;

impl ResultMapper for JsonResultMapper {
    fn map(&self, body: &[u8]) -> Result<SearchPayload, SearchError> {
        serde_json::from_slice(body)
            .map_err(|e| SearchError::mapping(format!("Failed to parse search response: {}", e)))
    }
}
