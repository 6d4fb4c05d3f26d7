use search_client_shared::SearchPayload;

use crate::errors::SearchError;

/// Maps a successful response body into a payload.
pub trait ResultMapper: Send + Sync {
    /// Map `body`, failing with [`SearchError::MappingError`] if it cannot be parsed.
    fn map(&self, body: &[u8]) -> Result<SearchPayload, SearchError>;
}
