//! Result rendering.

use serde_json::{json, Value};

use search_client::SearchResult;

use crate::AppError;

/// Render a result as the JSON document printed on stdout.
pub fn render(result: &SearchResult) -> Value {
    let meta = result.meta_data();
    json!({
        "status": result.status().map(|status| status.as_u16()),
        "should_retry": result.should_retry(),
        "diagnostic": result.diagnostic(),
        "meta": {
            "total_hits": meta.total_hits,
            "max_score": meta.max_score,
            "took_ms": meta.took.as_micros() as f64 / 1000.0,
            "partial": meta.is_partial(),
            "errors": meta.errors,
        },
        "hits": result.hits(),
    })
}

/// Render a result as pretty-printed JSON.
pub fn to_pretty_string(result: &SearchResult) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(&render(result))?)
}
