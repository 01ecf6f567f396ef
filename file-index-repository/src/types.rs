//! Response types returned by search index providers.

use serde_json::Value;

/// A single hit returned by the search engine.
///
/// `source` is the stored document exactly as the engine returned it; it is
/// deserialized into a typed document by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RawHit {
    /// The engine-side document ID.
    pub id: String,
    /// The stored document body.
    pub source: Value,
}

/// Raw result of a search query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSearchResponse {
    /// Hits on the requested page.
    pub hits: Vec<RawHit>,
    /// Total number of matching documents as reported by the engine.
    pub total: u64,
}

impl RawSearchResponse {
    /// Create an empty response.
    pub fn empty() -> Self {
        Self::default()
    }
}
