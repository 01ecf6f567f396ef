//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchIndexError;
use crate::types::RawSearchResponse;

/// Abstracts the underlying search index implementation (OpenSearch, Elasticsearch, etc.).
///
/// Implementations are injected into the projector and the reader to enable
/// dependency injection and easy testing with mock implementations.
///
/// All methods return `Result<T, SearchIndexError>` for consistent error handling across
/// different backend implementations.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Index a single document under `id`.
    ///
    /// If a document with the same ID already exists, it will be replaced.
    ///
    /// # Arguments
    ///
    /// * `index` - The name of the target index
    /// * `id` - The document ID
    /// * `document` - The JSON document body
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the document was indexed successfully
    /// * `Err(SearchIndexError)` - If indexing fails
    async fn index(&self, index: &str, id: &str, document: &Value) -> Result<(), SearchIndexError>;

    /// Execute a query written in the engine's native query language.
    ///
    /// The query is passed through uninterpreted.
    ///
    /// # Returns
    ///
    /// * `Ok(RawSearchResponse)` - The hits on the requested page and the total hit count
    /// * `Err(SearchIndexError)` - If the query fails or the response cannot be parsed
    async fn search(&self, index: &str, query: &Value) -> Result<RawSearchResponse, SearchIndexError>;

    /// Ensure the index exists, creating it with the file mapping if absent.
    ///
    /// An existing index is left untouched.
    async fn ensure_index_exists(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Check if the search engine is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the search engine is healthy
    /// * `Ok(false)` - If the search engine is unhealthy
    /// * `Err(SearchIndexError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchIndexError>;
}
