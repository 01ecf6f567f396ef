//! Document store trait definition.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::DocumentStoreError;

/// The primary store of record.
///
/// Documents are JSON objects grouped in named collections and keyed by a
/// string identity held in the `_id` field.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert exactly one document into `collection`.
    ///
    /// If the document carries an `_id` it is kept; otherwise the store
    /// assigns one. Returns the identity the document was stored under.
    ///
    /// Implementations do not apply their own deadline; callers bound the
    /// round-trip.
    async fn insert_one(&self, collection: &str, document: Value)
        -> Result<String, DocumentStoreError>;

    /// Fetch a document by identity.
    async fn find_one(&self, collection: &str, id: &str)
        -> Result<Option<Value>, DocumentStoreError>;
}
