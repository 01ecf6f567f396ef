//! Document store error types.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while writing to or reading from the primary store.
#[derive(Debug, Clone, Error)]
pub enum DocumentStoreError {
    /// Failed to connect to the store or prepare its schema.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The document is not a JSON object or carries a malformed `_id`.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// A document with this identity already exists in the collection.
    #[error("Duplicate identity {id} in collection {collection}")]
    DuplicateId { collection: String, id: String },

    /// The store rejected or failed the operation.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// The store round-trip exceeded its deadline.
    #[error("Store call timed out after {0:?}")]
    Timeout(Duration),
}

impl DocumentStoreError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an invalid document error.
    pub fn invalid_document(msg: impl Into<String>) -> Self {
        Self::InvalidDocument(msg.into())
    }

    /// Create a database error.
    pub fn database(msg: impl Into<String>) -> Self {
        Self::DatabaseError(msg.into())
    }

    /// Create a timeout error.
    pub fn timeout(after: Duration) -> Self {
        Self::Timeout(after)
    }
}
