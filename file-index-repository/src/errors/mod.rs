//! Error types for the file index repository.

mod blob_store_error;
mod document_store_error;
mod search_index_error;

pub use blob_store_error::BlobStoreError;
pub use document_store_error::DocumentStoreError;
pub use search_index_error::SearchIndexError;
