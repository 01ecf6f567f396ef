//! Interface definitions for the stores used by the file index.
//!
//! These traits allow for dependency injection and swappable backends:
//! the pipeline only ever talks to `dyn BlobStore`, `dyn DocumentStore` and
//! `dyn SearchIndexProvider`.

mod blob_store;
mod document_store;
mod search_index_provider;

pub use blob_store::{BlobSink, BlobStore};
pub use document_store::DocumentStore;
pub use search_index_provider::SearchIndexProvider;
