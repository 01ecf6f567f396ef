//! # File Index Repository
//!
//! This crate provides traits and implementations for the three stores the
//! file index writes to: blob storage for file contents, a primary document
//! store for canonical records, and a search engine for the searchable
//! projection. It includes definitions for errors, interfaces, and concrete
//! implementations backed by the local disk, PostgreSQL and OpenSearch.

pub mod config;
pub mod disk;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod postgres;
pub mod types;

pub use config::DocumentStoreConfig;
pub use disk::DiskBlobStore;
pub use errors::{BlobStoreError, DocumentStoreError, SearchIndexError};
pub use interfaces::{BlobSink, BlobStore, DocumentStore, SearchIndexProvider};
pub use opensearch::{FileQuery, OpenSearchClient};
pub use postgres::PostgresDocumentStore;
pub use types::{RawHit, RawSearchResponse};
