//! Blob store trait definitions.

use std::path::Path;

use async_trait::async_trait;

use crate::errors::BlobStoreError;

/// Durable storage for file contents.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Open a new blob for writing at `location`.
    ///
    /// Nothing is visible at `location` until the returned sink is committed.
    /// An existing blob at the same location is replaced on commit.
    async fn create(&self, location: &Path) -> Result<Box<dyn BlobSink>, BlobStoreError>;
}

/// A blob being written.
///
/// Callers must finish with either [`BlobSink::commit`] or
/// [`BlobSink::abort`]. A sink dropped without committing leaves no blob
/// behind.
#[async_trait]
pub trait BlobSink: Send {
    /// Append a chunk of content.
    async fn write(&mut self, chunk: &[u8]) -> Result<(), BlobStoreError>;

    /// Make the blob durable at its final location.
    async fn commit(self: Box<Self>) -> Result<(), BlobStoreError>;

    /// Discard everything written so far.
    async fn abort(self: Box<Self>);
}
