//! Blob writer for the file index pipeline.
//!
//! Streams file contents into blob storage at a location derived from the
//! file's display name.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::StreamExt;
use tracing::{debug, instrument};

use crate::artifact::{Artifact, ByteStream};
use file_index_repository::{BlobStore, BlobStoreError};
use file_index_shared::storage_location;

/// A blob that was written successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub location: PathBuf,
    pub size_bytes: u64,
}

/// Writer that persists file contents to blob storage.
///
/// On any failure partway through, the partial blob is discarded: callers
/// must treat an error as "no durable copy exists".
pub struct BlobWriter {
    store: Arc<dyn BlobStore>,
    root: PathBuf,
}

impl BlobWriter {
    /// Create a writer storing blobs under `root`.
    pub fn new(store: Arc<dyn BlobStore>, root: impl Into<PathBuf>) -> Self {
        Self {
            store,
            root: root.into(),
        }
    }

    /// The storage location for a file with the given display name.
    ///
    /// Always a direct child of the writer's root. Names with no usable
    /// last component are rejected.
    pub fn location_for(&self, name: &str) -> Result<PathBuf, BlobStoreError> {
        storage_location(&self.root, name).ok_or_else(|| BlobStoreError::invalid_name(name))
    }

    /// Write an artifact at the location derived from its display name.
    pub async fn write(&self, artifact: Artifact) -> Result<StoredBlob, BlobStoreError> {
        let (name, content) = artifact.into_parts();
        let location = self.location_for(&name)?;
        self.write_to(&location, content).await
    }

    /// Stream `content` to completion into a new blob at `location`.
    #[instrument(skip(self, location, content), fields(location = %location.display()))]
    pub async fn write_to(
        &self,
        location: &Path,
        mut content: ByteStream,
    ) -> Result<StoredBlob, BlobStoreError> {
        let mut sink = self.store.create(location).await?;
        let mut size_bytes = 0;

        while let Some(chunk) = content.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    sink.abort().await;
                    return Err(BlobStoreError::Read(e));
                }
            };
            if let Err(e) = sink.write(&chunk).await {
                sink.abort().await;
                return Err(e);
            }
            size_bytes += chunk.len() as u64;
        }

        sink.commit().await?;

        debug!(bytes = size_bytes, "Blob written");
        Ok(StoredBlob {
            location: location.to_path_buf(),
            size_bytes,
        })
    }
}
