//! Local filesystem implementation of the blob store.
//!
//! Content is streamed into a `<name>.<token>.partial` sibling of the final
//! location and renamed into place on commit, so a reader of the final
//! path never observes a half-written file. Each sink gets its own token:
//! two writes to one location never share a partial file, and the last
//! commit wins with a whole blob.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, warn};

use crate::errors::BlobStoreError;
use crate::interfaces::{BlobSink, BlobStore};
use file_index_shared::new_file_id;

const PARTIAL_SUFFIX: &str = ".partial";

/// Blob store writing plain files on the local disk.
#[derive(Debug, Clone, Default)]
pub struct DiskBlobStore {
    create_dirs: bool,
}

impl DiskBlobStore {
    /// Create a store that expects destination directories to exist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that creates missing parent directories.
    pub fn creating_dirs() -> Self {
        Self { create_dirs: true }
    }
}

fn partial_path(location: &Path, token: &str) -> PathBuf {
    let mut name = location
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".");
    name.push(token);
    name.push(PARTIAL_SUFFIX);
    location.with_file_name(name)
}

#[async_trait]
impl BlobStore for DiskBlobStore {
    async fn create(&self, location: &Path) -> Result<Box<dyn BlobSink>, BlobStoreError> {
        if location.file_name().is_none() {
            return Err(BlobStoreError::create(
                location,
                io::Error::new(io::ErrorKind::InvalidInput, "location has no file name"),
            ));
        }

        if self.create_dirs {
            if let Some(parent) = location.parent() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| BlobStoreError::create(location, e))?;
            }
        }

        let partial = partial_path(location, &new_file_id());
        let file = File::create_new(&partial)
            .await
            .map_err(|e| BlobStoreError::create(location, e))?;

        Ok(Box::new(DiskBlobSink {
            writer: Some(BufWriter::new(file)),
            partial,
            target: location.to_path_buf(),
            bytes_written: 0,
        }))
    }
}

struct DiskBlobSink {
    writer: Option<BufWriter<File>>,
    partial: PathBuf,
    target: PathBuf,
    bytes_written: u64,
}

impl DiskBlobSink {
    /// Flush, sync and rename into place.
    ///
    /// The writer stays in place until the rename has succeeded, so a sink
    /// dropped during any of these awaits still removes its partial file.
    async fn finish(&mut self) -> io::Result<()> {
        let writer = match self.writer.as_mut() {
            Some(writer) => writer,
            None => return Ok(()),
        };
        writer.flush().await?;
        writer.get_mut().sync_all().await?;
        fs::rename(&self.partial, &self.target).await?;
        self.writer.take();
        Ok(())
    }
}

#[async_trait]
impl BlobSink for DiskBlobSink {
    async fn write(&mut self, chunk: &[u8]) -> Result<(), BlobStoreError> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            BlobStoreError::write(
                &self.target,
                io::Error::new(io::ErrorKind::BrokenPipe, "blob already finished"),
            )
        })?;
        writer
            .write_all(chunk)
            .await
            .map_err(|e| BlobStoreError::write(&self.target, e))?;
        self.bytes_written += chunk.len() as u64;
        Ok(())
    }

    async fn commit(mut self: Box<Self>) -> Result<(), BlobStoreError> {
        if let Err(e) = self.finish().await {
            remove_partial(&self.partial).await;
            return Err(BlobStoreError::commit(&self.target, e));
        }
        debug!(path = %self.target.display(), bytes = self.bytes_written, "Blob committed");
        Ok(())
    }

    async fn abort(mut self: Box<Self>) {
        self.writer.take();
        remove_partial(&self.partial).await;
        debug!(path = %self.target.display(), "Blob aborted");
    }
}

impl Drop for DiskBlobSink {
    fn drop(&mut self) {
        // Dropped mid-write (e.g. the owning task was cancelled)
        if self.writer.take().is_some() {
            if let Err(e) = std::fs::remove_file(&self.partial) {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(path = %self.partial.display(), error = %e, "Failed to remove partial blob");
                }
            }
        }
    }
}

async fn remove_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "Failed to remove partial blob");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn partial_files(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| path.to_string_lossy().ends_with(PARTIAL_SUFFIX))
            .collect()
    }

    #[test]
    fn test_partial_path() {
        let partial = partial_path(Path::new("/tmp/my_report.pdf"), "abc");
        assert_eq!(partial, PathBuf::from("/tmp/my_report.pdf.abc.partial"));
    }

    #[tokio::test]
    async fn test_commit_moves_blob_into_place() {
        let dir = tempfile::tempdir().unwrap();
        let location = dir.path().join("a.txt");
        let store = DiskBlobStore::new();

        let mut sink = store.create(&location).await.unwrap();
        sink.write(b"hello ").await.unwrap();
        assert!(!location.exists());
        assert_eq!(partial_files(dir.path()).len(), 1);
        sink.write(b"world").await.unwrap();
        sink.commit().await.unwrap();

        assert_eq!(std::fs::read(&location).unwrap(), b"hello world");
        assert!(partial_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_abort_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let location = dir.path().join("a.txt");
        let store = DiskBlobStore::new();

        let mut sink = store.create(&location).await.unwrap();
        sink.write(b"partial").await.unwrap();
        sink.abort().await;

        assert!(!location.exists());
        assert!(partial_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_drop_without_commit_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let location = dir.path().join("a.txt");
        let store = DiskBlobStore::new();

        let mut sink = store.create(&location).await.unwrap();
        sink.write(b"partial").await.unwrap();
        drop(sink);

        assert!(!location.exists());
        assert!(partial_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_interrupted_commit_leaves_no_partial() {
        let dir = tempfile::tempdir().unwrap();
        let location = dir.path().join("a.txt");
        let store = DiskBlobStore::new();

        let mut sink = store.create(&location).await.unwrap();
        sink.write(&vec![b'x'; 64 * 1024]).await.unwrap();
        let _ = tokio::time::timeout(Duration::ZERO, sink.commit()).await;

        // Either the commit won the race or the partial was cleaned up
        assert!(partial_files(dir.path()).is_empty());
        if location.exists() {
            assert_eq!(std::fs::read(&location).unwrap().len(), 64 * 1024);
        }
    }

    #[tokio::test]
    async fn test_interleaved_writes_to_one_location_stay_whole() {
        let dir = tempfile::tempdir().unwrap();
        let location = dir.path().join("same.txt");
        let store = DiskBlobStore::new();

        let mut first = store.create(&location).await.unwrap();
        let mut second = store.create(&location).await.unwrap();
        assert_eq!(partial_files(dir.path()).len(), 2);

        for _ in 0..4 {
            first.write(&[b'A'; 1024]).await.unwrap();
            second.write(&[b'B'; 1024]).await.unwrap();
        }
        first.commit().await.unwrap();
        assert_eq!(std::fs::read(&location).unwrap(), vec![b'A'; 4096]);

        second.commit().await.unwrap();
        assert_eq!(std::fs::read(&location).unwrap(), vec![b'B'; 4096]);
        assert!(partial_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_commit_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        let location = dir.path().join("a.txt");
        std::fs::write(&location, b"old contents").unwrap();
        let store = DiskBlobStore::new();

        let mut sink = store.create(&location).await.unwrap();
        sink.write(b"new").await.unwrap();
        sink.commit().await.unwrap();

        assert_eq!(std::fs::read(&location).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let location = dir.path().join("missing").join("a.txt");

        let result = DiskBlobStore::new().create(&location).await;
        assert!(matches!(result, Err(BlobStoreError::Create { .. })));

        let sink = DiskBlobStore::creating_dirs().create(&location).await.unwrap();
        sink.commit().await.unwrap();
        assert!(location.exists());
    }
}
