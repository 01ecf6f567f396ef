//! Blob store error types.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while writing file contents to blob storage.
#[derive(Debug, Error)]
pub enum BlobStoreError {
    /// Could not create the destination.
    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing a chunk failed partway through.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Flushing or moving the finished blob into place failed.
    #[error("failed to commit {path}: {source}")]
    Commit {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The display name does not yield a usable storage file name.
    #[error("no storage location for file name {name:?}")]
    InvalidName { name: String },

    /// Reading the source content failed.
    #[error("failed to read source content: {0}")]
    Read(#[source] io::Error),

    /// The write did not finish within the caller's deadline.
    #[error("blob write timed out after {0:?}")]
    Timeout(Duration),
}

impl BlobStoreError {
    pub fn create(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Create {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName { name: name.into() }
    }

    pub fn commit(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Commit {
            path: path.into(),
            source,
        }
    }
}
