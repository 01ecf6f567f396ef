//! Error types for the file index pipeline.

use std::fmt;

use file_index_repository::{BlobStoreError, DocumentStoreError, SearchIndexError};
use thiserror::Error;

/// The step at which ingesting a file failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestPhase {
    /// Writing the content to blob storage.
    Disk,
    /// Recording the document or projecting it into the search index.
    Database,
    /// The batch was cancelled before the file was started.
    Cancelled,
}

impl fmt::Display for IngestPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disk => f.write_str("disk"),
            Self::Database => f.write_str("database"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Failure to ingest a single file, carrying the file's display name.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The content could not be written to blob storage.
    #[error("error saving file {name} to disk: {source}")]
    Disk {
        name: String,
        #[source]
        source: BlobStoreError,
    },

    /// The canonical record or its search projection could not be written.
    #[error("error saving file {name} to database: {source}")]
    Database {
        name: String,
        #[source]
        source: RecordError,
    },

    /// The batch was cancelled before this file was started.
    #[error("file {name} not saved: ingestion cancelled")]
    Cancelled { name: String },
}

impl IngestError {
    /// Display name of the file that failed.
    pub fn name(&self) -> &str {
        match self {
            Self::Disk { name, .. } | Self::Database { name, .. } | Self::Cancelled { name } => {
                name
            }
        }
    }

    /// The step that failed.
    pub fn phase(&self) -> IngestPhase {
        match self {
            Self::Disk { .. } => IngestPhase::Disk,
            Self::Database { .. } => IngestPhase::Database,
            Self::Cancelled { .. } => IngestPhase::Cancelled,
        }
    }
}

/// Errors raised by the metadata recorder.
#[derive(Error, Debug)]
pub enum RecordError {
    /// The primary store write failed or timed out. Nothing was recorded.
    #[error("store write failed: {0}")]
    Store(#[from] DocumentStoreError),

    /// The record was written but its post-commit projection failed.
    #[error("index projection failed: {0}")]
    Projection(#[from] SearchIndexError),
}

/// Errors raised while reading from the search index.
#[derive(Error, Debug)]
pub enum ReadError {
    /// No document has the requested identity.
    #[error("file {0} not found")]
    NotFound(String),

    /// More than one document carries the requested identity.
    #[error("duplicated files for id {id} ({count} hits)")]
    DuplicateFound { id: String, count: usize },

    /// The query could not be executed.
    #[error("search failed: {0}")]
    Query(#[from] SearchIndexError),

    /// A hit could not be read as a file document.
    #[error("malformed document in hit {id}: {message}")]
    Deserialization { id: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_disk_error_names_file() {
        let err = IngestError::Disk {
            name: "bad.txt".to_string(),
            source: BlobStoreError::Read(io::Error::new(io::ErrorKind::Other, "boom")),
        };

        assert_eq!(err.name(), "bad.txt");
        assert_eq!(err.phase(), IngestPhase::Disk);
        assert!(err.to_string().contains("bad.txt"));
        assert!(err.to_string().contains("to disk"));
    }

    #[test]
    fn test_database_error_names_file() {
        let err = IngestError::Database {
            name: "a.txt".to_string(),
            source: RecordError::Projection(SearchIndexError::index("down")),
        };

        assert_eq!(err.phase(), IngestPhase::Database);
        assert!(err.to_string().contains("a.txt to database"));
        assert!(err.to_string().contains("down"));
    }

    #[test]
    fn test_read_error_messages() {
        assert_eq!(ReadError::NotFound("x".to_string()).to_string(), "file x not found");
        assert_eq!(
            ReadError::DuplicateFound {
                id: "x".to_string(),
                count: 2
            }
            .to_string(),
            "duplicated files for id x (2 hits)"
        );
    }
}
