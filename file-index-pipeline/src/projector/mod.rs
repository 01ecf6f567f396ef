//! Index projector for the file index pipeline.
//!
//! Builds the searchable copy of a file record and upserts it into the
//! search index under the record's identity.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{debug, instrument};

use crate::recorder::PostCommitHook;
use file_index_repository::{SearchIndexError, SearchIndexProvider};
use file_index_shared::{FileDocument, FileRecord};

/// Projector that indexes file documents.
///
/// A projection failure never undoes the primary-store write; the record
/// simply stays unsearchable until it is projected again.
pub struct IndexProjector {
    index: Arc<dyn SearchIndexProvider>,
    index_name: String,
    timeout: Duration,
}

impl IndexProjector {
    /// Create a new projector writing to `index_name`.
    pub fn new(index: Arc<dyn SearchIndexProvider>, index_name: impl Into<String>) -> Self {
        Self {
            index,
            index_name: index_name.into(),
            timeout: Duration::from_secs(5),
        }
    }

    /// Set the deadline for one index call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Upsert the document for a recorded file.
    #[instrument(skip(self))]
    pub async fn project(&self, id: &str, name: &str, location: &str) -> Result<(), SearchIndexError> {
        let document = serde_json::to_value(FileDocument::new(id, name, location))
            .map_err(|e| SearchIndexError::index(format!("Failed to serialize document: {}", e)))?;

        timeout(self.timeout, self.index.index(&self.index_name, id, &document))
            .await
            .map_err(|_| SearchIndexError::timeout(self.timeout))??;

        debug!(index = %self.index_name, id = %id, "File document projected");
        Ok(())
    }
}

#[async_trait]
impl PostCommitHook for IndexProjector {
    async fn after_commit(&self, record: &FileRecord) -> Result<(), SearchIndexError> {
        self.project(&record.id, &record.name, &record.path).await
    }
}
