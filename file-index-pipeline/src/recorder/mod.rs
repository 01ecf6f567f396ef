//! Metadata recorder for the file index pipeline.
//!
//! Persists the canonical record of a file into the primary document store,
//! then runs an optional post-commit hook. Installing an [`IndexProjector`]
//! as the hook makes every recorded file searchable; leaving it out keeps
//! the store as the only copy.
//!
//! [`IndexProjector`]: crate::projector::IndexProjector

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use crate::errors::RecordError;
use file_index_repository::{DocumentStore, DocumentStoreError, SearchIndexError};
use file_index_shared::{new_file_id, FileRecord};

/// Default collection for file records.
pub const DEFAULT_COLLECTION: &str = "files";

/// Action run after a record has been committed to the primary store.
///
/// A hook failure is reported as the recorder's failure, but the committed
/// record is left in place.
#[async_trait]
pub trait PostCommitHook: Send + Sync {
    async fn after_commit(&self, record: &FileRecord) -> Result<(), SearchIndexError>;
}

/// Configuration for the metadata recorder.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Collection receiving file records.
    pub collection: String,
    /// Deadline for one store round-trip. Not retried on expiry.
    pub store_timeout: Duration,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            store_timeout: Duration::from_secs(5),
        }
    }
}

/// Recorder that writes canonical file records.
pub struct MetadataRecorder {
    store: Arc<dyn DocumentStore>,
    hook: Option<Arc<dyn PostCommitHook>>,
    config: RecorderConfig,
}

impl MetadataRecorder {
    /// Create a new recorder with default configuration and no hook.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_config(store, RecorderConfig::default())
    }

    /// Create a new recorder with custom configuration and no hook.
    pub fn with_config(store: Arc<dyn DocumentStore>, config: RecorderConfig) -> Self {
        Self {
            store,
            hook: None,
            config,
        }
    }

    /// Install the post-commit hook.
    pub fn with_hook(mut self, hook: Arc<dyn PostCommitHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Whether a post-commit hook is installed.
    pub fn has_hook(&self) -> bool {
        self.hook.is_some()
    }

    /// Record a file and return its identity.
    ///
    /// The display name is stored as given. Exactly one insert is issued;
    /// the caller must only record files whose blob write succeeded.
    #[instrument(skip(self))]
    pub async fn record(&self, name: &str, location: &str) -> Result<String, RecordError> {
        let record = FileRecord::new(new_file_id(), name, location);
        let document = serde_json::to_value(&record)
            .map_err(|e| DocumentStoreError::invalid_document(e.to_string()))?;

        let id = timeout(
            self.config.store_timeout,
            self.store.insert_one(&self.config.collection, document),
        )
        .await
        .map_err(|_| DocumentStoreError::timeout(self.config.store_timeout))??;

        debug!(id = %id, collection = %self.config.collection, "File record committed");

        let record = FileRecord { id, ..record };
        if let Some(hook) = &self.hook {
            if let Err(e) = hook.after_commit(&record).await {
                warn!(id = %record.id, error = %e, "Post-commit hook failed, record kept");
                return Err(RecordError::Projection(e));
            }
        }

        Ok(record.id)
    }
}
