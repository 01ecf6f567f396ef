//! Orchestrator module for the file index pipeline.
//!
//! Drives each file of a batch through the writer and the recorder, and
//! collects one error per failed file.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::time::{timeout, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::artifact::Artifact;
use crate::errors::IngestError;
use crate::recorder::MetadataRecorder;
use crate::writer::BlobWriter;
use file_index_repository::BlobStoreError;
use file_index_shared::FileDocument;

/// Configuration for the orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Number of files processed concurrently. 1 processes the batch in order.
    pub max_concurrency: usize,
    /// Deadline for writing one file's content.
    pub write_timeout: Option<Duration>,
    /// Deadline after which no further files of the batch are started.
    pub batch_timeout: Option<Duration>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            write_timeout: None,
            batch_timeout: None,
        }
    }
}

impl OrchestratorConfig {
    /// Process files one at a time, in batch order.
    pub fn sequential() -> Self {
        Self {
            max_concurrency: 1,
            ..Self::default()
        }
    }
}

/// A file that was stored, recorded and projected.
///
/// Same shape as the search document: `id`, `name`, `path`.
pub type IngestedFile = FileDocument;

/// Outcome of ingesting a batch.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Files that were stored, recorded and projected.
    pub succeeded: Vec<IngestedFile>,
    /// One entry per file that failed at any step.
    pub failed: Vec<IngestError>,
}

impl IngestReport {
    /// Whether every file of the batch succeeded.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Orchestrator that ingests batches of files.
///
/// Within a file the writer strictly precedes the recorder. Files are
/// independent of each other: a failure is recorded and the file
/// abandoned, and the rest of the batch carries on. No step is retried.
pub struct IngestOrchestrator {
    writer: BlobWriter,
    recorder: MetadataRecorder,
    config: OrchestratorConfig,
}

impl IngestOrchestrator {
    /// Create a new orchestrator with default configuration.
    pub fn new(writer: BlobWriter, recorder: MetadataRecorder) -> Self {
        Self::with_config(writer, recorder, OrchestratorConfig::default())
    }

    /// Create a new orchestrator with custom configuration.
    pub fn with_config(
        writer: BlobWriter,
        recorder: MetadataRecorder,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            writer,
            recorder,
            config,
        }
    }

    /// Ingest a batch and return the errors of the files that failed.
    ///
    /// An empty result means every file succeeded.
    pub async fn ingest(&self, artifacts: Vec<Artifact>) -> Vec<IngestError> {
        self.ingest_report(artifacts).await.failed
    }

    /// Ingest a batch and report both successes and failures.
    pub async fn ingest_report(&self, artifacts: Vec<Artifact>) -> IngestReport {
        self.ingest_until(artifacts, CancellationToken::new()).await
    }

    /// Ingest a batch until `cancel` fires or the batch deadline passes.
    ///
    /// Files already in progress when the batch is cancelled run to
    /// completion; files not yet started are reported as cancelled.
    #[instrument(skip_all, fields(file_count = artifacts.len()))]
    pub async fn ingest_until(
        &self,
        artifacts: Vec<Artifact>,
        cancel: CancellationToken,
    ) -> IngestReport {
        let deadline = self.config.batch_timeout.map(|t| Instant::now() + t);
        let concurrency = self.config.max_concurrency.max(1);

        let outcomes: Vec<Result<IngestedFile, IngestError>> = stream::iter(artifacts)
            .map(|artifact| self.ingest_one(artifact, &cancel, deadline))
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let mut report = IngestReport::default();
        for outcome in outcomes {
            match outcome {
                Ok(record) => report.succeeded.push(record),
                Err(e) => report.failed.push(e),
            }
        }

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "Batch ingestion completed"
        );
        report
    }

    async fn ingest_one(
        &self,
        artifact: Artifact,
        cancel: &CancellationToken,
        deadline: Option<Instant>,
    ) -> Result<IngestedFile, IngestError> {
        let (name, content) = artifact.into_parts();

        let expired = deadline.is_some_and(|d| Instant::now() >= d);
        if cancel.is_cancelled() || expired {
            warn!(file = %name, "Batch cancelled, file not started");
            return Err(IngestError::Cancelled { name });
        }

        let location = match self.writer.location_for(&name) {
            Ok(location) => location,
            Err(source) => {
                let err = IngestError::Disk { name, source };
                error!(error = %err, "Failed to save file");
                return Err(err);
            }
        };

        let written = match self.config.write_timeout {
            Some(limit) => timeout(limit, self.writer.write_to(&location, content))
                .await
                .unwrap_or_else(|_| Err(BlobStoreError::Timeout(limit))),
            None => self.writer.write_to(&location, content).await,
        };
        if let Err(source) = written {
            let err = IngestError::Disk { name, source };
            error!(error = %err, "Failed to save file");
            return Err(err);
        }

        let path = location.to_string_lossy().into_owned();
        let id = match self.recorder.record(&name, &path).await {
            Ok(id) => id,
            Err(source) => {
                let err = IngestError::Database { name, source };
                error!(error = %err, "Failed to save file");
                return Err(err);
            }
        };

        info!(file = %name, path = %path, id = %id, "Saved file");
        Ok(IngestedFile::new(id, name, path))
    }
}
