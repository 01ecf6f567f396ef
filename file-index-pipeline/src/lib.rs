//! # File Index Pipeline
//!
//! This crate provides the pipeline that ingests uploaded files into blob
//! storage, the primary document store and the search index, and the reader
//! that queries the index back.
//!
//! ## Architecture
//!
//! Each file goes through three strictly ordered steps:
//!
//! 1. **Writer**: Streams the file contents to blob storage
//! 2. **Recorder**: Inserts the canonical record into the document store
//! 3. **Projector**: Indexes the searchable copy, as the recorder's post-commit hook
//!
//! The **Orchestrator** drives a batch of files through these steps and
//! isolates failures per file. The **Reader** is an independent consumer of
//! the search index.
//!
//! The two stores are kept consistent on a best-effort basis only: a failed
//! projection does not undo the recorded document.

pub mod artifact;
pub mod errors;
pub mod orchestrator;
pub mod projector;
pub mod reader;
pub mod recorder;
pub mod writer;

pub use artifact::{Artifact, ByteStream};
pub use errors::{IngestError, IngestPhase, ReadError, RecordError};
pub use orchestrator::{IngestOrchestrator, IngestReport, IngestedFile, OrchestratorConfig};
pub use projector::IndexProjector;
pub use reader::SearchReader;
pub use recorder::{MetadataRecorder, PostCommitHook, RecorderConfig};
pub use writer::{BlobWriter, StoredBlob};
