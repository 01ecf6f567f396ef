//! Uploaded files awaiting ingestion.

use std::fmt;
use std::io;
use std::path::PathBuf;

use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

/// A stream of file content chunks.
pub type ByteStream = BoxStream<'static, io::Result<Bytes>>;

/// An uploaded file: a declared display name and its content.
///
/// An artifact has no identity until it has been recorded.
pub struct Artifact {
    name: String,
    content: ByteStream,
}

impl Artifact {
    /// Create an artifact from a content stream.
    pub fn new(name: impl Into<String>, content: ByteStream) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }

    /// Create an artifact from in-memory content.
    pub fn from_bytes(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self::new(name, stream::once(async move { Ok(content) }).boxed())
    }

    /// Create an artifact reading a local file.
    ///
    /// The file is opened lazily when the content is first polled, so a
    /// missing file surfaces as a read failure while writing.
    pub fn open(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let content = stream::once(async move { File::open(path).await })
            .map_ok(ReaderStream::new)
            .try_flatten()
            .boxed();
        Self::new(name, content)
    }

    /// The declared display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Split into display name and content.
    pub fn into_parts(self) -> (String, ByteStream) {
        (self.name, self.content)
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifact")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
