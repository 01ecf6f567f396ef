//! In-memory stores shared by the pipeline integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Mutex;

use file_index_pipeline::{
    BlobWriter, IndexProjector, IngestOrchestrator, MetadataRecorder, OrchestratorConfig,
    SearchReader,
};
use file_index_repository::{
    BlobSink, BlobStore, BlobStoreError, DocumentStore, DocumentStoreError, RawHit,
    RawSearchResponse, SearchIndexError, SearchIndexProvider,
};

pub const INDEX: &str = "file";
pub const COLLECTION: &str = "files";

/// Ordered record of store calls across all collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    BlobCommitted(String),
    BlobAborted(String),
    Inserted(String),
    Indexed(String),
}

pub type EventLog = Arc<Mutex<Vec<Event>>>;

fn file_name(location: &Path) -> String {
    location
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Blob store keeping committed blobs in memory.
pub struct MemoryBlobStore {
    pub blobs: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
    fail_on: HashSet<String>,
    commit_delay: Option<Duration>,
    events: EventLog,
}

impl MemoryBlobStore {
    pub fn new(events: EventLog) -> Self {
        Self {
            blobs: Arc::new(Mutex::new(HashMap::new())),
            fail_on: HashSet::new(),
            commit_delay: None,
            events,
        }
    }

    /// Make every commit take `delay` before the blob lands.
    pub fn with_commit_delay(mut self, delay: Duration) -> Self {
        self.commit_delay = Some(delay);
        self
    }

    /// Fail writes to locations with this storage file name.
    pub fn failing_on(mut self, stored_name: &str) -> Self {
        self.fail_on.insert(stored_name.to_string());
        self
    }
}

struct MemorySink {
    location: PathBuf,
    buffer: Vec<u8>,
    fail: bool,
    delay: Option<Duration>,
    blobs: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
    events: EventLog,
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn create(&self, location: &Path) -> Result<Box<dyn BlobSink>, BlobStoreError> {
        Ok(Box::new(MemorySink {
            location: location.to_path_buf(),
            buffer: Vec::new(),
            fail: self.fail_on.contains(&file_name(location)),
            delay: self.commit_delay,
            blobs: self.blobs.clone(),
            events: self.events.clone(),
        }))
    }
}

#[async_trait]
impl BlobSink for MemorySink {
    async fn write(&mut self, chunk: &[u8]) -> Result<(), BlobStoreError> {
        if self.fail {
            return Err(BlobStoreError::write(
                &self.location,
                std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            ));
        }
        self.buffer.extend_from_slice(chunk);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), BlobStoreError> {
        let MemorySink {
            location,
            buffer,
            delay,
            blobs,
            events,
            ..
        } = *self;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let name = file_name(&location);
        blobs.lock().await.insert(location, buffer);
        events.lock().await.push(Event::BlobCommitted(name));
        Ok(())
    }

    async fn abort(self: Box<Self>) {
        self.events
            .lock()
            .await
            .push(Event::BlobAborted(file_name(&self.location)));
    }
}

/// Document store keeping documents in memory.
pub struct MemoryDocumentStore {
    pub documents: Mutex<HashMap<(String, String), Value>>,
    events: EventLog,
}

impl MemoryDocumentStore {
    pub fn new(events: EventLog) -> Self {
        Self {
            documents: Mutex::new(HashMap::new()),
            events,
        }
    }

    /// Documents whose display name is `name`.
    pub async fn with_name(&self, name: &str) -> Vec<Value> {
        self.documents
            .lock()
            .await
            .values()
            .filter(|doc| doc["name"] == name)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert_one(&self, collection: &str, document: Value) -> Result<String, DocumentStoreError> {
        let id = document["_id"]
            .as_str()
            .ok_or_else(|| DocumentStoreError::invalid_document("missing _id"))?
            .to_string();
        let path = document["path"].as_str().unwrap_or_default().to_string();
        self.documents
            .lock()
            .await
            .insert((collection.to_string(), id.clone()), document);
        self.events
            .lock()
            .await
            .push(Event::Inserted(file_name(Path::new(&path))));
        Ok(id)
    }

    async fn find_one(&self, collection: &str, id: &str) -> Result<Option<Value>, DocumentStoreError> {
        Ok(self
            .documents
            .lock()
            .await
            .get(&(collection.to_string(), id.to_string()))
            .cloned())
    }
}

/// Search index keeping documents in memory.
///
/// Understands the `ids` and `match_all` queries plus `from`/`size`.
pub struct MemoryIndex {
    pub documents: Mutex<Vec<(String, Value)>>,
    fail_on: HashSet<String>,
    events: EventLog,
}

impl MemoryIndex {
    pub fn new(events: EventLog) -> Self {
        Self {
            documents: Mutex::new(Vec::new()),
            fail_on: HashSet::new(),
            events,
        }
    }

    /// Fail indexing of documents with this display name.
    pub fn failing_on(mut self, name: &str) -> Self {
        self.fail_on.insert(name.to_string());
        self
    }

    /// Insert a document directly, bypassing the upsert.
    pub async fn insert_fixture(&self, id: &str, document: Value) {
        self.documents.lock().await.push((id.to_string(), document));
    }
}

#[async_trait]
impl SearchIndexProvider for MemoryIndex {
    async fn index(&self, _index: &str, id: &str, document: &Value) -> Result<(), SearchIndexError> {
        let name = document["name"].as_str().unwrap_or_default();
        if self.fail_on.contains(name) {
            return Err(SearchIndexError::index("index unavailable"));
        }
        let mut documents = self.documents.lock().await;
        documents.retain(|(existing, _)| existing != id);
        documents.push((id.to_string(), document.clone()));
        let path = document["path"].as_str().unwrap_or_default();
        self.events
            .lock()
            .await
            .push(Event::Indexed(file_name(Path::new(path))));
        Ok(())
    }

    async fn search(&self, _index: &str, query: &Value) -> Result<RawSearchResponse, SearchIndexError> {
        let documents = self.documents.lock().await;
        let matching: Vec<&(String, Value)> = match query["query"]["ids"]["values"].as_array() {
            Some(ids) => documents
                .iter()
                .filter(|(id, _)| ids.iter().any(|v| v.as_str() == Some(id.as_str())))
                .collect(),
            None => documents.iter().collect(),
        };

        let from = query["from"].as_u64().unwrap_or(0) as usize;
        let size = query["size"].as_u64().unwrap_or(10) as usize;
        let hits = matching
            .iter()
            .skip(from)
            .take(size)
            .map(|(id, source)| RawHit {
                id: id.clone(),
                source: source.clone(),
            })
            .collect();

        Ok(RawSearchResponse {
            hits,
            total: matching.len() as u64,
        })
    }

    async fn ensure_index_exists(&self, _index: &str) -> Result<(), SearchIndexError> {
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        Ok(true)
    }
}

/// A fully wired pipeline over in-memory stores.
pub struct Harness {
    pub events: EventLog,
    pub blobs: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
    pub store: Arc<MemoryDocumentStore>,
    pub index: Arc<MemoryIndex>,
    pub orchestrator: IngestOrchestrator,
    pub reader: SearchReader,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(|blob, index| (blob, index), OrchestratorConfig::default())
    }

    pub fn build(
        customize: impl FnOnce(MemoryBlobStore, MemoryIndex) -> (MemoryBlobStore, MemoryIndex),
        config: OrchestratorConfig,
    ) -> Self {
        let events: EventLog = Arc::new(Mutex::new(Vec::new()));
        let (blob_store, index) = customize(
            MemoryBlobStore::new(events.clone()),
            MemoryIndex::new(events.clone()),
        );
        let blobs = blob_store.blobs.clone();
        let store = Arc::new(MemoryDocumentStore::new(events.clone()));
        let index = Arc::new(index);

        let writer = BlobWriter::new(Arc::new(blob_store), "/srv/files");
        let projector = Arc::new(IndexProjector::new(index.clone(), INDEX));
        let recorder = MetadataRecorder::new(store.clone()).with_hook(projector);
        let orchestrator = IngestOrchestrator::with_config(writer, recorder, config);
        let reader = SearchReader::new(index.clone(), INDEX);

        Self {
            events,
            blobs,
            store,
            index,
            orchestrator,
            reader,
        }
    }
}
