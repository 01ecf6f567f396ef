//! Dependency initialization and wiring for the file index.

use std::sync::Arc;
use tracing::info;

use crate::config::AppConfig;
use crate::AppError;
use file_index_pipeline::{
    BlobWriter, IndexProjector, IngestOrchestrator, MetadataRecorder, OrchestratorConfig,
    RecorderConfig, SearchReader,
};
use file_index_repository::{
    DiskBlobStore, DocumentStoreConfig, OpenSearchClient, PostgresDocumentStore,
    SearchIndexProvider,
};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to ingest batches.
    pub orchestrator: IngestOrchestrator,
    /// Reader over the same search index the orchestrator projects into.
    pub reader: SearchReader,
}

impl Dependencies {
    /// Connect to the stores named in `config` and wire the pipeline.
    ///
    /// Fails if the search cluster is unreachable or unhealthy, or if the
    /// document store cannot be reached or migrated.
    pub async fn new(config: &AppConfig) -> Result<Self, AppError> {
        info!(
            opensearch_url = %config.opensearch_url,
            index = %config.index_name,
            collection = %config.collection,
            storage_root = %config.storage_root.display(),
            index_projection = config.index_projection,
            "Initializing dependencies"
        );

        // Initialize OpenSearch client
        let search_client = OpenSearchClient::new(&config.opensearch_url)
            .await
            .map_err(|e| AppError::config(format!("Failed to create OpenSearch client: {}", e)))?;

        // Verify OpenSearch is reachable
        let healthy = search_client
            .health_check()
            .await
            .map_err(|e| AppError::config(format!("OpenSearch health check failed: {}", e)))?;

        if !healthy {
            return Err(AppError::config("OpenSearch cluster is unhealthy"));
        }

        search_client.ensure_index_exists(&config.index_name).await?;
        info!("OpenSearch connection verified");

        let search_client: Arc<dyn SearchIndexProvider> = Arc::new(search_client);

        // Initialize document store
        let document_store =
            PostgresDocumentStore::connect(&config.database_url, &DocumentStoreConfig::default())
                .await?;
        info!("Document store connected");

        let writer = BlobWriter::new(
            Arc::new(DiskBlobStore::creating_dirs()),
            config.storage_root.clone(),
        );

        let recorder_config = RecorderConfig {
            collection: config.collection.clone(),
            store_timeout: config.store_timeout,
        };
        let mut recorder = MetadataRecorder::with_config(Arc::new(document_store), recorder_config);
        if config.index_projection {
            let projector = IndexProjector::new(search_client.clone(), config.index_name.clone());
            recorder = recorder.with_hook(Arc::new(projector));
        }

        let orchestrator_config = OrchestratorConfig {
            max_concurrency: config.ingest_concurrency,
            write_timeout: config.write_timeout,
            batch_timeout: config.batch_timeout,
        };
        let orchestrator = IngestOrchestrator::with_config(writer, recorder, orchestrator_config);

        let reader = SearchReader::new(search_client, config.index_name.clone());

        Ok(Self {
            orchestrator,
            reader,
        })
    }
}
