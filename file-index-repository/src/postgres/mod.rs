//! PostgreSQL implementation of the document store.
//!
//! Documents are stored as JSONB rows in a single `documents` table keyed
//! by `(collection, id)`. The schema is applied by the embedded migrations
//! when connecting.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, instrument};

use crate::config::DocumentStoreConfig;
use crate::errors::DocumentStoreError;
use crate::interfaces::DocumentStore;
use file_index_shared::new_file_id;

/// Document store backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    /// Connect to `url` and apply pending migrations.
    pub async fn connect(url: &str, config: &DocumentStoreConfig) -> Result<Self, DocumentStoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(url)
            .await
            .map_err(|e| DocumentStoreError::connection(e.to_string()))?;

        info!("Connected to PostgreSQL");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| DocumentStoreError::connection(format!("Migration failed: {}", e)))?;

        info!("Document store migrations applied");

        Ok(Self { pool })
    }

    /// Wrap an existing pool. The schema must already be in place.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Read the `_id` of `document`, assigning a fresh one if absent.
fn assign_id(document: &mut Value) -> Result<String, DocumentStoreError> {
    let object = document
        .as_object_mut()
        .ok_or_else(|| DocumentStoreError::invalid_document("document must be a JSON object"))?;

    match object.get("_id") {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        Some(Value::Null) | None => {
            let id = new_file_id();
            object.insert("_id".to_string(), Value::String(id.clone()));
            Ok(id)
        }
        Some(other) => Err(DocumentStoreError::invalid_document(format!(
            "_id must be a non-empty string, got {}",
            other
        ))),
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    #[instrument(skip(self, document))]
    async fn insert_one(
        &self,
        collection: &str,
        mut document: Value,
    ) -> Result<String, DocumentStoreError> {
        let id = assign_id(&mut document)?;

        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(&id)
            .bind(&document)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    DocumentStoreError::DuplicateId {
                        collection: collection.to_string(),
                        id: id.clone(),
                    }
                }
                other => DocumentStoreError::database(other.to_string()),
            })?;

        debug!(collection = %collection, id = %id, "Document inserted");
        Ok(id)
    }

    async fn find_one(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Value>, DocumentStoreError> {
        sqlx::query_scalar::<_, Value>("SELECT body FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DocumentStoreError::database(e.to_string()))
    }
}
