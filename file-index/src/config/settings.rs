//! Settings read from the environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::AppError;
use file_index_pipeline::recorder::DEFAULT_COLLECTION;
use file_index_repository::opensearch::DEFAULT_INDEX_NAME;

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default root directory for stored files.
const DEFAULT_STORAGE_ROOT: &str = "/tmp";

/// Runtime settings for the file index.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub opensearch_url: String,
    pub database_url: String,
    pub index_name: String,
    pub collection: String,
    pub storage_root: PathBuf,
    /// Whether recorded files are projected into the search index.
    pub index_projection: bool,
    pub ingest_concurrency: usize,
    pub store_timeout: Duration,
    /// Deadline for writing one file's content.
    pub write_timeout: Option<Duration>,
    pub batch_timeout: Option<Duration>,
}

impl AppConfig {
    /// Read settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `DATABASE_URL`: Postgres connection URL (required)
    /// - `FILE_INDEX_NAME`: search index name (default: file)
    /// - `FILE_COLLECTION`: document collection (default: files)
    /// - `STORAGE_ROOT`: directory for stored files (default: /tmp)
    /// - `INDEX_PROJECTION`: project records into the index (default: true)
    /// - `INGEST_CONCURRENCY`: files processed at once (default: 4)
    /// - `STORE_TIMEOUT_SECS`: document store deadline (default: 5)
    /// - `WRITE_TIMEOUT_SECS`: per-file content write deadline (default: none)
    /// - `BATCH_TIMEOUT_SECS`: batch deadline (default: none)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which returns `None` for unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| AppError::config("DATABASE_URL must be set"))?;

        let write_timeout = optional_secs(&lookup, "WRITE_TIMEOUT_SECS")?;
        let batch_timeout = optional_secs(&lookup, "BATCH_TIMEOUT_SECS")?;

        Ok(Self {
            opensearch_url: lookup("OPENSEARCH_URL")
                .unwrap_or_else(|| DEFAULT_OPENSEARCH_URL.to_string()),
            database_url,
            index_name: lookup("FILE_INDEX_NAME").unwrap_or_else(|| DEFAULT_INDEX_NAME.to_string()),
            collection: lookup("FILE_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            storage_root: PathBuf::from(
                lookup("STORAGE_ROOT").unwrap_or_else(|| DEFAULT_STORAGE_ROOT.to_string()),
            ),
            index_projection: parse_or(&lookup, "INDEX_PROJECTION", true)?,
            ingest_concurrency: parse_or(&lookup, "INGEST_CONCURRENCY", 4)?,
            store_timeout: Duration::from_secs(parse_or(&lookup, "STORE_TIMEOUT_SECS", 5)?),
            write_timeout,
            batch_timeout,
        })
    }
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::config(format!("invalid value for {}: {:?}", key, raw)))
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError> {
    match lookup(key) {
        Some(raw) => parse(key, &raw),
        None => Ok(default),
    }
}

fn optional_secs(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<Duration>, AppError> {
    match lookup(key) {
        Some(raw) => Ok(Some(Duration::from_secs(parse(key, &raw)?))),
        None => Ok(None),
    }
}
