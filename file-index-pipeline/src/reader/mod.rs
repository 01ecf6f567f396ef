//! Search reader for the file index.
//!
//! Runs queries against the search index and turns hits back into typed
//! file documents.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use crate::errors::ReadError;
use file_index_repository::{FileQuery, RawHit, SearchIndexError, SearchIndexProvider};
use file_index_shared::{FileDocument, SearchPage};

/// Reader over the file search index.
///
/// Queries are all-or-nothing: a single malformed hit fails the whole call.
pub struct SearchReader {
    index: Arc<dyn SearchIndexProvider>,
    index_name: String,
    query_timeout: Duration,
}

impl SearchReader {
    /// Create a new reader over `index_name`.
    pub fn new(index: Arc<dyn SearchIndexProvider>, index_name: impl Into<String>) -> Self {
        Self {
            index,
            index_name: index_name.into(),
            query_timeout: Duration::from_secs(10),
        }
    }

    /// Set the deadline for one query.
    pub fn with_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    /// Run a query written in the index's native query language.
    ///
    /// `total` in the result is the count reported by the index, not the
    /// length of `list`.
    #[instrument(skip(self, query))]
    pub async fn search(&self, query: &Value) -> Result<SearchPage, ReadError> {
        let response = timeout(self.query_timeout, self.index.search(&self.index_name, query))
            .await
            .map_err(|_| SearchIndexError::timeout(self.query_timeout))??;

        let list = response
            .hits
            .into_iter()
            .map(to_document)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(returned = list.len(), total = response.total, "Search completed");
        Ok(SearchPage {
            list,
            total: response.total,
        })
    }

    /// Full-text search on display names, one page at a time.
    pub async fn search_by_name(
        &self,
        text: &str,
        from: u64,
        size: u64,
    ) -> Result<SearchPage, ReadError> {
        let query = FileQuery::name_matches(text).from(from).size(size).build();
        self.search(&query).await
    }

    /// Look up the document with exactly this identity.
    ///
    /// Several documents sharing one identity is reported as
    /// [`ReadError::DuplicateFound`], never resolved by picking one.
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: &str) -> Result<FileDocument, ReadError> {
        let page = self.search(&FileQuery::by_id(id).build()).await?;
        let mut list = page.list;

        match list.len() {
            0 => Err(ReadError::NotFound(id.to_string())),
            1 => Ok(list.remove(0)),
            count => {
                warn!(id = %id, count = count, "Duplicate documents for one identity");
                Err(ReadError::DuplicateFound {
                    id: id.to_string(),
                    count,
                })
            }
        }
    }
}

fn to_document(hit: RawHit) -> Result<FileDocument, ReadError> {
    let RawHit { id, source } = hit;
    serde_json::from_value(source).map_err(|e| ReadError::Deserialization {
        id,
        message: e.to_string(),
    })
}
