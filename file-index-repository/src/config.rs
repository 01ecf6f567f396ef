//! Configuration types for the document store connection pool.

use std::time::Duration;

/// Configuration for the PostgreSQL document store.
#[derive(Debug, Clone)]
pub struct DocumentStoreConfig {
    /// Maximum number of pooled connections.
    pub max_connections: u32,
    /// Minimum number of idle connections kept open.
    pub min_connections: u32,
    /// How long to wait for a free connection before failing.
    pub acquire_timeout: Duration,
}

impl Default for DocumentStoreConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

impl DocumentStoreConfig {
    /// Create a config with a custom pool size.
    pub fn with_max_connections(max_connections: u32) -> Self {
        Self {
            max_connections,
            ..Self::default()
        }
    }
}
