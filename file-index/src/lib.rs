//! # File Index
//!
//! Main library for the file index service.
//!
//! This crate provides the configuration and dependency wiring for running
//! the ingestion pipeline and the search reader against real stores.

pub mod config;

pub use config::{AppConfig, Dependencies};

use thiserror::Error;

/// Errors that can occur during startup.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Search index error.
    #[error("Search index error: {0}")]
    SearchIndexError(#[from] file_index_repository::SearchIndexError),

    /// Document store error.
    #[error("Document store error: {0}")]
    DocumentStoreError(#[from] file_index_repository::DocumentStoreError),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
