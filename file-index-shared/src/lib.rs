//! # File Index Shared
//!
//! Data types shared by the repository adapters and the ingestion pipeline:
//! the canonical file record kept in the primary store, the document
//! projected into the search index, and the storage path derivation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The canonical metadata record for an ingested file.
///
/// This is the store-of-record shape. The display name is kept exactly as
/// uploaded; only the storage path is derived from a normalized form of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Globally unique identity, immutable once assigned.
    #[serde(rename = "_id")]
    pub id: String,
    /// Display name as provided by the uploader.
    pub name: String,
    /// Opaque handle to the stored blob.
    pub path: String,
}

impl FileRecord {
    /// Create a record with an already assigned identity.
    pub fn new(id: impl Into<String>, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            path: path.into(),
        }
    }

    /// Build the search projection of this record.
    pub fn to_document(&self) -> FileDocument {
        FileDocument::new(&self.id, &self.name, &self.path)
    }
}

/// The denormalized copy of a [`FileRecord`] held by the search index.
///
/// Not transactionally linked to the record it was derived from: it may be
/// missing or stale relative to the primary store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDocument {
    pub id: String,
    pub name: String,
    pub path: String,
}

impl FileDocument {
    /// Create a new file document.
    pub fn new(id: impl Into<String>, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            path: path.into(),
        }
    }
}

/// A page of search results.
///
/// `total` is the hit count reported by the index. It is authoritative and
/// may exceed `list.len()` when the query is paginated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    pub list: Vec<FileDocument>,
    pub total: u64,
}

impl SearchPage {
    /// Create an empty page.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Generate a new file identity.
///
/// Used when the primary store does not assign identities itself.
pub fn new_file_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Normalize a display name into a storage file name.
///
/// Lower-cases the name and replaces spaces with underscores.
pub fn normalize_file_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// Reduce a display name to the file name it is stored under.
///
/// Only the last path component of the name is kept, so the result can
/// never name a directory or climb out of the storage root. Returns `None`
/// when nothing usable remains (`""`, `"."`, `".."`, a trailing separator,
/// or an embedded NUL).
pub fn storage_file_name(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    match base {
        "" | "." | ".." => None,
        _ if base.contains('\0') => None,
        _ => Some(normalize_file_name(base)),
    }
}

/// Derive the storage location of a file under `root`.
///
/// The location is always a direct child of `root`; see [`storage_file_name`].
pub fn storage_location(root: &Path, name: &str) -> Option<PathBuf> {
    storage_file_name(name).map(|file_name| root.join(file_name))
}
