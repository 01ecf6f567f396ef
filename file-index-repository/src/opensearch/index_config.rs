//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for the file search index.

use serde_json::{json, Value};

/// The default name of the file search index.
pub const DEFAULT_INDEX_NAME: &str = "file";

/// Get the index settings and mappings for the file search index.
///
/// The configuration includes:
/// - **Keyword fields**: `id` for exact identity lookups, `path` for filtering
/// - **search_as_you_type**: the display name, with a `raw` keyword subfield
///   for exact name matches and sorting
pub fn get_index_settings() -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "properties": {
                "id": {
                    "type": "keyword"
                },
                "name": {
                    "type": "search_as_you_type",
                    "fields": {
                        "raw": {
                            "type": "keyword"
                        }
                    }
                },
                "path": {
                    "type": "keyword"
                }
            }
        }
    })
}
