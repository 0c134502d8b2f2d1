//! Document metadata records as served by the intranet API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document record from the metadata API.
///
/// Read-only input to the preview subsystem: the cache derives its
/// staleness fingerprint from `id`, `storage_path`, and the effective
/// modification time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: i64,
    pub title: String,

    /// Either a fully-qualified remote object-storage URL or a local
    /// filename fragment served by the local files endpoint.
    #[serde(alias = "storagePath")]
    pub storage_path: String,

    /// Declared MIME type; drives viewer classification.
    #[serde(alias = "contentType")]
    pub content_type: String,

    #[serde(default)]
    #[serde(alias = "sizeBytes")]
    pub size_bytes: Option<u64>,

    #[serde(default)]
    #[serde(alias = "categoryId")]
    pub category_id: Option<i64>,

    #[serde(default)]
    #[serde(alias = "tagIds")]
    pub tag_ids: Vec<i64>,

    /// Business-group partition tag.
    #[serde(default)]
    pub group: Option<String>,

    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    #[serde(alias = "updatedAt")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl DocumentRecord {
    /// Timestamp used for staleness fingerprinting.
    ///
    /// Falls back to the creation time for records that were never edited.
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.updated_at.unwrap_or(self.created_at)
    }
}
