//! Document metadata API response types.

use bienestar_core::DocumentRecord;
use serde::Deserialize;

/// One page of document records.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentPage {
    pub items: Vec<DocumentRecord>,

    /// Total matching records across all pages.
    #[serde(default)]
    #[serde(alias = "totalCount")]
    pub total: u64,

    /// Zero-based index of this page.
    #[serde(default)]
    pub page: u32,
}
