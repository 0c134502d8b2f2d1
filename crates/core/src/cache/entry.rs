//! Cache entries and the admissibility invariant.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::fingerprint::fingerprint_record;
use crate::document::DocumentRecord;

/// A cached resolution for one document.
///
/// Overwritten wholesale on every re-resolution; there is no separate
/// update path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub document_id: i64,

    /// The directly fetchable URL produced by the resolver.
    pub resolved_url: String,

    /// Staleness fingerprint of the record this entry was resolved from.
    pub fingerprint: String,

    /// When the reachability check last ran.
    pub validated_at: DateTime<Utc>,

    /// Outcome of the last reachability check.
    pub is_valid: bool,
}

impl CacheEntry {
    /// Build an entry for `doc` resolved to `resolved_url`.
    pub fn new(
        doc: &DocumentRecord, resolved_url: impl Into<String>, is_valid: bool, validated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            document_id: doc.id,
            resolved_url: resolved_url.into(),
            fingerprint: fingerprint_record(doc),
            validated_at,
            is_valid,
        }
    }

    /// Whether the entry is still within its TTL at `now`.
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.validated_at < ttl
    }

    /// Full cache-hit check: the entry is usable only if its fingerprint
    /// matches the current record, the last check succeeded, and it is
    /// still fresh. Anything else counts as a miss.
    pub fn is_admissible(&self, doc: &DocumentRecord, ttl: Duration, now: DateTime<Utc>) -> bool {
        self.is_valid && self.is_fresh(ttl, now) && self.fingerprint == fingerprint_record(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> DocumentRecord {
        DocumentRecord {
            id: 9,
            title: "Report".to_string(),
            storage_path: "files/report.docx".to_string(),
            content_type: "application/vnd.openxmlformats-officedocument.wordprocessingml.document".to_string(),
            size_bytes: None,
            category_id: None,
            tag_ids: vec![],
            group: None,
            created_at: "2026-01-01T00:00:00Z".parse().unwrap(),
            updated_at: None,
        }
    }

    fn t(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn test_admissible_within_ttl() {
        let doc = record();
        let entry = CacheEntry::new(&doc, "http://files.local/report.docx", true, t("2026-05-01T12:00:00Z"));
        assert!(entry.is_admissible(&doc, Duration::seconds(300), t("2026-05-01T12:04:59Z")));
    }

    #[test]
    fn test_expired_at_exactly_ttl() {
        let doc = record();
        let entry = CacheEntry::new(&doc, "http://files.local/report.docx", true, t("2026-05-01T12:00:00Z"));
        assert!(!entry.is_fresh(Duration::seconds(300), t("2026-05-01T12:05:00Z")));
        assert!(!entry.is_admissible(&doc, Duration::seconds(300), t("2026-05-01T12:05:00Z")));
    }

    #[test]
    fn test_invalid_entry_never_admissible() {
        let doc = record();
        let entry = CacheEntry::new(&doc, "http://files.local/report.docx", false, t("2026-05-01T12:00:00Z"));
        assert!(!entry.is_admissible(&doc, Duration::seconds(300), t("2026-05-01T12:00:01Z")));
    }

    #[test]
    fn test_fingerprint_mismatch_after_edit() {
        let mut doc = record();
        let entry = CacheEntry::new(&doc, "http://files.local/report.docx", true, t("2026-05-01T12:00:00Z"));
        doc.updated_at = Some(t("2026-05-01T12:01:00Z"));
        assert!(!entry.is_admissible(&doc, Duration::seconds(300), t("2026-05-01T12:01:30Z")));
    }

    #[test]
    fn test_entry_roundtrips_through_json() {
        let doc = record();
        let entry = CacheEntry::new(&doc, "http://files.local/report.docx", true, t("2026-05-01T12:00:00Z"));
        let json = serde_json::to_string(&entry).unwrap();
        let back: CacheEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.document_id, entry.document_id);
        assert_eq!(back.fingerprint, entry.fingerprint);
        assert_eq!(back.validated_at, entry.validated_at);
        assert!(back.is_valid);
    }
}
