//! Staleness fingerprints for cached document URLs.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::document::DocumentRecord;

/// Compute the staleness fingerprint for a document.
///
/// The fingerprint covers identity, storage location, and last modification
/// time, so an edit or re-upload always produces a new value.
pub fn compute_fingerprint(id: i64, storage_path: &str, last_modified: DateTime<Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(id.to_string().as_bytes());
    hasher.update(b"\n");
    hasher.update(storage_path.as_bytes());
    hasher.update(b"\n");
    hasher.update(last_modified.to_rfc3339().as_bytes());
    hex::encode(hasher.finalize())
}

/// Fingerprint of a full record, using its effective modification time.
pub fn fingerprint_record(doc: &DocumentRecord) -> String {
    compute_fingerprint(doc.id, &doc.storage_path, doc.last_modified())
}
