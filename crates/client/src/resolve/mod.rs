//! Preview URL resolution.
//!
//! Derives a directly fetchable URL for a document's underlying file.
//! Storage paths on a trusted remote object-storage domain pass through
//! unchanged; anything else is treated as a local filename and composed
//! with the local file-serving endpoint. Resolution never fails: a
//! malformed path degrades to a best-effort URL that the downstream
//! reachability check will reject.

use bienestar_core::{AppConfig, DocumentRecord};
use url::Url;

/// Check whether `raw` is an absolute http(s) URL whose host is on one of
/// the trusted remote object-storage domains (exact match or subdomain).
pub fn is_trusted_url(raw: &str, trusted_domains: &[String]) -> bool {
    let Ok(parsed) = Url::parse(raw) else {
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();

    trusted_domains.iter().any(|domain| {
        let domain = domain.trim_start_matches('.').to_ascii_lowercase();
        host == domain || host.ends_with(&format!(".{domain}"))
    })
}

/// Final path segment of a storage path, for either separator style.
fn file_name(storage_path: &str) -> &str {
    storage_path.rsplit(['/', '\\']).next().unwrap_or(storage_path)
}

/// Resolves document storage paths to fetchable URLs.
#[derive(Debug, Clone)]
pub struct UrlResolver {
    local_base: String,
    trusted_domains: Vec<String>,
}

impl UrlResolver {
    /// Create a resolver over a local file-serving base endpoint.
    pub fn new(local_base: impl Into<String>, trusted_domains: Vec<String>) -> Self {
        Self { local_base: local_base.into(), trusted_domains }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.local_files_base_url.clone(), config.trusted_domains.clone())
    }

    /// Resolve a record to a directly fetchable URL.
    ///
    /// Trusted remote URLs are returned unchanged. Everything else is
    /// reduced to its final path segment, percent-encoded, and appended
    /// to the local file-serving endpoint.
    pub fn resolve(&self, doc: &DocumentRecord) -> String {
        if is_trusted_url(&doc.storage_path, &self.trusted_domains) {
            return doc.storage_path.clone();
        }

        let name = file_name(&doc.storage_path);

        if let Ok(mut base) = Url::parse(&self.local_base) {
            let pushed = base
                .path_segments_mut()
                .map(|mut segments| {
                    segments.pop_if_empty().push(name);
                })
                .is_ok();
            if pushed {
                return base.to_string();
            }
        }

        // Unparseable or cannot-be-a-base endpoint: best-effort composition.
        let encoded: String = url::form_urlencoded::byte_serialize(name.as_bytes()).collect();
        format!("{}/{}", self.local_base.trim_end_matches('/'), encoded)
    }
}
