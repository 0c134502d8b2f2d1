//! The document URL cache.
//!
//! An in-memory map of entries behind a `tokio` RwLock, mirrored to
//! durable storage on every mutation. The persistence granularity is a
//! configuration choice: a whole-store JSON blob (rewritten wholesale on
//! each write), a per-key SQLite database, or nothing at all.
//!
//! Persistence is best-effort: failures are logged and the cache keeps
//! serving from memory for the rest of the session. Expired entries are
//! dropped at load time, before the store becomes readable.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use super::db::CacheDb;
use super::entry::CacheEntry;
use crate::Error;
use crate::config::{AppConfig, PersistenceMode};
use crate::document::DocumentRecord;

/// Whole-store JSON blob file, keyed by stringified document id.
#[derive(Debug)]
struct BlobFile {
    path: PathBuf,
}

impl BlobFile {
    fn load(&self) -> Result<HashMap<i64, CacheEntry>, Error> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let raw = std::fs::read_to_string(&self.path).map_err(|e| Error::Persistence(e.to_string()))?;
        serde_json::from_str(&raw).map_err(|e| Error::Persistence(e.to_string()))
    }

    fn save(&self, entries: &HashMap<i64, CacheEntry>) -> Result<(), Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::Persistence(e.to_string()))?;
        }
        let raw = serde_json::to_string(entries).map_err(|e| Error::Persistence(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| Error::Persistence(e.to_string()))
    }

    fn wipe(&self) -> Result<(), Error> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).map_err(|e| Error::Persistence(e.to_string()))?;
        }
        Ok(())
    }
}

#[derive(Debug)]
enum Backend {
    Memory,
    WholeStore(BlobFile),
    PerKey(CacheDb),
}

/// Persisted TTL cache mapping document ids to resolved preview URLs.
#[derive(Debug)]
pub struct DocumentCache {
    entries: RwLock<HashMap<i64, CacheEntry>>,
    backend: Backend,
    ttl: Duration,
}

impl DocumentCache {
    /// Open the cache with the configured persistence backend.
    ///
    /// Never fails: a backend that cannot be opened or parsed is logged
    /// and the cache starts empty (memory-only where the backend itself
    /// is unusable). Expired entries are pruned before the store becomes
    /// readable.
    pub async fn open(config: &AppConfig) -> Self {
        let ttl = config.cache_ttl();
        let now = Utc::now();

        let (backend, loaded) = match config.persistence {
            PersistenceMode::Memory => (Backend::Memory, HashMap::new()),
            PersistenceMode::WholeStore => {
                let blob = BlobFile { path: config.cache_path.clone() };
                let loaded = match blob.load() {
                    Ok(entries) => entries,
                    Err(e) => {
                        tracing::warn!("failed to load cache blob, starting empty: {e}");
                        HashMap::new()
                    }
                };
                (Backend::WholeStore(blob), loaded)
            }
            PersistenceMode::PerKey => match CacheDb::open(&config.cache_path).await {
                Ok(db) => {
                    if let Err(e) = db.delete_stale(now - ttl).await {
                        tracing::warn!("failed to prune expired cache rows: {e}");
                    }
                    let loaded = match db.load_entries().await {
                        Ok(entries) => entries.into_iter().map(|e| (e.document_id, e)).collect(),
                        Err(e) => {
                            tracing::warn!("failed to load cache rows, starting empty: {e}");
                            HashMap::new()
                        }
                    };
                    (Backend::PerKey(db), loaded)
                }
                Err(e) => {
                    tracing::warn!("failed to open cache database, continuing memory-only: {e}");
                    (Backend::Memory, HashMap::new())
                }
            },
        };

        let cache = Self { entries: RwLock::new(loaded), backend, ttl };
        cache.prune_expired_at(now).await;
        cache
    }

    /// An unpersisted cache, for tests and for callers that disable storage.
    pub fn in_memory(ttl: Duration) -> Self {
        Self { entries: RwLock::new(HashMap::new()), backend: Backend::Memory, ttl }
    }

    /// The TTL entries are held to.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a usable entry for `doc`.
    ///
    /// Returns `Some` only when the stored entry passes the admissibility
    /// invariant; a stale, invalid, or fingerprint-mismatched entry is
    /// reported as a miss.
    pub async fn get(&self, doc: &DocumentRecord) -> Option<CacheEntry> {
        self.get_at(doc, Utc::now()).await
    }

    /// Admissibility-checked lookup against an explicit clock.
    pub async fn get_at(&self, doc: &DocumentRecord, now: DateTime<Utc>) -> Option<CacheEntry> {
        let entries = self.entries.read().await;
        match entries.get(&doc.id) {
            Some(entry) if entry.is_admissible(doc, self.ttl, now) => {
                tracing::debug!("cache hit for document {}", doc.id);
                Some(entry.clone())
            }
            Some(_) => {
                tracing::debug!("cache entry for document {} inadmissible, treating as miss", doc.id);
                None
            }
            None => {
                tracing::debug!("cache miss for document {}", doc.id);
                None
            }
        }
    }

    /// Unconditionally overwrite the entry for a document.
    pub async fn put(&self, entry: CacheEntry) {
        let mut entries = self.entries.write().await;
        entries.insert(entry.document_id, entry.clone());
        match &self.backend {
            Backend::Memory => {}
            Backend::WholeStore(blob) => {
                if let Err(e) = blob.save(&entries) {
                    tracing::warn!("cache persistence failed, continuing memory-only: {e}");
                }
            }
            Backend::PerKey(db) => {
                if let Err(e) = db.upsert_entry(&entry).await {
                    tracing::warn!("cache persistence failed, continuing memory-only: {e}");
                }
            }
        }
    }

    /// Remove one entry.
    pub async fn invalidate(&self, document_id: i64) {
        let mut entries = self.entries.write().await;
        if entries.remove(&document_id).is_none() {
            return;
        }
        match &self.backend {
            Backend::Memory => {}
            Backend::WholeStore(blob) => {
                if let Err(e) = blob.save(&entries) {
                    tracing::warn!("cache persistence failed after invalidation: {e}");
                }
            }
            Backend::PerKey(db) => {
                if let Err(e) = db.delete_entry(document_id).await {
                    tracing::warn!("cache persistence failed after invalidation: {e}");
                }
            }
        }
    }

    /// Empty the store and wipe persisted state.
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
        match &self.backend {
            Backend::Memory => {}
            Backend::WholeStore(blob) => {
                if let Err(e) = blob.wipe() {
                    tracing::warn!("failed to wipe cache blob: {e}");
                }
            }
            Backend::PerKey(db) => {
                if let Err(e) = db.clear_entries().await {
                    tracing::warn!("failed to clear cache rows: {e}");
                }
            }
        }
    }

    /// Drop TTL-expired entries. Returns how many were removed.
    pub async fn prune_expired(&self) -> usize {
        self.prune_expired_at(Utc::now()).await
    }

    async fn prune_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(self.ttl, now));
        let removed = before - entries.len();

        if removed > 0 {
            tracing::debug!("pruned {removed} expired cache entries");
            match &self.backend {
                Backend::Memory => {}
                Backend::WholeStore(blob) => {
                    if let Err(e) = blob.save(&entries) {
                        tracing::warn!("cache persistence failed after prune: {e}");
                    }
                }
                Backend::PerKey(db) => {
                    if let Err(e) = db.delete_stale(now - self.ttl).await {
                        tracing::warn!("cache persistence failed after prune: {e}");
                    }
                }
            }
        }
        removed
    }

    /// Number of resident entries, admissible or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
