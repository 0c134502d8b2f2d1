//! Viewer selection and orchestration.
//!
//! `PreviewService` runs the per-document view state machine: classify,
//! look up the cache, resolve and validate on a miss (deduplicating
//! concurrent resolutions per document id), and hand the caller either an
//! inline plan with a confidence-tagged URL or a download plan.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use bienestar_client::{UrlResolver, Validator};
use bienestar_core::{AppConfig, CacheEntry, DocumentCache, DocumentRecord, Error};
use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::classify::{ViewerKind, classify};

/// A resolved preview URL with its confidence level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewUrl {
    /// Reachability confirmed, or trusted-domain exempt.
    Validated(String),
    /// Not confirmed: another resolution was in flight, or the probe
    /// failed. The renderer's own error channel is the final authority.
    Pending(String),
}

impl PreviewUrl {
    pub fn as_str(&self) -> &str {
        match self {
            PreviewUrl::Validated(url) | PreviewUrl::Pending(url) => url,
        }
    }
}

/// Presentation plan for one document view request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewPlan {
    /// Render inline with the given viewer.
    Inline { kind: ViewerKind, url: PreviewUrl },
    /// No inline preview; hand off to the download collaborator.
    Download,
}

/// Orchestrates classification, cache lookups, resolution, and validation.
///
/// Explicitly constructed and explicitly disposed; holds no ambient
/// state. One instance serializes probes per document id; separate
/// instances (or processes) coordinate only through the persisted store,
/// observed at load time.
pub struct PreviewService {
    cache: Arc<DocumentCache>,
    resolver: UrlResolver,
    validator: Validator,
    in_flight: Mutex<HashSet<i64>>,
    maintenance: Option<JoinHandle<()>>,
}

impl PreviewService {
    /// Assemble a service from its parts. No background task is started.
    pub fn new(cache: Arc<DocumentCache>, resolver: UrlResolver, validator: Validator) -> Self {
        Self { cache, resolver, validator, in_flight: Mutex::new(HashSet::new()), maintenance: None }
    }

    /// Build from configuration: open the cache, wire the resolver and
    /// validator, and spawn the maintenance task when an interval is set.
    pub async fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let cache = Arc::new(DocumentCache::open(config).await);
        let resolver = UrlResolver::from_config(config);
        let validator = Validator::from_config(config)?;

        let mut service = Self::new(cache, resolver, validator);
        if config.prune_interval_secs > 0 {
            service.maintenance = Some(Self::spawn_maintenance(
                service.cache.clone(),
                Duration::from_secs(config.prune_interval_secs),
            ));
        }
        Ok(service)
    }

    fn spawn_maintenance(cache: Arc<DocumentCache>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(every);
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tick.tick().await;
                cache.prune_expired().await;
            }
        })
    }

    /// Decide how to present `doc`, resolving and validating as needed.
    ///
    /// Never fails: probe and persistence problems degrade the result
    /// (a `Pending` URL, a memory-only cache) instead of erroring.
    pub async fn view(&self, doc: &DocumentRecord) -> ViewPlan {
        let kind = classify(&doc.content_type);
        if kind == ViewerKind::Download {
            return ViewPlan::Download;
        }

        if let Some(entry) = self.cache.get(doc).await {
            return ViewPlan::Inline { kind, url: PreviewUrl::Validated(entry.resolved_url) };
        }

        let url = self.resolver.resolve(doc);

        {
            let mut in_flight = self.in_flight.lock().await;
            if !in_flight.insert(doc.id) {
                // another request is already probing this document;
                // serve the resolved URL optimistically
                tracing::debug!("resolution in flight for document {}, returning pending URL", doc.id);
                return ViewPlan::Inline { kind, url: PreviewUrl::Pending(url) };
            }
        }

        let is_valid = self.validator.validate(&url).await;
        self.cache.put(CacheEntry::new(doc, url.clone(), is_valid, Utc::now())).await;
        self.in_flight.lock().await.remove(&doc.id);

        let url = if is_valid { PreviewUrl::Validated(url) } else { PreviewUrl::Pending(url) };
        ViewPlan::Inline { kind, url }
    }

    /// Record a renderer-reported load failure.
    ///
    /// Drops the cache entry so the next view re-resolves; the caller
    /// offers the retry and download fallback.
    pub async fn report_render_failure(&self, document_id: i64) {
        tracing::debug!("render failure reported for document {document_id}");
        self.cache.invalidate(document_id).await;
    }

    /// The underlying cache, for operational surfaces (prune, clear).
    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    /// Stop background maintenance and release the in-flight set.
    ///
    /// Resolutions already started simply run to completion and write
    /// their entries; callers must guard on current document identity
    /// before applying late results.
    pub async fn dispose(&mut self) {
        if let Some(task) = self.maintenance.take() {
            task.abort();
        }
        self.in_flight.lock().await.clear();
    }
}

impl Drop for PreviewService {
    fn drop(&mut self) {
        if let Some(task) = &self.maintenance {
            task.abort();
        }
    }
}
