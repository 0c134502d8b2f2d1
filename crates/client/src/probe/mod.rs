//! Reachability validation for resolved URLs.
//!
//! URLs on a trusted remote object-storage domain are assumed reachable
//! without a network round-trip; everything else gets a lightweight HEAD
//! probe. Validation never surfaces an error: any transport failure or
//! non-success status reads as "not reachable".

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bienestar_core::{AppConfig, Error};

use crate::resolve::is_trusted_url;

/// Existence probe for a URL.
///
/// Seam between the validator and the transport, so tests can count
/// probe calls and simulate failures without a network.
#[async_trait]
pub trait UrlProber: Send + Sync {
    /// True when the URL answers with a success status.
    async fn exists(&self, url: &str) -> Result<bool, Error>;
}

/// HEAD-request prober backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpProber {
    http: reqwest::Client,
}

impl HttpProber {
    /// Create a prober with the given identity and timeout.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .use_rustls_tls()
            .build()
            .map_err(|e| Error::HttpError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        Self::new(&config.user_agent, config.probe_timeout())
    }
}

#[async_trait]
impl UrlProber for HttpProber {
    async fn exists(&self, url: &str) -> Result<bool, Error> {
        let response = self
            .http
            .head(url)
            .send()
            .await
            .map_err(|e| Error::HttpError(format!("probe failed: {e}")))?;

        Ok(response.status().is_success())
    }
}

/// Reachability validator with the trusted-domain shortcut.
pub struct Validator {
    prober: Arc<dyn UrlProber>,
    trusted_domains: Vec<String>,
}

impl Validator {
    pub fn new(prober: Arc<dyn UrlProber>, trusted_domains: Vec<String>) -> Self {
        Self { prober, trusted_domains }
    }

    /// Validator using the HEAD prober configured from `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        Ok(Self::new(Arc::new(HttpProber::from_config(config)?), config.trusted_domains.clone()))
    }

    /// Determine reachability of a resolved URL.
    ///
    /// Trusted-domain URLs are valid without a probe. Probe errors are
    /// caught and converted into `false`; this method cannot fail.
    pub async fn validate(&self, url: &str) -> bool {
        if is_trusted_url(url, &self.trusted_domains) {
            tracing::debug!("trusted domain, skipping probe for {url}");
            return true;
        }

        match self.prober.exists(url).await {
            Ok(reachable) => reachable,
            Err(e) => {
                tracing::debug!("probe error for {url}: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted prober that records how many times it was called.
    struct CountingProber {
        calls: AtomicUsize,
        result: Result<bool, ()>,
    }

    impl CountingProber {
        fn returning(result: Result<bool, ()>) -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), result })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UrlProber for CountingProber {
        async fn exists(&self, _url: &str) -> Result<bool, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.map_err(|()| Error::HttpError("simulated failure".to_string()))
        }
    }

    fn trusted() -> Vec<String> {
        vec!["s3.amazonaws.com".to_string()]
    }

    #[tokio::test]
    async fn test_trusted_domain_skips_probe() {
        let prober = CountingProber::returning(Ok(false));
        let validator = Validator::new(prober.clone(), trusted());

        assert!(validator.validate("https://bucket.s3.amazonaws.com/f.pdf").await);
        assert_eq!(prober.calls(), 0);
    }

    #[tokio::test]
    async fn test_untrusted_url_is_probed_once() {
        let prober = CountingProber::returning(Ok(true));
        let validator = Validator::new(prober.clone(), trusted());

        assert!(validator.validate("http://intranet.local/files/a.pdf").await);
        assert_eq!(prober.calls(), 1);
    }

    #[tokio::test]
    async fn test_non_success_reads_as_unreachable() {
        let prober = CountingProber::returning(Ok(false));
        let validator = Validator::new(prober.clone(), trusted());

        assert!(!validator.validate("http://intranet.local/files/missing.pdf").await);
    }

    #[tokio::test]
    async fn test_probe_error_reads_as_unreachable() {
        let prober = CountingProber::returning(Err(()));
        let validator = Validator::new(prober.clone(), trusted());

        assert!(!validator.validate("http://intranet.local/files/a.pdf").await);
        assert_eq!(prober.calls(), 1);
    }

    #[tokio::test]
    async fn test_http_prober_builds() {
        let prober = HttpProber::new("bienestar-docs/0.1", Duration::from_secs(5));
        assert!(prober.is_ok());
    }
}
