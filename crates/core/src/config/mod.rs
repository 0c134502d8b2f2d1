//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (BIENESTAR_*)
//! 2. TOML config file (if BIENESTAR_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Where (and how) cache entries are persisted between sessions.
///
/// Whole-store rewrites the entire blob on every mutation, matching the
/// storage layout of small client-side caches; per-key scales past a few
/// hundred entries by touching only the affected row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PersistenceMode {
    /// Single JSON blob, fully rewritten on every mutation.
    WholeStore,
    /// SQLite database with one row per entry.
    PerKey,
    /// No durability; entries live only for the process lifetime.
    Memory,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (BIENESTAR_*)
/// 2. TOML config file (if BIENESTAR_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the document metadata / download API.
    ///
    /// Set via BIENESTAR_API_BASE_URL environment variable.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Base URL of the local file-serving endpoint, used for storage
    /// paths that are plain filenames rather than remote URLs.
    ///
    /// Set via BIENESTAR_LOCAL_FILES_BASE_URL environment variable.
    #[serde(default = "default_local_files_base_url")]
    pub local_files_base_url: String,

    /// Trusted remote object-storage domains. URLs on these hosts are
    /// returned unchanged by the resolver and exempted from probing.
    ///
    /// Set via BIENESTAR_TRUSTED_DOMAINS environment variable (comma-separated).
    #[serde(default = "default_trusted_domains")]
    pub trusted_domains: Vec<String>,

    /// How long a validated entry remains trusted, in seconds.
    ///
    /// Set via BIENESTAR_CACHE_TTL_SECS environment variable.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Path to the persisted cache (JSON blob or SQLite file, depending
    /// on the persistence mode).
    ///
    /// Set via BIENESTAR_CACHE_PATH environment variable.
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// Persistence granularity for the cache store.
    ///
    /// Set via BIENESTAR_PERSISTENCE environment variable
    /// (whole-store | per-key | memory).
    #[serde(default = "default_persistence")]
    pub persistence: PersistenceMode,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via BIENESTAR_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// API request timeout in milliseconds.
    ///
    /// Set via BIENESTAR_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Reachability probe timeout in milliseconds.
    ///
    /// Set via BIENESTAR_PROBE_TIMEOUT_MS environment variable.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Interval between background prunes of expired entries, in seconds.
    /// Zero disables the maintenance task; expired entries are then
    /// dropped only at store load time.
    ///
    /// Set via BIENESTAR_PRUNE_INTERVAL_SECS environment variable.
    #[serde(default)]
    pub prune_interval_secs: u64,
}

fn default_api_base_url() -> String {
    "http://localhost:8080/api".into()
}

fn default_local_files_base_url() -> String {
    "http://localhost:8080/files".into()
}

fn default_trusted_domains() -> Vec<String> {
    vec!["s3.amazonaws.com".into()]
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("./bienestar-doc-cache.json")
}

fn default_persistence() -> PersistenceMode {
    PersistenceMode::WholeStore
}

fn default_user_agent() -> String {
    "bienestar-docs/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_probe_timeout_ms() -> u64 {
    5_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            local_files_base_url: default_local_files_base_url(),
            trusted_domains: default_trusted_domains(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_path: default_cache_path(),
            persistence: default_persistence(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            probe_timeout_ms: default_probe_timeout_ms(),
            prune_interval_secs: 0,
        }
    }
}

impl AppConfig {
    /// API timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Probe timeout as Duration.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Cache TTL as a chrono Duration for entry freshness checks.
    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.cache_ttl_secs as i64)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `BIENESTAR_`
    /// 2. TOML file from `BIENESTAR_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("BIENESTAR_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("BIENESTAR_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.cache_path, PathBuf::from("./bienestar-doc-cache.json"));
        assert_eq!(config.persistence, PersistenceMode::WholeStore);
        assert_eq!(config.user_agent, "bienestar-docs/0.1");
        assert_eq!(config.timeout_ms, 20_000);
        assert_eq!(config.probe_timeout_ms, 5_000);
        assert_eq!(config.prune_interval_secs, 0);
        assert_eq!(config.trusted_domains, vec!["s3.amazonaws.com".to_string()]);
    }

    #[test]
    fn test_timeout_durations() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
        assert_eq!(config.probe_timeout(), Duration::from_millis(5_000));
        assert_eq!(config.cache_ttl(), chrono::Duration::seconds(300));
    }

    #[test]
    fn test_persistence_mode_serde_names() {
        assert_eq!(serde_json::to_string(&PersistenceMode::WholeStore).unwrap(), "\"whole-store\"");
        assert_eq!(serde_json::to_string(&PersistenceMode::PerKey).unwrap(), "\"per-key\"");
        let mode: PersistenceMode = serde_json::from_str("\"memory\"").unwrap();
        assert_eq!(mode, PersistenceMode::Memory);
    }
}
