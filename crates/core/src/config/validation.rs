//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::{AppConfig, PersistenceMode};
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `cache_ttl_secs` is 0 or exceeds 24 hours
    /// - `timeout_ms` / `probe_timeout_ms` are outside [100ms, 5min]
    /// - `user_agent`, `api_base_url`, or `local_files_base_url` is empty
    /// - a durable persistence mode is selected with an empty cache path
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::Invalid { field: "cache_ttl_secs".into(), reason: "must be greater than 0".into() });
        }
        if self.cache_ttl_secs > 86_400 {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_secs".into(),
                reason: "must not exceed 24 hours (86400s)".into(),
            });
        }

        for (field, value) in [("timeout_ms", self.timeout_ms), ("probe_timeout_ms", self.probe_timeout_ms)] {
            if value < 100 {
                return Err(ConfigError::Invalid { field: field.into(), reason: "must be at least 100ms".into() });
            }
            if value > 300_000 {
                return Err(ConfigError::Invalid {
                    field: field.into(),
                    reason: "must not exceed 5 minutes (300000ms)".into(),
                });
            }
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.api_base_url.is_empty() {
            return Err(ConfigError::Invalid { field: "api_base_url".into(), reason: "must not be empty".into() });
        }

        if self.local_files_base_url.is_empty() {
            return Err(ConfigError::Invalid {
                field: "local_files_base_url".into(),
                reason: "must not be empty".into(),
            });
        }

        if self.persistence != PersistenceMode::Memory && self.cache_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "cache_path".into(),
                reason: "must not be empty for durable persistence modes".into(),
            });
        }

        if self.trusted_domains.is_empty() {
            tracing::warn!("trusted_domains is empty; every resolved URL will be probed");
        }

        Ok(())
    }
}
