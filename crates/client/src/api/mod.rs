//! Intranet document API client.
//!
//! Thin HTTP client over the document metadata API (list, fetch by id)
//! and the download API (binary payload for save-to-disk). Both are
//! external collaborators; this module only normalizes transport and
//! decoding concerns into `ApiError`.

pub mod error;
pub mod request;
pub mod response;

pub use error::ApiError;
pub use request::DocumentQuery;
pub use response::DocumentPage;

use std::sync::Arc;
use std::time::Duration;

use bienestar_core::{AppConfig, DocumentRecord};
use bytes::Bytes;
use reqwest::header;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "bienestar-docs/0.1";

/// API client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the intranet API, without a trailing slash.
    pub base_url: String,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
    /// User-agent string.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AppConfig> for ApiConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Document metadata / download API client.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Create a new API client with the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| ApiError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    /// Create a client from the application configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Self::new(ApiConfig::from(config))
    }

    /// List document records matching `query`.
    pub async fn list_documents(&self, query: &DocumentQuery) -> Result<DocumentPage, ApiError> {
        query.validate()?;

        let url = format!("{}/documents", self.config.base_url);
        tracing::debug!("listing documents: {url}");

        let response = self
            .http
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(ApiError::HttpError { status: status.as_u16() });
        }

        let bytes = response.bytes().await.map_err(classify_transport_error)?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Fetch a single document record by id.
    pub async fn get_document(&self, id: i64) -> Result<DocumentRecord, ApiError> {
        let url = format!("{}/documents/{id}", self.config.base_url);

        let response = self
            .http
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if status == 404 {
            return Err(ApiError::NotFound(id));
        }
        if status.is_client_error() || status.is_server_error() {
            return Err(ApiError::HttpError { status: status.as_u16() });
        }

        let bytes = response.bytes().await.map_err(classify_transport_error)?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Fetch the binary payload of a document for save-to-disk.
    pub async fn download(&self, id: i64) -> Result<Bytes, ApiError> {
        let url = format!("{}/documents/{id}/download", self.config.base_url);
        tracing::debug!("downloading document {id}");

        let response = self.http.get(&url).send().await.map_err(classify_transport_error)?;

        let status = response.status();
        if status == 404 {
            return Err(ApiError::NotFound(id));
        }
        if status.is_client_error() || status.is_server_error() {
            return Err(ApiError::HttpError { status: status.as_u16() });
        }

        response.bytes().await.map_err(classify_transport_error)
    }
}

fn classify_transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() { ApiError::Timeout } else { ApiError::Network(Arc::new(e)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_config_default() {
        let config = ApiConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert_eq!(config.user_agent, "bienestar-docs/0.1");
    }

    #[test]
    fn test_api_config_strips_trailing_slash() {
        let app = AppConfig { api_base_url: "http://intranet.local/api/".to_string(), ..Default::default() };
        let config = ApiConfig::from(&app);
        assert_eq!(config.base_url, "http://intranet.local/api");
    }

    #[test]
    fn test_client_builds() {
        let client = ApiClient::new(ApiConfig::default());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_list_rejects_invalid_query() {
        let client = ApiClient::new(ApiConfig::default()).unwrap();
        let query = DocumentQuery { page_size: Some(0), ..Default::default() };
        let result = client.list_documents(&query).await;
        assert!(matches!(result, Err(ApiError::InvalidQuery(_))));
    }
}
