//! Error types for the intranet API client.

use std::sync::Arc;

/// Errors from the document metadata / download API.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// Query parameters are out of range or malformed.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Transport-level failure.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Non-success HTTP status.
    #[error("HTTP error: status {status}")]
    HttpError { status: u16 },

    /// The requested document does not exist.
    #[error("document {0} not found")]
    NotFound(i64),

    /// The response body could not be decoded.
    #[error("failed to parse response: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::NotFound(42);
        assert!(err.to_string().contains("42"));

        let err = ApiError::HttpError { status: 503 };
        assert!(err.to_string().contains("503"));
    }
}
