//! Unified error types for the Bienestar document service.

use tokio_rusqlite::rusqlite;

/// Unified error types shared across the workspace crates.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., an empty storage path where one is required).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Whole-store blob could not be read, parsed, or written.
    #[error("PERSIST_ERROR: {0}")]
    Persistence(String),

    /// Malformed URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// HTTP transport failure during a probe or download.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Persistence("disk full".to_string());
        assert!(err.to_string().contains("PERSIST_ERROR"));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_invalid_url_display() {
        let err = Error::InvalidUrl("not a url".to_string());
        assert!(err.to_string().starts_with("INVALID_URL"));
    }
}
