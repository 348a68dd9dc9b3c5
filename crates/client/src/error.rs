//! Backend client error types.

use std::sync::Arc;

/// Errors from a discussion backend.
///
/// Every variant is reported to the caller; clients never retry on their own.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    /// Non-success HTTP response.
    #[error("HTTP error: {status} {reason}")]
    HttpError { status: u16, reason: String },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),

    /// Session cache read failed.
    #[error("cache error: {0}")]
    Cache(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { BackendError::Timeout } else { BackendError::Network(Arc::new(err)) }
    }
}

impl From<tabthreads_core::Error> for BackendError {
    fn from(err: tabthreads_core::Error) -> Self {
        BackendError::Cache(err.to_string())
    }
}

impl BackendError {
    /// Whether the same request may succeed if sent again.
    pub fn is_transient(&self) -> bool {
        match self {
            BackendError::HttpError { status, .. } => *status == 429 || *status >= 500,
            BackendError::Timeout | BackendError::Network(_) => true,
            BackendError::Parse(_) | BackendError::Cache(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BackendError::HttpError { status: 503, reason: "Service Unavailable".into() };
        assert_eq!(err.to_string(), "HTTP error: 503 Service Unavailable");

        let err = BackendError::Parse("expected value".to_string());
        assert!(err.to_string().contains("parse error"));
    }

    #[test]
    fn test_is_transient() {
        assert!(BackendError::HttpError { status: 502, reason: String::new() }.is_transient());
        assert!(BackendError::HttpError { status: 429, reason: String::new() }.is_transient());
        assert!(!BackendError::HttpError { status: 404, reason: String::new() }.is_transient());
        assert!(BackendError::Timeout.is_transient());
        assert!(!BackendError::Parse(String::new()).is_transient());
    }
}
