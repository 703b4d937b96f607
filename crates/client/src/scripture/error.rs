//! Scripture API client error types.

use std::sync::Arc;

/// Errors from the Scripture text API.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScriptureError {
    /// Base URL could not be parsed.
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    /// Non-success HTTP status.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response body was not the expected JSON shape.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ScriptureError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ScriptureError::Timeout } else { ScriptureError::Network(Arc::new(err)) }
    }
}
