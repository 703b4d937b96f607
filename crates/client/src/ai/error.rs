//! Generative-AI client error types.

use std::sync::Arc;

/// Errors from the Gemini and Claude clients.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AiError {
    /// No API key was supplied for the provider.
    #[error("missing API key for {provider}")]
    MissingApiKey { provider: &'static str },

    /// Base URL could not be parsed.
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// Rate limited by the provider.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error {status}: {message}")]
    HttpError { status: u16, message: String },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response body was not valid JSON for the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// Response parsed but did not contain what was asked for.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { AiError::Timeout } else { AiError::Network(Arc::new(err)) }
    }
}
