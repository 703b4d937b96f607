//! Generative-AI provider clients.
//!
//! Both providers expose the same [`AiProvider`] interface: a one-shot
//! `generate` and an incremental `generate_stream` that hands text chunks to a
//! caller-supplied sink in arrival order. The end of the stream is the
//! completion signal.
//!
//! ### Specification
//!
//! - **Gemini**: `POST {base}/v1beta/models/{model}:generateContent`, key in the
//!   `x-goog-api-key` header; streaming via `:streamGenerateContent?alt=sse`.
//! - **Claude**: `POST {base}/v1/messages` with `model`, `max_tokens` and
//!   `messages`; headers `x-api-key` and `anthropic-version: 2023-06-01`.
//!   Streaming delivers the whole answer as a single chunk.
//! - Failures are surfaced without retry.

pub mod claude;
pub mod error;
pub mod gemini;
pub mod prompt;
pub mod sse;

pub use claude::{ClaudeClient, ClaudeConfig};
pub use error::AiError;
pub use gemini::{GeminiClient, GeminiConfig};

use async_trait::async_trait;
use bapp_core::models::AiProvider as ProviderKind;
use serde::Deserialize;

/// Receives streamed text increments.
pub type ChunkSink<'a> = &'a mut (dyn FnMut(&str) + Send);

/// A text-generation backend.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Which provider this is.
    fn kind(&self) -> ProviderKind;

    /// Generate a complete response for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;

    /// Generate a response, delivering text increments to `sink` as they arrive.
    ///
    /// The default implementation delivers the full response as one chunk.
    async fn generate_stream(&self, prompt: &str, sink: ChunkSink<'_>) -> Result<(), AiError> {
        let text = self.generate(prompt).await?;
        sink(&text);
        Ok(())
    }
}

/// `{"error": {"message": "..."}}`, the error envelope both providers use.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Maximum characters of a raw error body kept in [`AiError::HttpError`].
const MAX_ERROR_BODY_CHARS: usize = 200;

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
    }
}

/// Map a non-success response to an [`AiError`], passing successes through.
pub(crate) async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, AiError> {
    let status = response.status();
    tracing::debug!("AI provider response status: {}", status);

    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        401 | 403 => Err(AiError::AuthError),
        429 => Err(AiError::RateLimited),
        code => {
            let body = response.text().await.unwrap_or_default();
            Err(AiError::HttpError { status: code, message: error_message(&body) })
        }
    }
}

pub(crate) fn check_base_url(base_url: &str) -> Result<(), AiError> {
    let parsed = url::Url::parse(base_url).map_err(|e| AiError::InvalidUrl(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(AiError::InvalidUrl(format!("unsupported scheme: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl AiProvider for Echo {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Gemini
        }

        async fn generate(&self, prompt: &str) -> Result<String, AiError> {
            Ok(format!("echo: {prompt}"))
        }
    }

    #[tokio::test]
    async fn test_default_stream_is_single_chunk() {
        let mut chunks = Vec::new();
        let mut sink = |chunk: &str| chunks.push(chunk.to_string());
        Echo.generate_stream("hi", &mut sink).await.unwrap();
        assert_eq!(chunks, vec!["echo: hi"]);
    }

    #[test]
    fn test_error_message_from_envelope() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message(body), "API key not valid");

        let long = "x".repeat(500);
        assert_eq!(error_message(&long).len(), MAX_ERROR_BODY_CHARS);
    }

    #[test]
    fn test_check_base_url() {
        assert!(check_base_url("https://api.anthropic.com").is_ok());
        assert!(matches!(check_base_url("file:///etc"), Err(AiError::InvalidUrl(_))));
        assert!(matches!(check_base_url("::"), Err(AiError::InvalidUrl(_))));
    }
}
