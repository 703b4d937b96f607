//! Gemini `generateContent` client.

use async_trait::async_trait;
use bapp_core::models::AiProvider as ProviderKind;
use futures_util::StreamExt;
use reqwest::header;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::sse::SseDecoder;
use super::{AiError, AiProvider, ChunkSink, check_base_url, ensure_success};

/// Default base URL for the Gemini API.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const DEFAULT_USER_AGENT: &str = "bapp/0.1";

/// Gemini client configuration.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

impl<'a> GenerateRequest<'a> {
    fn new(prompt: &'a str) -> Self {
        Self { contents: [RequestContent { parts: [RequestPart { text: prompt }] }] }
    }
}

/// Response body of `generateContent`, and of each streamed SSE frame.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| content.parts.iter().filter_map(|p| p.text.as_deref()).collect())
            .unwrap_or_default()
    }
}

fn parse_frame(data: &str) -> Result<String, AiError> {
    let frame: GenerateResponse = serde_json::from_str(data).map_err(|e| AiError::Parse(e.to_string()))?;
    Ok(frame.text())
}

/// Gemini API client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new Gemini client. Fails without network access if the key is empty.
    pub fn new(config: GeminiConfig) -> Result<Self, AiError> {
        if config.api_key.trim().is_empty() {
            return Err(AiError::MissingApiKey { provider: "gemini" });
        }
        check_base_url(&config.base_url)?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/v1beta/models/{}:{method}", self.config.base_url.trim_end_matches('/'), self.config.model)
    }

    fn request(&self, url: &str, prompt: &str) -> reqwest::RequestBuilder {
        self.http
            .post(url)
            .header("x-goog-api-key", &self.config.api_key)
            .header(header::USER_AGENT, &self.config.user_agent)
            .json(&GenerateRequest::new(prompt))
    }
}

#[async_trait]
impl AiProvider for GeminiClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let start = Instant::now();
        let url = self.endpoint("generateContent");

        let response = ensure_success(self.request(&url, prompt).send().await?).await?;
        let bytes = response.bytes().await?;
        let parsed: GenerateResponse = serde_json::from_slice(&bytes).map_err(|e| AiError::Parse(e.to_string()))?;

        if parsed.candidates.is_empty() {
            return Err(AiError::InvalidResponse("no candidates in response".into()));
        }

        let text = parsed.text();
        tracing::debug!(model = %self.config.model, chars = text.len(), "gemini generate completed in {:?}", start.elapsed());
        Ok(text)
    }

    async fn generate_stream(&self, prompt: &str, sink: ChunkSink<'_>) -> Result<(), AiError> {
        let start = Instant::now();
        let url = format!("{}?alt=sse", self.endpoint("streamGenerateContent"));

        let response = ensure_success(self.request(&url, prompt).send().await?).await?;
        let mut body = response.bytes_stream();
        let mut decoder = SseDecoder::default();
        let mut chunks = 0usize;

        while let Some(bytes) = body.next().await {
            for data in decoder.push(&bytes?) {
                let text = parse_frame(&data)?;
                if !text.is_empty() {
                    chunks += 1;
                    sink(&text);
                }
            }
        }
        if let Some(data) = decoder.finish() {
            let text = parse_frame(&data)?;
            if !text.is_empty() {
                chunks += 1;
                sink(&text);
            }
        }

        tracing::debug!(model = %self.config.model, chunks, "gemini stream completed in {:?}", start.elapsed());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> GeminiClient {
        GeminiClient::new(GeminiConfig { api_key: "test-key".into(), base_url: server.base_url(), ..Default::default() })
            .unwrap()
    }

    #[test]
    fn test_missing_api_key() {
        let err = GeminiClient::new(GeminiConfig::default()).unwrap_err();
        assert!(matches!(err, AiError::MissingApiKey { provider: "gemini" }));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = GeminiConfig { api_key: "super-secret".into(), ..Default::default() };
        assert!(!format!("{config:?}").contains("super-secret"));
    }

    #[test]
    fn test_response_text_joins_parts() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"In the "},{"text":"beginning"}],"role":"model"}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.text(), "In the beginning");
    }

    #[tokio::test]
    async fn test_generate() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1beta/models/gemini-2.0-flash-exp:generateContent")
                    .header("x-goog-api-key", "test-key")
                    .json_body(json!({"contents": [{"parts": [{"text": "hello"}]}]}));
                then.status(200).json_body(json!({
                    "candidates": [{"content": {"parts": [{"text": "你好 / hello"}], "role": "model"}}]
                }));
            })
            .await;

        let text = client_for(&server).generate("hello").await.unwrap();
        mock.assert_async().await;
        assert_eq!(text, "你好 / hello");
    }

    #[tokio::test]
    async fn test_generate_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(400).json_body(json!({"error": {"code": 400, "message": "bad request"}}));
            })
            .await;

        let err = client_for(&server).generate("hello").await.unwrap_err();
        assert!(matches!(err, AiError::HttpError { status: 400, ref message } if message == "bad request"));
    }

    #[tokio::test]
    async fn test_generate_auth_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(403);
            })
            .await;

        let err = client_for(&server).generate("hello").await.unwrap_err();
        assert!(matches!(err, AiError::AuthError));
    }

    #[tokio::test]
    async fn test_generate_without_candidates() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(json!({"promptFeedback": {"blockReason": "SAFETY"}}));
            })
            .await;

        let err = client_for(&server).generate("hello").await.unwrap_err();
        assert!(matches!(err, AiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_generate_stream_in_order() {
        let server = MockServer::start_async().await;
        let body = concat!(
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"In the \"}]}}]}\r\n\r\n",
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"beginning\"}]}}]}\r\n\r\n",
            "data: {\"candidates\":[{\"content\":{\"parts\":[]},\"finishReason\":\"STOP\"}]}\r\n\r\n",
        );
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1beta/models/gemini-2.0-flash-exp:streamGenerateContent")
                    .query_param("alt", "sse");
                then.status(200).header("content-type", "text/event-stream").body(body);
            })
            .await;

        let mut chunks = Vec::new();
        let mut sink = |chunk: &str| chunks.push(chunk.to_string());
        client_for(&server).generate_stream("hello", &mut sink).await.unwrap();

        mock.assert_async().await;
        assert_eq!(chunks, vec!["In the ", "beginning"]);
    }

    #[tokio::test]
    async fn test_generate_stream_bad_frame() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).body("data: not json\n\n");
            })
            .await;

        let mut sink = |_: &str| {};
        let err = client_for(&server).generate_stream("hello", &mut sink).await.unwrap_err();
        assert!(matches!(err, AiError::Parse(_)));
    }
}
