//! Claude Messages API client.

use async_trait::async_trait;
use bapp_core::models::AiProvider as ProviderKind;
use reqwest::header;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::{AiError, AiProvider, check_base_url, ensure_success};

/// Default base URL for the Anthropic API.
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

const DEFAULT_MAX_TOKENS: u32 = 2048;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const DEFAULT_USER_AGENT: &str = "bapp/0.1";

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Claude client configuration.
#[derive(Clone)]
pub struct ClaudeConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClaudeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl std::fmt::Debug for ClaudeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

/// Response body of `POST /v1/messages`.
#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl MessagesResponse {
    /// Concatenated text of every `text` block, or `None` when there are none.
    pub fn text(&self) -> Option<String> {
        let mut blocks = self.content.iter().filter(|b| b.kind == "text").filter_map(|b| b.text.as_deref()).peekable();
        blocks.peek()?;
        Some(blocks.collect())
    }
}

/// Claude API client.
#[derive(Debug, Clone)]
pub struct ClaudeClient {
    http: reqwest::Client,
    config: ClaudeConfig,
}

impl ClaudeClient {
    /// Create a new Claude client. Fails without network access if the key is empty.
    pub fn new(config: ClaudeConfig) -> Result<Self, AiError> {
        if config.api_key.trim().is_empty() {
            return Err(AiError::MissingApiKey { provider: "claude" });
        }
        check_base_url(&config.base_url)?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl AiProvider for ClaudeClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Claude
    }

    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let start = Instant::now();
        let url = format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'));
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: [Message { role: "user", content: prompt }],
        };

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header(header::USER_AGENT, &self.config.user_agent)
            .json(&body)
            .send()
            .await?;
        let response = ensure_success(response).await?;

        let bytes = response.bytes().await?;
        let parsed: MessagesResponse = serde_json::from_slice(&bytes).map_err(|e| AiError::Parse(e.to_string()))?;
        let text = parsed.text().ok_or_else(|| AiError::InvalidResponse("no text content in response".into()))?;

        tracing::debug!(model = %self.config.model, chars = text.len(), "claude generate completed in {:?}", start.elapsed());
        Ok(text)
    }
}
