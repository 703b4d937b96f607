//! Scripture text API client.
//!
//! Fetches one translation of one chapter at a time and returns the verse
//! texts in positional order. Merging two translations into a bilingual
//! chapter happens in the application layer.
//!
//! ### Specification
//!
//! - **Endpoint**: `GET {base}/{bookId}{chapter}?translation={code}`
//!   (bible-api.com shape, e.g. `/gen1?translation=web`).
//! - **Response**: `{ "verses": [ { "text": "..." } | "..." ] }`; a missing
//!   `verses` array is an empty chapter.
//! - **Errors**: non-success status, timeout, network and parse failures are
//!   reported as-is. There are no retries.

pub mod error;
pub mod response;

pub use error::ScriptureError;
pub use response::{ApiVerse, ChapterResponse};

use async_trait::async_trait;
use reqwest::header;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default base URL for the Scripture API.
const DEFAULT_BASE_URL: &str = "https://bible-api.com";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "bapp/0.1";

/// A source of single-translation chapter text.
#[async_trait]
pub trait ScriptureSource: Send + Sync {
    /// Fetch the verse texts of one chapter in one translation.
    async fn fetch_translation(&self, book_id: &str, chapter: u32, translation: &str)
    -> Result<Vec<String>, ScriptureError>;
}

/// Scripture client configuration.
#[derive(Debug, Clone)]
pub struct ScriptureConfig {
    /// Base URL (default: https://bible-api.com).
    pub base_url: String,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
    /// User-agent string (default: bapp/0.1).
    pub user_agent: String,
}

impl Default for ScriptureConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// HTTP client for bible-api.com compatible endpoints.
#[derive(Debug, Clone)]
pub struct BibleApiClient {
    http: reqwest::Client,
    config: ScriptureConfig,
}

impl BibleApiClient {
    /// Create a new client. Fails if the base URL is not an absolute http(s) URL.
    pub fn new(config: ScriptureConfig) -> Result<Self, ScriptureError> {
        let parsed = url::Url::parse(&config.base_url).map_err(|e| ScriptureError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScriptureError::InvalidUrl(format!("unsupported scheme: {}", parsed.scheme())));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ScriptureError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    fn chapter_url(&self, book_id: &str, chapter: u32) -> String {
        format!("{}/{}{}", self.config.base_url.trim_end_matches('/'), book_id, chapter)
    }
}

#[async_trait]
impl ScriptureSource for BibleApiClient {
    async fn fetch_translation(
        &self, book_id: &str, chapter: u32, translation: &str,
    ) -> Result<Vec<String>, ScriptureError> {
        let start = Instant::now();
        let url = self.chapter_url(book_id, chapter);

        let http_response = self
            .http
            .get(&url)
            .query(&[("translation", translation)])
            .header("Accept", "application/json")
            .header(header::USER_AGENT, &self.config.user_agent)
            .send()
            .await?;

        let status = http_response.status();
        if !status.is_success() {
            return Err(ScriptureError::HttpError { status: status.as_u16() });
        }

        let bytes = http_response.bytes().await?;
        let parsed: ChapterResponse =
            serde_json::from_slice(&bytes).map_err(|e| ScriptureError::Parse(e.to_string()))?;
        let texts = parsed.into_texts();

        tracing::debug!(
            book = book_id,
            chapter,
            translation,
            verses = texts.len(),
            "fetched translation in {:?}",
            start.elapsed()
        );
        Ok(texts)
    }
}
