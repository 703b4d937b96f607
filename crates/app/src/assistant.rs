//! AI assistant facade over the configured provider.
//!
//! The assistant is configured from the user's settings: the selected provider
//! (Gemini when none was chosen) and that provider's key. Without a key, or
//! with AI disabled, every request fails with `NotConfigured` before any
//! network access.

use std::sync::Arc;

use bapp_client::ai::prompt;
use bapp_client::{AiError, AiProvider, ChunkSink, ClaudeClient, ClaudeConfig, GeminiClient, GeminiConfig};
use bapp_core::models::AiProvider as ProviderKind;
use bapp_core::{AppConfig, AppSettings, Error, Verse, VibeChange};
use tokio::sync::RwLock;

/// Convert a provider failure into the shared error type.
pub fn ai_error(err: AiError) -> Error {
    match err {
        AiError::MissingApiKey { provider } => Error::NotConfigured(format!("no API key set for {provider}")),
        other => Error::Ai(other.to_string()),
    }
}

/// Endpoint settings taken from [`AppConfig`]; credentials come from [`AppSettings`].
#[derive(Debug, Clone)]
struct Endpoints {
    gemini: GeminiConfig,
    claude: ClaudeConfig,
}

impl Endpoints {
    fn from_config(config: &AppConfig) -> Self {
        Self {
            gemini: GeminiConfig {
                api_key: String::new(),
                base_url: config.gemini_base_url.clone(),
                model: config.gemini_model.clone(),
                timeout: config.timeout(),
                user_agent: config.user_agent.clone(),
            },
            claude: ClaudeConfig {
                api_key: String::new(),
                base_url: config.claude_base_url.clone(),
                model: config.claude_model.clone(),
                max_tokens: config.claude_max_tokens,
                timeout: config.timeout(),
                user_agent: config.user_agent.clone(),
            },
        }
    }

    fn build(&self, kind: ProviderKind, api_key: &str) -> Result<Arc<dyn AiProvider>, AiError> {
        let provider: Arc<dyn AiProvider> = match kind {
            ProviderKind::Gemini => {
                Arc::new(GeminiClient::new(GeminiConfig { api_key: api_key.to_string(), ..self.gemini.clone() })?)
            }
            ProviderKind::Claude => {
                Arc::new(ClaudeClient::new(ClaudeConfig { api_key: api_key.to_string(), ..self.claude.clone() })?)
            }
        };
        Ok(provider)
    }
}

pub struct Assistant {
    endpoints: Endpoints,
    active: RwLock<Option<Arc<dyn AiProvider>>>,
}

impl Assistant {
    /// An unconfigured assistant using the endpoints from `config`.
    pub fn new(config: &AppConfig) -> Self {
        Self { endpoints: Endpoints::from_config(config), active: RwLock::new(None) }
    }

    /// (Re)build the provider from settings.
    ///
    /// Returns whether the assistant is now configured. A missing key or
    /// disabled AI leaves it unconfigured and is not an error.
    pub async fn configure(&self, settings: &AppSettings) -> Result<bool, Error> {
        let kind = settings.provider();
        let next = match settings.active_api_key() {
            Some(key) if settings.ai_enabled => Some(self.endpoints.build(kind, key).map_err(ai_error)?),
            _ => None,
        };

        let configured = next.is_some();
        *self.active.write().await = next;

        if configured {
            tracing::info!(provider = %kind, "AI assistant configured");
        } else {
            tracing::info!(provider = %kind, ai_enabled = settings.ai_enabled, "AI assistant not configured");
        }
        Ok(configured)
    }

    /// Install a provider directly, bypassing settings.
    pub async fn set_provider(&self, provider: Option<Arc<dyn AiProvider>>) {
        *self.active.write().await = provider;
    }

    pub async fn is_configured(&self) -> bool {
        self.active.read().await.is_some()
    }

    /// The active provider, if configured.
    pub async fn provider(&self) -> Option<ProviderKind> {
        self.active.read().await.as_ref().map(|p| p.kind())
    }

    async fn require(&self) -> Result<Arc<dyn AiProvider>, Error> {
        self.active
            .read()
            .await
            .clone()
            .ok_or_else(|| Error::NotConfigured("AI is not configured; set an API key in settings".into()))
    }

    /// Answer a question given free-form context.
    pub async fn ask(&self, context: &str, question: &str) -> Result<String, Error> {
        if question.trim().is_empty() {
            return Err(Error::InvalidInput("question cannot be empty".into()));
        }
        let provider = self.require().await?;
        provider.generate(&prompt::ask(context, question)).await.map_err(ai_error)
    }

    /// Analyze a verse, or answer `question` about it.
    pub async fn analyze(&self, verse: &Verse, question: Option<&str>) -> Result<String, Error> {
        let provider = self.require().await?;
        provider.generate(&prompt::analyze(verse, question)).await.map_err(ai_error)
    }

    /// Streaming form of [`Assistant::analyze`]. Chunks reach `sink` in arrival order.
    pub async fn analyze_stream(&self, verse: &Verse, question: Option<&str>, sink: ChunkSink<'_>) -> Result<(), Error> {
        let provider = self.require().await?;
        provider
            .generate_stream(&prompt::analyze(verse, question), sink)
            .await
            .map_err(ai_error)
    }

    /// Answer a question using a whole chapter as context.
    pub async fn ask_about_chapter(&self, verses: &[Verse], question: &str) -> Result<String, Error> {
        self.ask(&prompt::chapter_context(verses), question).await
    }

    /// Turn a natural-language request into a list of UI changes.
    ///
    /// The whole response is rejected if it does not contain a valid change list.
    pub async fn customize(&self, request: &str) -> Result<Vec<VibeChange>, Error> {
        if request.trim().is_empty() {
            return Err(Error::InvalidInput("request cannot be empty".into()));
        }
        let provider = self.require().await?;
        let text = provider.generate(&prompt::customize(request)).await.map_err(ai_error)?;
        let changes = bapp_client::extract_changes(&text).map_err(ai_error)?;
        tracing::debug!(changes = changes.len(), "extracted customization changes");
        Ok(changes)
    }
}
