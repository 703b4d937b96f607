//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (BAPP_*)
//! 2. TOML config file (if BAPP_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! User preferences and API keys are not configuration: they live in the
//! settings record of the store.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (BAPP_*)
/// 2. TOML config file (if BAPP_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite record store.
    ///
    /// Set via BAPP_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Base URL of the Scripture text API.
    #[serde(default = "default_scripture_base_url")]
    pub scripture_base_url: String,

    /// Translation code for the Chinese text.
    #[serde(default = "default_primary_translation")]
    pub primary_translation: String,

    /// Translation code for the English text.
    #[serde(default = "default_secondary_translation")]
    pub secondary_translation: String,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via BAPP_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,

    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    #[serde(default = "default_claude_base_url")]
    pub claude_base_url: String,

    #[serde(default = "default_claude_model")]
    pub claude_model: String,

    /// `max_tokens` sent with every Claude request.
    #[serde(default = "default_claude_max_tokens")]
    pub claude_max_tokens: u32,

    /// Maximum adjacent-chapter preloads running at once.
    #[serde(default = "default_preload_concurrency")]
    pub preload_concurrency: usize,

    /// Preloads allowed in flight before new ones are skipped.
    #[serde(default = "default_max_pending_preloads")]
    pub max_pending_preloads: usize,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./bapp.sqlite")
}

fn default_scripture_base_url() -> String {
    "https://bible-api.com".into()
}

fn default_primary_translation() -> String {
    "cuv".into()
}

fn default_secondary_translation() -> String {
    "web".into()
}

fn default_user_agent() -> String {
    "bapp/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash-exp".into()
}

fn default_claude_base_url() -> String {
    "https://api.anthropic.com".into()
}

fn default_claude_model() -> String {
    "claude-3-5-sonnet-20241022".into()
}

fn default_claude_max_tokens() -> u32 {
    2048
}

fn default_preload_concurrency() -> usize {
    2
}

fn default_max_pending_preloads() -> usize {
    8
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            scripture_base_url: default_scripture_base_url(),
            primary_translation: default_primary_translation(),
            secondary_translation: default_secondary_translation(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            gemini_base_url: default_gemini_base_url(),
            gemini_model: default_gemini_model(),
            claude_base_url: default_claude_base_url(),
            claude_model: default_claude_model(),
            claude_max_tokens: default_claude_max_tokens(),
            preload_concurrency: default_preload_concurrency(),
            max_pending_preloads: default_max_pending_preloads(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or environment cannot be parsed, or
    /// if validation fails after loading.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("BAPP_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("BAPP_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
