//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

fn check_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(value).map_err(|e| invalid(field, &format!("not a valid URL: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(field, &format!("unsupported scheme: {other}"))),
    }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - a base URL, model, translation or `user_agent` is empty
    /// - a base URL is not an absolute http(s) URL
    /// - both translations are the same code
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `claude_max_tokens`, `preload_concurrency` or `max_pending_preloads` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("scripture_base_url", &self.scripture_base_url),
            ("primary_translation", &self.primary_translation),
            ("secondary_translation", &self.secondary_translation),
            ("user_agent", &self.user_agent),
            ("gemini_base_url", &self.gemini_base_url),
            ("gemini_model", &self.gemini_model),
            ("claude_base_url", &self.claude_base_url),
            ("claude_model", &self.claude_model),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
        }

        check_url("scripture_base_url", &self.scripture_base_url)?;
        check_url("gemini_base_url", &self.gemini_base_url)?;
        check_url("claude_base_url", &self.claude_base_url)?;

        if self.primary_translation.eq_ignore_ascii_case(&self.secondary_translation) {
            return Err(invalid("secondary_translation", "must differ from primary_translation"));
        }

        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.claude_max_tokens == 0 {
            return Err(invalid("claude_max_tokens", "must be greater than 0"));
        }
        if self.preload_concurrency == 0 {
            return Err(invalid("preload_concurrency", "must be greater than 0"));
        }
        if self.max_pending_preloads == 0 {
            return Err(invalid("max_pending_preloads", "must be greater than 0"));
        }

        if self.max_pending_preloads < self.preload_concurrency {
            tracing::warn!(
                preload_concurrency = self.preload_concurrency,
                max_pending_preloads = self.max_pending_preloads,
                "max_pending_preloads is below preload_concurrency; \
                 effective concurrency is capped by the pending limit"
            );
        }

        Ok(())
    }
}
