//! User preferences and AI credentials.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Cn,
    En,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    Auto,
}

/// Generative-AI provider selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    Gemini,
    Claude,
}

impl AiProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::Gemini => "gemini",
            AiProvider::Claude => "claude",
        }
    }
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single global settings record.
///
/// Absence of a stored record means [`AppSettings::default`].
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub language: Language,
    pub theme: Theme,
    pub font_size: u32,
    pub show_annotations: bool,
    pub ai_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claude_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_provider: Option<AiProvider>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            language: Language::Both,
            theme: Theme::Auto,
            font_size: 16,
            show_annotations: true,
            ai_enabled: true,
            gemini_api_key: None,
            claude_api_key: None,
            ai_provider: None,
        }
    }
}

impl AppSettings {
    /// Selected provider; Gemini when none was chosen.
    pub fn provider(&self) -> AiProvider {
        self.ai_provider.unwrap_or_default()
    }

    /// The credential matching the selected provider, if set and non-empty.
    pub fn active_api_key(&self) -> Option<&str> {
        let key = match self.provider() {
            AiProvider::Gemini => self.gemini_api_key.as_deref(),
            AiProvider::Claude => self.claude_api_key.as_deref(),
        };
        key.filter(|k| !k.trim().is_empty())
    }

    /// Apply a partial update. Fields absent from the patch keep their value.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(language) = patch.language {
            self.language = language;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(font_size) = patch.font_size {
            self.font_size = font_size;
        }
        if let Some(show) = patch.show_annotations {
            self.show_annotations = show;
        }
        if let Some(enabled) = patch.ai_enabled {
            self.ai_enabled = enabled;
        }
        if let Some(key) = patch.gemini_api_key {
            self.gemini_api_key = non_empty(key);
        }
        if let Some(key) = patch.claude_api_key {
            self.claude_api_key = non_empty(key);
        }
        if let Some(provider) = patch.ai_provider {
            self.ai_provider = Some(provider);
        }
    }
}

// Keys are redacted so settings can be logged safely.
impl std::fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppSettings")
            .field("language", &self.language)
            .field("theme", &self.theme)
            .field("font_size", &self.font_size)
            .field("show_annotations", &self.show_annotations)
            .field("ai_enabled", &self.ai_enabled)
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("claude_api_key", &self.claude_api_key.as_ref().map(|_| "<redacted>"))
            .field("ai_provider", &self.ai_provider)
            .finish()
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}

/// Partial settings update.
///
/// An empty string for an API key clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub font_size: Option<u32>,
    #[serde(default)]
    pub show_annotations: Option<bool>,
    #[serde(default)]
    pub ai_enabled: Option<bool>,
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    #[serde(default)]
    pub claude_api_key: Option<String>,
    #[serde(default)]
    pub ai_provider: Option<AiProvider>,
}
