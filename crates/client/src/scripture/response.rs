//! Scripture API response types.

use serde::Deserialize;

/// Raw chapter response. Only the verse list is used.
#[derive(Debug, Deserialize)]
pub struct ChapterResponse {
    #[serde(default)]
    pub verses: Vec<ApiVerse>,
}

/// A verse is either an object carrying `text` or a bare string. Anything
/// else keeps its position as an empty verse.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiVerse {
    Object {
        #[serde(default)]
        text: Option<String>,
    },
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl ApiVerse {
    pub fn into_text(self) -> String {
        let text = match self {
            ApiVerse::Object { text } => text.unwrap_or_default(),
            ApiVerse::Text(text) => text,
            ApiVerse::Other(_) => String::new(),
        };
        text.trim_end().to_string()
    }
}

impl ChapterResponse {
    /// Verse texts in positional order.
    pub fn into_texts(self) -> Vec<String> {
        self.verses.into_iter().map(ApiVerse::into_text).collect()
    }
}
