//! Extraction of UI customization changes from free-form AI text.
//!
//! Models wrap JSON in prose and code fences. A fenced block (optionally
//! tagged `json`) holding an array is preferred; otherwise the first `[` that
//! opens a complete JSON array is used and surrounding text is ignored. An
//! array that does not parse as a full list of changes is rejected as a whole.

use std::sync::LazyLock;

use bapp_core::VibeChange;
use regex::Regex;

use crate::ai::AiError;

static FENCED_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json)?\s*(\[[\s\S]*?\])\s*```").expect("fenced array pattern"));

/// First complete JSON array in `text`.
///
/// `[` positions where no valid JSON starts (bracketed prose) are skipped.
fn first_array(text: &str) -> Result<serde_json::Value, AiError> {
    let mut first_error = None;
    for (start, _) in text.match_indices('[') {
        match serde_json::Deserializer::from_str(&text[start..]).into_iter::<serde_json::Value>().next() {
            Some(Ok(value)) => return Ok(value),
            Some(Err(e)) => {
                first_error.get_or_insert(e);
            }
            None => {}
        }
    }

    Err(match first_error {
        Some(e) => AiError::InvalidResponse(format!("invalid change list: {e}")),
        None => AiError::InvalidResponse("no JSON array in response".into()),
    })
}

/// Parse the change list out of an AI response.
///
/// # Errors
///
/// Returns `AiError::InvalidResponse` when no array is present or when it is
/// not valid JSON for a list of changes.
pub fn extract_changes(text: &str) -> Result<Vec<VibeChange>, AiError> {
    let scope = FENCED_ARRAY
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map_or(text, |m| m.as_str());

    let array = first_array(scope)?;
    serde_json::from_value(array).map_err(|e| AiError::InvalidResponse(format!("invalid change list: {e}")))
}
