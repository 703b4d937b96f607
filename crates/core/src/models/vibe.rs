//! Vibe changes: AI-produced UI customization descriptors.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Css,
    Behavior,
    Feature,
}

/// A single customization: what kind it is, a human description, and the payload to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VibeChange {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub description: String,
    pub code: String,
}
