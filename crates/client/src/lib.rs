//! HTTP clients for bapp.
//!
//! This crate provides the Scripture text source, the Gemini and Claude
//! generative-AI providers, SSE stream decoding, and extraction of vibe
//! changes from free-form AI responses.

pub mod ai;
pub mod scripture;
pub mod vibe;

pub use ai::{AiError, AiProvider, ChunkSink, ClaudeClient, ClaudeConfig, GeminiClient, GeminiConfig};
pub use scripture::{BibleApiClient, ScriptureConfig, ScriptureError, ScriptureSource};
pub use vibe::extract_changes;
