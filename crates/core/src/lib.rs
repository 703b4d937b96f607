//! Core types and shared functionality for bapp.
//!
//! This crate provides:
//! - Domain models (canonical book list, verses, notebook records, settings)
//! - SQLite-backed record store with chapter cache and backup/restore
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod models;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use models::{
    AppSettings, Bookmark, CachedChapter, ChapterKey, Drawing, Note, ReadingProgress, Research, SettingsPatch, Verse,
    VerseRef, VibeChange,
};
pub use store::{BackupDocument, ImportSummary, Record, Store};
