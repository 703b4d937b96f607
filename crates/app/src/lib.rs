//! Application layer for bapp.
//!
//! Wires the record store, the Scripture client and the AI providers into
//! services with an explicit lifecycle:
//! - [`AppContext`]: owns everything, created by `init` and torn down by `shutdown`
//! - [`ChapterService`]: cache-first bilingual chapters with background preloads
//! - [`SettingsService`]: user preferences, persisted on every change
//! - [`Assistant`]: AI analysis, questions and UI customization
//! - [`Notebook`]: notes, bookmarks, drawings and research history

pub mod assistant;
pub mod chapters;
pub mod context;
pub mod logging;
pub mod notebook;
pub mod settings;

pub use assistant::Assistant;
pub use chapters::ChapterService;
pub use context::AppContext;
pub use logging::LogFormat;
pub use notebook::Notebook;
pub use settings::SettingsService;
