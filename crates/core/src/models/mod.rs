//! Domain models shared by the store, the clients and the application layer.

pub mod book;
pub mod records;
pub mod reference;
pub mod settings;
pub mod verse;
pub mod vibe;

pub use book::{BOOKS, Book, Testament};
pub use records::{Bookmark, Drawing, Note, Point, ReadingProgress, Research, Stroke, Tool, now_millis};
pub use reference::{ChapterKey, VerseRef};
pub use settings::{AiProvider, AppSettings, Language, SettingsPatch, Theme};
pub use verse::{CachedChapter, Verse};
pub use vibe::{ChangeKind, VibeChange};
