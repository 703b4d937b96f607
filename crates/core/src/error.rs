//! Unified error types for bapp.
//!
//! Every variant renders with a stable upper-case code prefix so front ends can
//! match on the category without parsing the message.

use tokio_rusqlite::rusqlite;

/// Unified error type shared by the store, the chapter service and the assistant.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (unknown book, chapter out of range, bad reference).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// A chapter could not be fetched or merged.
    ///
    /// Network and parse failures are not distinguished.
    #[error("CHAPTER_LOAD_FAILED: chapter load failed for {book} {chapter}: {reason}")]
    ChapterLoad { book: String, chapter: u32, reason: String },

    /// No AI credential is configured for the selected provider.
    #[error("NOT_CONFIGURED: {0}")]
    NotConfigured(String),

    /// The AI provider call failed or returned an unusable response.
    #[error("AI_ERROR: {0}")]
    Ai(String),

    /// Database operation failed.
    #[error("STORE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// A stored record or payload could not be (de)serialized.
    #[error("SERIALIZATION_ERROR: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backup document rejected before any write happened.
    #[error("INVALID_BACKUP: {0}")]
    InvalidBackup(String),
}

impl Error {
    /// Build a chapter load failure from any displayable cause.
    pub fn chapter_load(book: &str, chapter: u32, reason: impl std::fmt::Display) -> Self {
        Error::ChapterLoad { book: book.to_string(), chapter, reason: reason.to_string() }
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}
