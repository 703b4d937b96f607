//! Whole-database backup and restore.
//!
//! The backup is a single JSON document with a `version` and one array per
//! collection. The chapter cache and saved customizations are not included.
//!
//! Import validates the entire document before writing anything and then
//! applies every collection inside one transaction: either all records land or
//! none do. Collections missing from the document are left untouched.

use serde::{Deserialize, Serialize};
use tokio_rusqlite::rusqlite;

use super::connection::Store;
use super::record::{all_on, put_on};
use super::settings;
use crate::Error;
use crate::models::{AppSettings, Bookmark, Drawing, Note, ReadingProgress, Research};

/// Schema version written by [`Store::export_backup`].
pub const BACKUP_VERSION: u32 = 1;

/// Parsed backup document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BackupDocument {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<Note>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research: Option<Vec<Research>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmarks: Option<Vec<Bookmark>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawings: Option<Vec<Drawing>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<Vec<ReadingProgress>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Vec<AppSettings>>,
}

impl BackupDocument {
    /// Parse and validate a backup without touching the database.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidBackup` for malformed JSON, a non-object top
    /// level, a missing or unsupported `version`, or a record that does not
    /// match its collection's shape.
    pub fn parse(json: &str) -> Result<Self, Error> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| Error::InvalidBackup(format!("malformed JSON: {e}")))?;

        let Some(object) = value.as_object() else {
            return Err(Error::InvalidBackup("top-level value must be an object".into()));
        };

        match object.get("version").and_then(|v| v.as_u64()) {
            None => return Err(Error::InvalidBackup("missing integer `version` field".into())),
            Some(0) => return Err(Error::InvalidBackup("version must be at least 1".into())),
            Some(v) if v > BACKUP_VERSION as u64 => {
                return Err(Error::InvalidBackup(format!(
                    "unsupported version {v} (this build reads up to {BACKUP_VERSION})"
                )));
            }
            Some(_) => {}
        }

        serde_json::from_value(value).map_err(|e| Error::InvalidBackup(e.to_string()))
    }
}

/// Number of records written per collection by an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub notes: usize,
    pub research: usize,
    pub bookmarks: usize,
    pub drawings: usize,
    pub progress: usize,
    pub settings: usize,
}

impl ImportSummary {
    pub fn total(&self) -> usize {
        self.notes + self.research + self.bookmarks + self.drawings + self.progress + self.settings
    }
}

fn put_each<R: super::Record>(tx: &rusqlite::Transaction<'_>, records: Option<&Vec<R>>) -> Result<usize, Error> {
    let Some(records) = records else {
        return Ok(0);
    };
    for record in records {
        put_on(tx, record)?;
    }
    Ok(records.len())
}

impl Store {
    /// Snapshot every collection into a backup document.
    pub async fn backup(&self) -> Result<BackupDocument, Error> {
        self.conn
            .call(|conn| -> Result<BackupDocument, Error> {
                Ok(BackupDocument {
                    version: BACKUP_VERSION,
                    notes: Some(all_on(conn)?),
                    research: Some(all_on(conn)?),
                    bookmarks: Some(all_on(conn)?),
                    drawings: Some(all_on(conn)?),
                    progress: Some(all_on(conn)?),
                    settings: Some(settings::load_on(conn)?.into_iter().collect()),
                })
            })
            .await
            .map_err(Error::from)
    }

    /// Export every collection as a pretty-printed JSON document.
    pub async fn export_backup(&self) -> Result<String, Error> {
        let document = self.backup().await?;
        let json = serde_json::to_string_pretty(&document)?;
        tracing::info!(bytes = json.len(), "exported backup");
        Ok(json)
    }

    /// Apply a parsed backup inside a single transaction.
    ///
    /// Every record is upserted by key. When several settings records are
    /// present the last one wins.
    pub async fn restore(&self, document: BackupDocument) -> Result<ImportSummary, Error> {
        let summary = self
            .conn
            .call(move |conn| -> Result<ImportSummary, Error> {
                let tx = conn.transaction()?;

                let mut summary = ImportSummary {
                    notes: put_each(&tx, document.notes.as_ref())?,
                    research: put_each(&tx, document.research.as_ref())?,
                    bookmarks: put_each(&tx, document.bookmarks.as_ref())?,
                    drawings: put_each(&tx, document.drawings.as_ref())?,
                    progress: put_each(&tx, document.progress.as_ref())?,
                    settings: 0,
                };

                if let Some(last) = document.settings.as_ref().and_then(|all| all.last()) {
                    settings::save_on(&tx, last)?;
                    summary.settings = 1;
                }

                tx.commit()?;
                Ok(summary)
            })
            .await
            .map_err(Error::from)?;

        tracing::info!(records = summary.total(), "imported backup");
        Ok(summary)
    }

    /// Validate a JSON backup and apply it.
    ///
    /// Nothing is written when validation fails.
    pub async fn import_backup(&self, json: &str) -> Result<ImportSummary, Error> {
        let document = BackupDocument::parse(json)?;
        self.restore(document).await
    }
}
