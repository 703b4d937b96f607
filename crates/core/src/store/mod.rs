//! SQLite-backed record store.
//!
//! This module provides persistent storage for the notebook collections, the
//! settings record and the chapter cache, using SQLite with async access via
//! tokio-rusqlite. It supports:
//!
//! - Generic keyed collections (get, scan, upsert, delete)
//! - A validated cache of merged bilingual chapters
//! - Automatic schema migrations
//! - Transactional backup import and JSON export

pub mod backup;
pub mod chapters;
pub mod connection;
pub mod customizations;
pub mod migrations;
pub mod record;
pub mod settings;

pub use crate::Error;

pub use backup::{BACKUP_VERSION, BackupDocument, ImportSummary};
pub use connection::Store;
pub use record::Record;
