//! Singleton settings record.

use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::{self, OptionalExtension};

use super::connection::Store;
use crate::Error;
use crate::models::AppSettings;

/// Row key of the single settings record.
pub(crate) const SETTINGS_KEY: &str = "app";

pub(crate) fn load_on(conn: &rusqlite::Connection) -> Result<Option<AppSettings>, Error> {
    let data: Option<String> = conn
        .query_row("SELECT data FROM settings WHERE key = ?1", params![SETTINGS_KEY], |row| row.get(0))
        .optional()?;
    match data {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

pub(crate) fn save_on(conn: &rusqlite::Connection, settings: &AppSettings) -> Result<(), Error> {
    let data = serde_json::to_string(settings)?;
    conn.execute(
        "INSERT INTO settings (key, data) VALUES (?1, ?2)
        ON CONFLICT(key) DO UPDATE SET data = excluded.data",
        params![SETTINGS_KEY, data],
    )?;
    Ok(())
}

impl Store {
    /// The stored settings record, if one was ever written.
    pub async fn load_settings(&self) -> Result<Option<AppSettings>, Error> {
        self.conn.call(|conn| load_on(conn)).await.map_err(Error::from)
    }

    /// The stored settings, or the defaults when none exist yet.
    pub async fn read_settings(&self) -> Result<AppSettings, Error> {
        Ok(self.load_settings().await?.unwrap_or_default())
    }

    /// Persist the full settings record, replacing the previous one.
    pub async fn save_settings(&self, settings: &AppSettings) -> Result<(), Error> {
        let settings = settings.clone();
        self.conn
            .call(move |conn| save_on(conn, &settings))
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AiProvider, Theme};

    #[tokio::test]
    async fn test_read_defaults_when_absent() {
        let store = Store::open_in_memory().await.unwrap();
        assert!(store.load_settings().await.unwrap().is_none());
        assert_eq!(store.read_settings().await.unwrap(), AppSettings::default());
    }

    #[tokio::test]
    async fn test_save_is_singular() {
        let store = Store::open_in_memory().await.unwrap();
        let first = AppSettings { theme: Theme::Dark, ..Default::default() };
        let second = AppSettings {
            font_size: 22,
            ai_provider: Some(AiProvider::Claude),
            claude_api_key: Some("k".into()),
            ..Default::default()
        };

        store.save_settings(&first).await.unwrap();
        store.save_settings(&second).await.unwrap();

        assert_eq!(store.read_settings().await.unwrap(), second);
        let rows: i64 = store
            .conn
            .call(|conn| conn.query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0)))
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }
}
