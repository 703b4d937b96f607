//! Saved vibe customizations, kept in insertion order.

use tokio_rusqlite::params;

use super::connection::Store;
use crate::Error;
use crate::models::VibeChange;

impl Store {
    /// Append changes after the ones already saved.
    pub async fn append_customizations(&self, changes: &[VibeChange]) -> Result<(), Error> {
        let rows = changes
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        let saved_at = chrono::Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare("INSERT INTO vibe_changes (data, saved_at) VALUES (?1, ?2)")?;
                    for data in &rows {
                        stmt.execute(params![data, saved_at])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Every saved change, oldest first.
    pub async fn customizations(&self) -> Result<Vec<VibeChange>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<VibeChange>, Error> {
                let mut stmt = conn.prepare("SELECT data FROM vibe_changes ORDER BY seq")?;
                let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

                let mut changes = Vec::new();
                for row in rows {
                    changes.push(serde_json::from_str(&row?)?);
                }
                Ok(changes)
            })
            .await
            .map_err(Error::from)
    }

    /// Forget every saved change. Returns how many were removed.
    pub async fn clear_customizations(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| conn.execute("DELETE FROM vibe_changes", []))
            .await
            .map(|count| count as u64)
            .map_err(Error::Database)
    }
}
