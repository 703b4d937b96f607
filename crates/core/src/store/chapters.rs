//! Merged chapter cache.
//!
//! Payloads are validated on the way out: a row that fails to decode or does
//! not describe the chapter it is stored under is evicted and reported as a miss.

use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite::OptionalExtension;

use super::connection::Store;
use crate::Error;
use crate::models::CachedChapter;

impl Store {
    /// Look up a cached chapter.
    ///
    /// Returns `None` on a miss or when the stored payload was malformed (it is
    /// deleted in that case).
    pub async fn cached_chapter(&self, book_id: &str, chapter: u32) -> Result<Option<CachedChapter>, Error> {
        let key = book_id.to_string();
        let data: Option<String> = self
            .conn
            .call(move |conn| {
                conn.query_row(
                    "SELECT data FROM chapters WHERE book_id = ?1 AND chapter = ?2",
                    params![key, chapter],
                    |row| row.get(0),
                )
                .optional()
            })
            .await
            .map_err(Error::Database)?;

        let Some(data) = data else {
            return Ok(None);
        };

        let checked = serde_json::from_str::<CachedChapter>(&data)
            .map_err(|e| e.to_string())
            .and_then(|cached| cached.check(book_id, chapter).map(|_| cached));

        match checked {
            Ok(cached) => Ok(Some(cached)),
            Err(reason) => {
                tracing::warn!(book_id, chapter, %reason, "evicting malformed cached chapter");
                self.evict_chapter(book_id, chapter).await?;
                Ok(None)
            }
        }
    }

    /// Store a merged chapter, replacing any previous entry for the same pair.
    pub async fn put_chapter(&self, cached: &CachedChapter) -> Result<(), Error> {
        cached
            .check(&cached.book_id, cached.chapter)
            .map_err(Error::InvalidInput)?;

        let book_id = cached.book_id.clone();
        let chapter = cached.chapter;
        let data = serde_json::to_string(cached)?;
        let cached_at = chrono::Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO chapters (book_id, chapter, data, cached_at) VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(book_id, chapter) DO UPDATE SET
                        data = excluded.data,
                        cached_at = excluded.cached_at",
                    params![book_id, chapter, data, cached_at],
                )
            })
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    pub async fn has_chapter(&self, book_id: &str, chapter: u32) -> Result<bool, Error> {
        let book_id = book_id.to_string();
        self.conn
            .call(move |conn| {
                conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM chapters WHERE book_id = ?1 AND chapter = ?2)",
                    params![book_id, chapter],
                    |row| row.get(0),
                )
            })
            .await
            .map_err(Error::Database)
    }

    /// Remove one cached chapter. Returns whether it was present.
    pub async fn evict_chapter(&self, book_id: &str, chapter: u32) -> Result<bool, Error> {
        let book_id = book_id.to_string();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "DELETE FROM chapters WHERE book_id = ?1 AND chapter = ?2",
                    params![book_id, chapter],
                )
            })
            .await
            .map(|count| count > 0)
            .map_err(Error::Database)
    }

    /// Drop the whole chapter cache. Returns the number of evicted chapters.
    pub async fn purge_chapters(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| conn.execute("DELETE FROM chapters", []))
            .await
            .map(|count| count as u64)
            .map_err(Error::Database)
    }
}
