//! Generic keyed collections.
//!
//! Every notebook collection shares one table shape (`id`, `ref_key`,
//! `sort_key`, `data`), so point lookups, scans, upserts and deletes are written
//! once against the [`Record`] trait.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_rusqlite::rusqlite::{self, OptionalExtension};
use tokio_rusqlite::params;

use super::connection::Store;
use crate::Error;
use crate::models::{Bookmark, Drawing, Note, ReadingProgress, Research};

/// A record that lives in one named collection, keyed by a unique identifier.
pub trait Record: Serialize + DeserializeOwned + Send + 'static {
    /// Table backing the collection.
    const COLLECTION: &'static str;

    /// Primary key, unique within the collection.
    fn key(&self) -> String;

    /// Secondary lookup value (e.g. the verse a research item is about).
    fn ref_key(&self) -> Option<String> {
        None
    }

    /// Ordering value for scans; records without one sort first, then by key.
    fn sort_key(&self) -> Option<i64> {
        None
    }

    /// Reject a record that could not be read back once stored.
    fn validate(&self) -> Result<(), Error> {
        Ok(())
    }
}

impl Record for Note {
    const COLLECTION: &'static str = "notes";

    fn key(&self) -> String {
        self.id.clone()
    }

    fn sort_key(&self) -> Option<i64> {
        Some(self.updated_at)
    }
}

impl Record for Research {
    const COLLECTION: &'static str = "research";

    fn key(&self) -> String {
        self.id.clone()
    }

    fn ref_key(&self) -> Option<String> {
        Some(self.verse_id.clone())
    }

    fn sort_key(&self) -> Option<i64> {
        Some(self.created_at)
    }
}

impl Record for Bookmark {
    const COLLECTION: &'static str = "bookmarks";

    fn key(&self) -> String {
        self.id.clone()
    }

    fn ref_key(&self) -> Option<String> {
        Some(self.verse_id.clone())
    }

    fn sort_key(&self) -> Option<i64> {
        Some(self.created_at)
    }
}

impl Record for Drawing {
    const COLLECTION: &'static str = "drawings";

    fn key(&self) -> String {
        self.id.clone()
    }

    fn validate(&self) -> Result<(), Error> {
        self.check().map_err(|reason| Error::InvalidInput(format!("drawing {}: {reason}", self.id)))
    }
}

impl Record for ReadingProgress {
    const COLLECTION: &'static str = "progress";

    fn key(&self) -> String {
        self.book_id.clone()
    }

    fn sort_key(&self) -> Option<i64> {
        Some(self.timestamp)
    }
}

/// Insert or replace a whole record on an open connection or transaction.
pub(crate) fn put_on<R: Record>(conn: &rusqlite::Connection, record: &R) -> Result<(), Error> {
    record.validate()?;
    let data = serde_json::to_string(record)?;
    conn.execute(
        &format!(
            "INSERT INTO {table} (id, ref_key, sort_key, data) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                ref_key = excluded.ref_key,
                sort_key = excluded.sort_key,
                data = excluded.data",
            table = R::COLLECTION
        ),
        params![record.key(), record.ref_key(), record.sort_key(), data],
    )?;
    Ok(())
}

/// Decode every `data` column produced by `sql`.
fn query_all<R: Record>(conn: &rusqlite::Connection, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<R>, Error> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(args, |row| row.get::<_, String>(0))?;

    let mut records = Vec::new();
    for row in rows {
        records.push(serde_json::from_str(&row?)?);
    }
    Ok(records)
}

pub(crate) fn all_on<R: Record>(conn: &rusqlite::Connection) -> Result<Vec<R>, Error> {
    query_all(conn, &format!("SELECT data FROM {} ORDER BY sort_key, id", R::COLLECTION), &[])
}

impl Store {
    /// Point lookup by primary key.
    pub async fn get<R: Record>(&self, key: &str) -> Result<Option<R>, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<R>, Error> {
                let data: Option<String> = conn
                    .query_row(
                        &format!("SELECT data FROM {} WHERE id = ?1", R::COLLECTION),
                        params![key],
                        |row| row.get(0),
                    )
                    .optional()?;

                match data {
                    Some(json) => Ok(Some(serde_json::from_str(&json)?)),
                    None => Ok(None),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Every record in the collection, ordered by its sort key then primary key.
    pub async fn get_all<R: Record>(&self) -> Result<Vec<R>, Error> {
        self.conn
            .call(|conn| all_on::<R>(conn))
            .await
            .map_err(Error::from)
    }

    /// Insert or overwrite the whole record. Never merges fields.
    pub async fn put<R: Record + Clone>(&self, record: &R) -> Result<(), Error> {
        let record = record.clone();
        self.conn
            .call(move |conn| put_on(conn, &record))
            .await
            .map_err(Error::from)
    }

    /// Delete by primary key. Returns whether a record was removed; absent keys are a no-op.
    pub async fn delete<R: Record>(&self, key: &str) -> Result<bool, Error> {
        let key = key.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute(&format!("DELETE FROM {} WHERE id = ?1", R::COLLECTION), params![key])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Remove every record in the collection. Returns the number deleted.
    pub async fn clear<R: Record>(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count = conn.execute(&format!("DELETE FROM {}", R::COLLECTION), [])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    pub async fn count<R: Record>(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 =
                    conn.query_row(&format!("SELECT COUNT(*) FROM {}", R::COLLECTION), [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Research items about one verse, oldest first.
    pub async fn research_for_verse(&self, verse_id: &str) -> Result<Vec<Research>, Error> {
        let verse_id = verse_id.to_string();
        self.conn
            .call(move |conn| {
                query_all(
                    conn,
                    "SELECT data FROM research WHERE ref_key = ?1 ORDER BY sort_key, id",
                    &[&verse_id],
                )
            })
            .await
            .map_err(Error::from)
    }

    /// Notes whose verse reference falls inside one chapter.
    pub async fn notes_for_chapter(&self, book_id: &str, chapter: u32) -> Result<Vec<Note>, Error> {
        let prefix = format!("{book_id}:{chapter}:");
        self.conn
            .call(move |conn| {
                query_all(
                    conn,
                    "SELECT data FROM notes WHERE substr(id, 1, length(?1)) = ?1 ORDER BY sort_key, id",
                    &[&prefix],
                )
            })
            .await
            .map_err(Error::from)
    }

    /// The most recently updated reading progress across all books.
    pub async fn latest_progress(&self) -> Result<Option<ReadingProgress>, Error> {
        self.conn
            .call(|conn| -> Result<Option<ReadingProgress>, Error> {
                let mut latest: Vec<ReadingProgress> =
                    query_all(conn, "SELECT data FROM progress ORDER BY sort_key DESC, id LIMIT 1", &[])?;
                Ok(latest.pop())
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: &str, content: &str, updated_at: i64) -> Note {
        Note { id: id.to_string(), content: content.to_string(), created_at: 1, updated_at }
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let store = Store::open_in_memory().await.unwrap();
        let n = note("gen:1:1", "In the beginning", 10);

        store.put(&n).await.unwrap();

        let retrieved: Note = store.get("gen:1:1").await.unwrap().unwrap();
        assert_eq!(retrieved, n);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = Store::open_in_memory().await.unwrap();
        let result: Option<Note> = store.get("nonexistent").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_whole_record() {
        let store = Store::open_in_memory().await.unwrap();
        store.put(&note("gen:1:1", "first", 10)).await.unwrap();
        store.put(&note("gen:1:1", "second", 20)).await.unwrap();

        let all: Vec<Note> = store.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].content, "second");
        assert_eq!(all[0].updated_at, 20);
    }

    #[tokio::test]
    async fn test_delete_is_noop_when_absent() {
        let store = Store::open_in_memory().await.unwrap();
        store.put(&note("gen:1:1", "x", 1)).await.unwrap();

        assert!(store.delete::<Note>("gen:1:1").await.unwrap());
        assert!(!store.delete::<Note>("gen:1:1").await.unwrap());
        assert_eq!(store.count::<Note>().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_all_ordered_by_sort_key() {
        let store = Store::open_in_memory().await.unwrap();
        store.put(&note("gen:1:3", "c", 30)).await.unwrap();
        store.put(&note("gen:1:1", "a", 10)).await.unwrap();
        store.put(&note("gen:1:2", "b", 20)).await.unwrap();

        let ids: Vec<String> = store.get_all::<Note>().await.unwrap().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec!["gen:1:1", "gen:1:2", "gen:1:3"]);
    }

    #[tokio::test]
    async fn test_collections_are_independent() {
        let store = Store::open_in_memory().await.unwrap();
        store.put(&note("gen:1:1", "note", 1)).await.unwrap();
        store
            .put(&Bookmark { id: "gen:1:1".into(), verse_id: "gen:1:1".into(), created_at: 1 })
            .await
            .unwrap();

        store.clear::<Note>().await.unwrap();
        assert_eq!(store.count::<Note>().await.unwrap(), 0);
        assert_eq!(store.count::<Bookmark>().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_notes_for_chapter() {
        let store = Store::open_in_memory().await.unwrap();
        store.put(&note("gen:1:1", "a", 1)).await.unwrap();
        store.put(&note("gen:1:31", "b", 2)).await.unwrap();
        store.put(&note("gen:10:1", "c", 3)).await.unwrap();
        store.put(&note("exo:1:1", "d", 4)).await.unwrap();

        let notes = store.notes_for_chapter("gen", 1).await.unwrap();
        let ids: Vec<&str> = notes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["gen:1:1", "gen:1:31"]);
    }

    #[tokio::test]
    async fn test_research_for_verse() {
        let store = Store::open_in_memory().await.unwrap();
        for (id, verse, at) in [("r1", "gen:1:1", 5), ("r2", "gen:1:2", 6), ("r3", "gen:1:1", 4)] {
            store
                .put(&Research {
                    id: id.into(),
                    verse_id: verse.into(),
                    question: "q".into(),
                    answer: "a".into(),
                    created_at: at,
                })
                .await
                .unwrap();
        }

        let ids: Vec<String> = store
            .research_for_verse("gen:1:1")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["r3", "r1"]);
    }

    #[tokio::test]
    async fn test_put_rejects_non_finite_drawing() {
        use crate::models::{Point, Stroke, Tool};

        let store = Store::open_in_memory().await.unwrap();
        let drawing = Drawing {
            id: "gen:1".into(),
            strokes: vec![Stroke {
                points: vec![Point { x: f64::NAN, y: 1.0, pressure: None }],
                color: "#000000".into(),
                width: 2.0,
                tool: Tool::Pen,
            }],
        };

        let err = store.put(&drawing).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(store.count::<Drawing>().await.unwrap(), 0);
        assert!(store.get_all::<Drawing>().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_latest_progress() {
        let store = Store::open_in_memory().await.unwrap();
        assert!(store.latest_progress().await.unwrap().is_none());

        store.put(&ReadingProgress { book_id: "gen".into(), chapter: 3, timestamp: 100 }).await.unwrap();
        store.put(&ReadingProgress { book_id: "jhn".into(), chapter: 1, timestamp: 300 }).await.unwrap();
        store.put(&ReadingProgress { book_id: "exo".into(), chapter: 2, timestamp: 200 }).await.unwrap();

        let latest = store.latest_progress().await.unwrap().unwrap();
        assert_eq!(latest.book_id, "jhn");

        store.put(&ReadingProgress { book_id: "gen".into(), chapter: 4, timestamp: 400 }).await.unwrap();
        let latest = store.latest_progress().await.unwrap().unwrap();
        assert_eq!((latest.book_id.as_str(), latest.chapter), ("gen", 4));
        assert_eq!(store.count::<ReadingProgress>().await.unwrap(), 3);
    }
}
