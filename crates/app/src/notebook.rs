//! Notes, bookmarks, drawings, research history and reading progress.
//!
//! References are validated against the canon before anything is written.

use bapp_core::models::{Stroke, book, now_millis};
use bapp_core::{Bookmark, ChapterKey, Drawing, Error, Note, ReadingProgress, Research, Store, VerseRef};

fn check_verse(verse: &VerseRef) -> Result<(), Error> {
    book::validate(&verse.book_id, verse.chapter).map(|_| ())
}

fn check_chapter(key: &ChapterKey) -> Result<(), Error> {
    book::validate(&key.book_id, key.chapter).map(|_| ())
}

#[derive(Clone)]
pub struct Notebook {
    store: Store,
}

impl Notebook {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create or edit the note on a verse.
    ///
    /// Blank content deletes the note and returns `None`. Edits keep the
    /// original `createdAt`.
    pub async fn save_note(&self, verse: &VerseRef, content: &str) -> Result<Option<Note>, Error> {
        check_verse(verse)?;
        let id = verse.to_string();

        if content.trim().is_empty() {
            self.store.delete::<Note>(&id).await?;
            return Ok(None);
        }

        let now = now_millis();
        let created_at = match self.store.get::<Note>(&id).await? {
            Some(existing) => existing.created_at,
            None => now,
        };
        let note = Note { id, content: content.to_string(), created_at, updated_at: now };
        self.store.put(&note).await?;
        Ok(Some(note))
    }

    pub async fn note(&self, verse: &VerseRef) -> Result<Option<Note>, Error> {
        self.store.get(&verse.to_string()).await
    }

    /// Every note, oldest edit first.
    pub async fn notes(&self) -> Result<Vec<Note>, Error> {
        self.store.get_all().await
    }

    pub async fn chapter_notes(&self, key: &ChapterKey) -> Result<Vec<Note>, Error> {
        check_chapter(key)?;
        self.store.notes_for_chapter(&key.book_id, key.chapter).await
    }

    /// Bookmark the verse, or remove its bookmark. Returns whether it is now bookmarked.
    pub async fn toggle_bookmark(&self, verse: &VerseRef) -> Result<bool, Error> {
        check_verse(verse)?;
        let id = verse.to_string();

        if self.store.delete::<Bookmark>(&id).await? {
            return Ok(false);
        }
        self.store
            .put(&Bookmark { id: id.clone(), verse_id: id, created_at: now_millis() })
            .await?;
        Ok(true)
    }

    pub async fn is_bookmarked(&self, verse: &VerseRef) -> Result<bool, Error> {
        Ok(self.store.get::<Bookmark>(&verse.to_string()).await?.is_some())
    }

    /// Every bookmark, oldest first.
    pub async fn bookmarks(&self) -> Result<Vec<Bookmark>, Error> {
        self.store.get_all().await
    }

    /// Replace the drawing for a chapter. No strokes deletes it.
    pub async fn save_drawing(&self, key: &ChapterKey, strokes: Vec<Stroke>) -> Result<Option<Drawing>, Error> {
        check_chapter(key)?;
        let id = key.to_string();

        if strokes.is_empty() {
            self.store.delete::<Drawing>(&id).await?;
            return Ok(None);
        }
        let drawing = Drawing { id, strokes };
        self.store.put(&drawing).await?;
        Ok(Some(drawing))
    }

    pub async fn drawing(&self, key: &ChapterKey) -> Result<Option<Drawing>, Error> {
        self.store.get(&key.to_string()).await
    }

    pub async fn delete_drawing(&self, key: &ChapterKey) -> Result<bool, Error> {
        self.store.delete::<Drawing>(&key.to_string()).await
    }

    /// Save an AI answer about a verse.
    pub async fn record_research(&self, verse: &VerseRef, question: &str, answer: &str) -> Result<Research, Error> {
        check_verse(verse)?;
        let verse_id = verse.to_string();

        // ids are `{verse}-{millis}`; bump the timestamp on a same-millisecond collision
        let mut created_at = now_millis();
        while self.store.get::<Research>(&format!("{verse_id}-{created_at}")).await?.is_some() {
            created_at += 1;
        }

        let research = Research {
            id: format!("{verse_id}-{created_at}"),
            verse_id,
            question: question.to_string(),
            answer: answer.to_string(),
            created_at,
        };
        self.store.put(&research).await?;
        Ok(research)
    }

    pub async fn research_for_verse(&self, verse: &VerseRef) -> Result<Vec<Research>, Error> {
        self.store.research_for_verse(&verse.to_string()).await
    }

    /// Every research item, oldest first.
    pub async fn research(&self) -> Result<Vec<Research>, Error> {
        self.store.get_all().await
    }

    pub async fn delete_research(&self, id: &str) -> Result<bool, Error> {
        self.store.delete::<Research>(id).await
    }

    /// Last chapter read in a book.
    pub async fn progress(&self, book_id: &str) -> Result<Option<ReadingProgress>, Error> {
        self.store.get(book_id).await
    }

    /// The most recently read chapter across all books.
    pub async fn last_read(&self) -> Result<Option<ReadingProgress>, Error> {
        self.store.latest_progress().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bapp_core::models::{Point, Tool};

    async fn notebook() -> Notebook {
        Notebook::new(Store::open_in_memory().await.unwrap())
    }

    fn stroke() -> Stroke {
        Stroke {
            points: vec![Point { x: 0.0, y: 0.0, pressure: None }, Point { x: 4.0, y: 3.0, pressure: Some(0.7) }],
            color: "#10B981".into(),
            width: 3.0,
            tool: Tool::Marker,
        }
    }

    #[tokio::test]
    async fn test_note_edit_keeps_created_at() {
        let notebook = notebook().await;
        let verse = VerseRef::new("gen", 1, 1);

        let first = notebook.save_note(&verse, "light").await.unwrap().unwrap();
        let edited = notebook.save_note(&verse, "let there be light").await.unwrap().unwrap();

        assert_eq!(edited.created_at, first.created_at);
        assert!(edited.updated_at >= first.updated_at);
        assert_eq!(notebook.note(&verse).await.unwrap().unwrap().content, "let there be light");
    }

    #[tokio::test]
    async fn test_blank_note_deletes() {
        let notebook = notebook().await;
        let verse = VerseRef::new("gen", 1, 1);

        notebook.save_note(&verse, "draft").await.unwrap();
        assert!(notebook.save_note(&verse, "   \n").await.unwrap().is_none());
        assert!(notebook.note(&verse).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_note_rejects_bad_reference() {
        let notebook = notebook().await;
        let err = notebook.save_note(&VerseRef::new("gen", 51, 1), "x").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_chapter_notes() {
        let notebook = notebook().await;
        notebook.save_note(&VerseRef::new("gen", 1, 1), "a").await.unwrap();
        notebook.save_note(&VerseRef::new("gen", 1, 2), "b").await.unwrap();
        notebook.save_note(&VerseRef::new("gen", 10, 1), "c").await.unwrap();

        let notes = notebook.chapter_notes(&ChapterKey::new("gen", 1)).await.unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notebook.notes().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_toggle_bookmark() {
        let notebook = notebook().await;
        let verse = VerseRef::new("jhn", 3, 16);

        assert!(notebook.toggle_bookmark(&verse).await.unwrap());
        assert!(notebook.is_bookmarked(&verse).await.unwrap());
        assert_eq!(notebook.bookmarks().await.unwrap()[0].verse_id, "jhn:3:16");

        assert!(!notebook.toggle_bookmark(&verse).await.unwrap());
        assert!(!notebook.is_bookmarked(&verse).await.unwrap());
    }

    #[tokio::test]
    async fn test_drawing_lifecycle() {
        let notebook = notebook().await;
        let key = ChapterKey::new("psa", 23);

        let saved = notebook.save_drawing(&key, vec![stroke()]).await.unwrap().unwrap();
        assert_eq!(saved.id, "psa:23");
        assert_eq!(notebook.drawing(&key).await.unwrap(), Some(saved));

        assert!(notebook.save_drawing(&key, Vec::new()).await.unwrap().is_none());
        assert!(notebook.drawing(&key).await.unwrap().is_none());
        assert!(!notebook.delete_drawing(&key).await.unwrap());
    }

    #[tokio::test]
    async fn test_drawing_with_nan_point_is_rejected() {
        let notebook = notebook().await;
        let key = ChapterKey::new("psa", 23);
        notebook.save_drawing(&key, vec![stroke()]).await.unwrap();

        let mut bad = stroke();
        bad.points.push(Point { x: f64::NAN, y: 1.0, pressure: None });
        let err = notebook.save_drawing(&key, vec![bad]).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        assert_eq!(notebook.drawing(&key).await.unwrap().unwrap().strokes, vec![stroke()]);
        assert!(notebook.store.export_backup().await.is_ok());
    }

    #[tokio::test]
    async fn test_research_history() {
        let notebook = notebook().await;
        let verse = VerseRef::new("rom", 8, 28);

        let first = notebook.record_research(&verse, "What is good?", "...").await.unwrap();
        let second = notebook.record_research(&verse, "Who is called?", "...").await.unwrap();
        notebook.record_research(&VerseRef::new("rom", 8, 29), "Foreknew?", "...").await.unwrap();
        assert_ne!(first.id, second.id);

        let items = notebook.research_for_verse(&verse).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].question, "What is good?");

        assert!(notebook.delete_research(&first.id).await.unwrap());
        assert_eq!(notebook.research_for_verse(&verse).await.unwrap().len(), 1);
        assert_eq!(notebook.research().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_progress() {
        let notebook = notebook().await;
        assert!(notebook.last_read().await.unwrap().is_none());

        notebook
            .store
            .put(&ReadingProgress { book_id: "gen".into(), chapter: 3, timestamp: 10 })
            .await
            .unwrap();
        notebook
            .store
            .put(&ReadingProgress { book_id: "mrk".into(), chapter: 1, timestamp: 20 })
            .await
            .unwrap();

        assert_eq!(notebook.progress("gen").await.unwrap().unwrap().chapter, 3);
        assert_eq!(notebook.last_read().await.unwrap().unwrap().book_id, "mrk");
    }
}
