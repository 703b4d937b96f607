//! Chapter fetch/cache service.
//!
//! Chapters are served cache-first. On a miss both translations are fetched
//! concurrently and must both succeed; the merged chapter is written to the
//! store before it is returned. Navigation records reading progress and warms
//! the cache with the neighbouring chapters in a bounded background task set.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bapp_client::ScriptureSource;
use bapp_core::models::{ReadingProgress, Verse, book, now_millis};
use bapp_core::{AppConfig, CachedChapter, Error, Store};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Fetches and caches merged chapters. Cheap to clone into preload tasks.
#[derive(Clone)]
struct ChapterLoader {
    store: Store,
    source: Arc<dyn ScriptureSource>,
    primary: String,
    secondary: String,
}

impl ChapterLoader {
    async fn load(&self, book_id: &str, chapter: u32) -> Result<CachedChapter, Error> {
        if let Some(cached) = self.store.cached_chapter(book_id, chapter).await? {
            tracing::debug!(book_id, chapter, "chapter cache hit");
            return Ok(cached);
        }
        tracing::debug!(book_id, chapter, "chapter cache miss");

        let (chinese, english) = tokio::try_join!(
            self.source.fetch_translation(book_id, chapter, &self.primary),
            self.source.fetch_translation(book_id, chapter, &self.secondary),
        )
        .map_err(|e| Error::chapter_load(book_id, chapter, e))?;

        if chinese.is_empty() && english.is_empty() {
            return Err(Error::chapter_load(book_id, chapter, "no verses returned"));
        }

        let merged = CachedChapter::merge(book_id, chapter, chinese, english);
        self.store.put_chapter(&merged).await?;
        Ok(merged)
    }
}

/// Loads chapters, tracks reading progress, and preloads neighbours.
pub struct ChapterService {
    loader: ChapterLoader,
    preloads: Mutex<JoinSet<()>>,
    permits: Arc<Semaphore>,
    max_pending: usize,
}

impl ChapterService {
    pub fn new(store: Store, source: Arc<dyn ScriptureSource>, config: &AppConfig) -> Self {
        Self {
            loader: ChapterLoader {
                store,
                source,
                primary: config.primary_translation.clone(),
                secondary: config.secondary_translation.clone(),
            },
            preloads: Mutex::new(JoinSet::new()),
            permits: Arc::new(Semaphore::new(config.preload_concurrency.max(1))),
            max_pending: config.max_pending_preloads,
        }
    }

    fn tasks(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.preloads.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load a merged chapter, from cache when possible.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an unknown book or out-of-range chapter (checked
    /// before cache or network), `ChapterLoad` when either translation fails.
    pub async fn load(&self, book_id: &str, chapter: u32) -> Result<CachedChapter, Error> {
        book::validate(book_id, chapter)?;
        self.loader.load(book_id, chapter).await
    }

    /// Load a chapter as the one being read: records progress and preloads
    /// the previous and next chapters of the same book.
    pub async fn navigate(&self, book_id: &str, chapter: u32) -> Result<CachedChapter, Error> {
        let book = book::validate(book_id, chapter)?;
        let loaded = self.loader.load(book_id, chapter).await?;

        self.loader
            .store
            .put(&ReadingProgress { book_id: book.id.to_string(), chapter, timestamp: now_millis() })
            .await?;

        for adjacent in book.adjacent_chapters(chapter) {
            self.preload(book.id, adjacent);
        }
        Ok(loaded)
    }

    /// Navigate to the following chapter, crossing into the next book.
    ///
    /// Returns `None` after the last chapter of the canon.
    pub async fn next(&self, book_id: &str, chapter: u32) -> Result<Option<CachedChapter>, Error> {
        book::validate(book_id, chapter)?;
        match book::next_chapter(book_id, chapter) {
            Some((book, next)) => self.navigate(book.id, next).await.map(Some),
            None => Ok(None),
        }
    }

    /// Navigate to the preceding chapter, crossing into the previous book.
    ///
    /// Returns `None` before the first chapter of the canon.
    pub async fn previous(&self, book_id: &str, chapter: u32) -> Result<Option<CachedChapter>, Error> {
        book::validate(book_id, chapter)?;
        match book::previous_chapter(book_id, chapter) {
            Some((book, previous)) => self.navigate(book.id, previous).await.map(Some),
            None => Ok(None),
        }
    }

    /// A single verse of a chapter, loading the chapter if needed.
    pub async fn verse(&self, book_id: &str, chapter: u32, verse: u32) -> Result<Option<Verse>, Error> {
        let loaded = self.load(book_id, chapter).await?;
        Ok(loaded.verse(verse).cloned())
    }

    pub async fn is_cached(&self, book_id: &str, chapter: u32) -> Result<bool, Error> {
        book::validate(book_id, chapter)?;
        self.loader.store.has_chapter(book_id, chapter).await
    }

    /// Warm the cache for a chapter in the background.
    ///
    /// Failures are logged and dropped. Pairs outside the canon are skipped
    /// without a fetch, as is any request made while too many preloads are
    /// already in flight.
    pub fn preload(&self, book_id: &str, chapter: u32) {
        if let Err(e) = book::validate(book_id, chapter) {
            tracing::debug!(book_id, chapter, error = %e, "preload skipped, not in canon");
            return;
        }

        let mut tasks = self.tasks();
        while tasks.try_join_next().is_some() {}

        if tasks.len() >= self.max_pending {
            tracing::debug!(book_id, chapter, pending = tasks.len(), "preload skipped, backlog full");
            return;
        }

        let loader = self.loader.clone();
        let permits = Arc::clone(&self.permits);
        let book_id = book_id.to_string();

        tasks.spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            match loader.load(&book_id, chapter).await {
                Ok(_) => tracing::debug!(book_id = %book_id, chapter, "preloaded chapter"),
                Err(e) => tracing::debug!(book_id = %book_id, chapter, error = %e, "preload failed"),
            }
        });
    }

    /// Number of preload tasks not yet finished.
    pub fn pending_preloads(&self) -> usize {
        let mut tasks = self.tasks();
        while tasks.try_join_next().is_some() {}
        tasks.len()
    }

    /// Wait for every in-flight preload to finish.
    pub async fn wait_for_preloads(&self) {
        let mut tasks = std::mem::take(&mut *self.tasks());
        while tasks.join_next().await.is_some() {}
    }

    /// Abort outstanding preloads.
    pub async fn shutdown(&self) {
        let mut tasks = std::mem::take(&mut *self.tasks());
        let aborted = tasks.len();
        tasks.shutdown().await;
        if aborted > 0 {
            tracing::debug!(aborted, "aborted pending preloads");
        }
    }
}
