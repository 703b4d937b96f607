//! Application context: the single owner of the store and every service.

use std::sync::Arc;

use bapp_client::{BibleApiClient, ScriptureConfig, ScriptureSource};
use bapp_core::{AppConfig, Error, ImportSummary, Store, VibeChange};

use crate::assistant::Assistant;
use crate::chapters::ChapterService;
use crate::notebook::Notebook;
use crate::settings::SettingsService;

pub struct AppContext {
    config: AppConfig,
    store: Store,
    chapters: ChapterService,
    settings: SettingsService,
    assistant: Arc<Assistant>,
    notebook: Notebook,
}

impl AppContext {
    /// Open the store at `config.db_path` and build every service.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the configuration does not validate, or a store
    /// error when the database cannot be opened or migrated.
    pub async fn init(config: AppConfig) -> Result<Self, Error> {
        let source = BibleApiClient::new(ScriptureConfig {
            base_url: config.scripture_base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        })
        .map_err(|e| Error::InvalidInput(e.to_string()))?;

        Self::with_source(config, Arc::new(source)).await
    }

    /// Like [`AppContext::init`] with a caller-supplied Scripture source.
    pub async fn with_source(config: AppConfig, source: Arc<dyn ScriptureSource>) -> Result<Self, Error> {
        config.validate().map_err(|e| Error::InvalidInput(e.to_string()))?;

        let store = Store::open(&config.db_path).await?;
        let assistant = Arc::new(Assistant::new(&config));
        let settings = SettingsService::load(store.clone(), Arc::clone(&assistant)).await?;
        let chapters = ChapterService::new(store.clone(), source, &config);
        let notebook = Notebook::new(store.clone());

        tracing::info!(db_path = %config.db_path.display(), "application context initialized");
        Ok(Self { config, store, chapters, settings, assistant, notebook })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn chapters(&self) -> &ChapterService {
        &self.chapters
    }

    pub fn settings(&self) -> &SettingsService {
        &self.settings
    }

    pub fn assistant(&self) -> &Assistant {
        &self.assistant
    }

    pub fn notebook(&self) -> &Notebook {
        &self.notebook
    }

    /// Export every collection as a JSON backup.
    pub async fn export_backup(&self) -> Result<String, Error> {
        self.store.export_backup().await
    }

    /// Import a JSON backup and reload settings from the result.
    pub async fn import_backup(&self, json: &str) -> Result<ImportSummary, Error> {
        let summary = self.store.import_backup(json).await?;
        if summary.settings > 0 {
            self.settings.reload().await?;
        }
        Ok(summary)
    }

    /// Keep customizations produced by the assistant.
    pub async fn save_customizations(&self, changes: &[VibeChange]) -> Result<(), Error> {
        self.store.append_customizations(changes).await
    }

    /// Saved customizations in the order they were saved.
    pub async fn customizations(&self) -> Result<Vec<VibeChange>, Error> {
        self.store.customizations().await
    }

    pub async fn clear_customizations(&self) -> Result<u64, Error> {
        self.store.clear_customizations().await
    }

    /// Abort background work and close the store.
    pub async fn shutdown(self) -> Result<(), Error> {
        self.chapters.shutdown().await;
        self.store.close().await?;
        tracing::info!("application context shut down");
        Ok(())
    }
}
