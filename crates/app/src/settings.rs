//! Settings service: in-memory copy of the settings record, persisted on every update.

use std::sync::Arc;

use bapp_core::{AppSettings, Error, SettingsPatch, Store};
use tokio::sync::RwLock;

use crate::assistant::Assistant;

pub struct SettingsService {
    store: Store,
    current: RwLock<AppSettings>,
    assistant: Arc<Assistant>,
}

impl SettingsService {
    /// Load the persisted settings (or defaults) and configure the assistant from them.
    pub async fn load(store: Store, assistant: Arc<Assistant>) -> Result<Self, Error> {
        let settings = store.read_settings().await?;
        assistant.configure(&settings).await?;
        Ok(Self { store, current: RwLock::new(settings), assistant })
    }

    /// Current settings.
    pub async fn read(&self) -> AppSettings {
        self.current.read().await.clone()
    }

    /// Merge `patch` into the current settings, persist the result and
    /// reconfigure the assistant.
    ///
    /// Fields absent from the patch keep their value. Nothing changes in
    /// memory if the write fails.
    pub async fn update(&self, patch: SettingsPatch) -> Result<AppSettings, Error> {
        let merged = {
            let mut current = self.current.write().await;
            let mut merged = current.clone();
            merged.apply(patch);
            self.store.save_settings(&merged).await?;
            *current = merged.clone();
            merged
        };

        tracing::debug!(settings = ?merged, "settings updated");
        self.assistant.configure(&merged).await?;
        Ok(merged)
    }

    /// Re-read settings from the store, e.g. after an import.
    pub async fn reload(&self) -> Result<AppSettings, Error> {
        let settings = self.store.read_settings().await?;
        *self.current.write().await = settings.clone();
        self.assistant.configure(&settings).await?;
        Ok(settings)
    }
}
