//! Repository for the singleton settings record.

use crate::models::settings::{Settings, UpdateSettings, SETTINGS, SETTINGS_ID};
use crate::store::{to_document, RecordStore, StoreError};

/// Provides data access for site settings.
pub struct SettingsRepo;

impl SettingsRepo {
    /// Read the settings, writing the defaults first if none exist yet.
    pub async fn get(store: &dyn RecordStore) -> Result<Settings, StoreError> {
        if let Some(record) = store.get(SETTINGS, SETTINGS_ID).await? {
            return record.into_model();
        }

        tracing::info!("Settings missing, writing defaults");
        store
            .upsert(SETTINGS, SETTINGS_ID, to_document(&UpdateSettings::defaults())?)
            .await?;
        Self::fetch(store).await
    }

    /// Apply a partial update, creating the record with defaults if needed.
    pub async fn update(
        store: &dyn RecordStore,
        dto: &UpdateSettings,
    ) -> Result<Settings, StoreError> {
        Self::get(store).await?;
        store
            .upsert(SETTINGS, SETTINGS_ID, to_document(dto)?)
            .await?;
        Self::fetch(store).await
    }

    async fn fetch(store: &dyn RecordStore) -> Result<Settings, StoreError> {
        store
            .get(SETTINGS, SETTINGS_ID)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                collection: SETTINGS.to_string(),
                id: SETTINGS_ID.to_string(),
            })?
            .into_model()
    }
}
