use std::time::Duration;

use moka::future::Cache;
use serde::de::DeserializeOwned;

use crate::model::settings::{
    DATABASE_SETTINGS_KEY, DatabaseSettings, STORAGE_SETTINGS_KEY, StorageSettings,
    WAHA_SETTINGS_KEY, WahaSettings,
};
use crate::store::{HrisStore, StoreError};

const SETTINGS_TTL: Duration = Duration::from_secs(60);

/// Read-through cache in front of the settings table. Every request
/// that gates on a settings document (payroll fan-out, uploads, leave
/// notifications) goes through here instead of hitting the store.
/// Writers must call [`SettingsCache::invalidate`] after a save.
pub struct SettingsCache {
    cache: Cache<String, Option<String>>,
}

impl SettingsCache {
    pub fn new() -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(16)
                .time_to_live(SETTINGS_TTL)
                .build(),
        }
    }

    pub async fn raw(
        &self,
        store: &dyn HrisStore,
        key: &str,
    ) -> Result<Option<String>, StoreError> {
        if let Some(cached) = self.cache.get(key).await {
            return Ok(cached);
        }
        let value = store.get_setting(key).await?;
        self.cache.insert(key.to_string(), value.clone()).await;
        Ok(value)
    }

    pub async fn invalidate(&self, key: &str) {
        self.cache.invalidate(key).await;
    }

    pub async fn database(&self, store: &dyn HrisStore) -> Result<DatabaseSettings, StoreError> {
        Ok(parse(self.raw(store, DATABASE_SETTINGS_KEY).await?))
    }

    pub async fn storage(&self, store: &dyn HrisStore) -> Result<StorageSettings, StoreError> {
        Ok(parse(self.raw(store, STORAGE_SETTINGS_KEY).await?))
    }

    pub async fn waha(&self, store: &dyn HrisStore) -> Result<WahaSettings, StoreError> {
        Ok(parse(self.raw(store, WAHA_SETTINGS_KEY).await?))
    }
}

impl Default for SettingsCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Missing or unreadable documents fall back to the disabled defaults.
fn parse<T: DeserializeOwned + Default>(raw: Option<String>) -> T {
    raw.and_then(|value| serde_json::from_str(&value).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[actix_web::test]
    async fn missing_document_yields_disabled_defaults() {
        let store = MemoryStore::new();
        let cache = SettingsCache::new();
        let waha = cache.waha(&store).await.unwrap();
        assert!(!waha.enabled);
        assert!(waha.endpoint.is_empty());
    }

    #[actix_web::test]
    async fn cached_value_is_served_until_invalidated() {
        let store = MemoryStore::new();
        let cache = SettingsCache::new();
        store
            .put_setting(WAHA_SETTINGS_KEY, r#"{"enabled":false}"#)
            .await
            .unwrap();
        assert!(!cache.waha(&store).await.unwrap().enabled);

        store
            .put_setting(WAHA_SETTINGS_KEY, r#"{"enabled":true}"#)
            .await
            .unwrap();
        assert!(!cache.waha(&store).await.unwrap().enabled);

        cache.invalidate(WAHA_SETTINGS_KEY).await;
        assert!(cache.waha(&store).await.unwrap().enabled);
    }

    #[actix_web::test]
    async fn corrupt_json_falls_back_to_defaults() {
        let store = MemoryStore::new();
        let cache = SettingsCache::new();
        store
            .put_setting(STORAGE_SETTINGS_KEY, "not-json")
            .await
            .unwrap();
        let storage = cache.storage(&store).await.unwrap();
        assert!(!storage.enabled);
        assert!(storage.bucket_name.is_empty());
    }
}
