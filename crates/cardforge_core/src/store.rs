//! Saved styles
//!
//! Saved styles live as one JSON array under a fixed key in a key/value
//! backend. The array is read once when the store opens and rewritten in
//! full after every change.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::StyleConfig;
use crate::error::{CoreError, Result};

/// Storage key of the saved-style array
pub const SAVED_STYLES_KEY: &str = "cardEditorSavedStylesV3";

/// A named snapshot of a config
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedStyle {
    /// Creation time in unix milliseconds, unique within a store
    pub id: i64,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub config: StyleConfig,
}

/// String key/value storage
pub trait StorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory backend
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Directory backend: one `<key>.json` file per key
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Saved styles over a storage backend
pub struct SavedStyleStore<S: StorageBackend> {
    backend: S,
    styles: Vec<SavedStyle>,
}

impl<S: StorageBackend> SavedStyleStore<S> {
    /// Open the store, discarding stored data that does not parse
    pub fn load(mut backend: S) -> Result<Self> {
        let styles = match backend.get(SAVED_STYLES_KEY)? {
            Some(text) => match serde_json::from_str::<Vec<SavedStyle>>(&text) {
                Ok(styles) => styles,
                Err(e) => {
                    warn!("Discarding corrupt saved styles: {}", e);
                    backend.remove(SAVED_STYLES_KEY)?;
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        debug!("Loaded {} saved styles", styles.len());
        Ok(Self { backend, styles })
    }

    pub fn list(&self) -> &[SavedStyle] {
        &self.styles
    }

    pub fn get(&self, id: i64) -> Option<&SavedStyle> {
        self.styles.iter().find(|s| s.id == id)
    }

    /// Save a snapshot of `config` under `name`
    pub fn save(&mut self, name: &str, config: &StyleConfig) -> Result<&SavedStyle> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::EmptyStyleName);
        }

        let timestamp = Utc::now();
        let last_id = self.styles.iter().map(|s| s.id).max().unwrap_or(i64::MIN);
        let id = timestamp.timestamp_millis().max(last_id.saturating_add(1));

        self.styles.push(SavedStyle {
            id,
            name: name.to_string(),
            timestamp,
            config: config.clone(),
        });
        self.persist()?;
        info!("Saved style {:?} ({})", name, id);

        self.get(id).ok_or(CoreError::StyleNotFound(id))
    }

    /// Delete a saved style
    pub fn delete(&mut self, id: i64) -> Result<SavedStyle> {
        let index = self
            .styles
            .iter()
            .position(|s| s.id == id)
            .ok_or(CoreError::StyleNotFound(id))?;
        let removed = self.styles.remove(index);
        self.persist()?;
        Ok(removed)
    }

    pub fn into_backend(self) -> S {
        self.backend
    }

    fn persist(&mut self) -> Result<()> {
        let text = serde_json::to_string(&self.styles)?;
        self.backend.set(SAVED_STYLES_KEY, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_reload() {
        let mut store = SavedStyleStore::load(MemoryStorage::new()).unwrap();
        let mut config = StyleConfig::default();
        config.opacity = 42.0;

        let id = store.save("  Mine  ", &config).unwrap().id;
        assert_eq!(store.get(id).unwrap().name, "Mine");

        let reopened = SavedStyleStore::load(store.into_backend()).unwrap();
        assert_eq!(reopened.list().len(), 1);
        assert_eq!(reopened.list()[0].config, config);
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let mut store = SavedStyleStore::load(MemoryStorage::new()).unwrap();
        let config = StyleConfig::default();
        let a = store.save("a", &config).unwrap().id;
        let b = store.save("b", &config).unwrap().id;
        let c = store.save("c", &config).unwrap().id;
        assert!(a < b && b < c);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut store = SavedStyleStore::load(MemoryStorage::new()).unwrap();
        let result = store.save("   ", &StyleConfig::default());
        assert!(matches!(result, Err(CoreError::EmptyStyleName)));
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_delete() {
        let mut store = SavedStyleStore::load(MemoryStorage::new()).unwrap();
        let id = store.save("gone", &StyleConfig::default()).unwrap().id;
        assert_eq!(store.delete(id).unwrap().name, "gone");
        assert!(matches!(store.delete(id), Err(CoreError::StyleNotFound(_))));

        let backend = store.into_backend();
        assert_eq!(backend.get(SAVED_STYLES_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_corrupt_data_is_discarded() {
        let mut backend = MemoryStorage::new();
        backend.set(SAVED_STYLES_KEY, "{not json").unwrap();

        let store = SavedStyleStore::load(backend).unwrap();
        assert!(store.list().is_empty());
        assert_eq!(store.into_backend().get(SAVED_STYLES_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("styles");

        let mut store = SavedStyleStore::load(FileStorage::new(&nested)).unwrap();
        store.save("on disk", &StyleConfig::default()).unwrap();
        assert!(nested.join(format!("{}.json", SAVED_STYLES_KEY)).exists());

        let reopened = SavedStyleStore::load(FileStorage::new(&nested)).unwrap();
        assert_eq!(reopened.list()[0].name, "on disk");
    }

    #[test]
    fn test_file_storage_missing_key() {
        let dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(dir.path());
        assert_eq!(storage.get("absent").unwrap(), None);
        storage.remove("absent").unwrap();
    }
}
