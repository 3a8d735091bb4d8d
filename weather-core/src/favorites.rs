//! Persisted list of favorite city names.
//!
//! The whole list lives in a single storage slot as a JSON array of strings.
//! It is read once when the store is opened and rewritten in full after
//! every mutation.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::WeatherError;

pub const FAVORITES_SLOT: &str = "weather-favorites";

/// Durable string slots, the moral equivalent of browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn read(&self, slot: &str) -> Result<Option<String>>;

    fn write(&self, slot: &str, value: &str) -> Result<()>;
}

/// One `<slot>.json` file per slot inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, slot: &str) -> Result<Option<String>> {
        let path = self.slot_path(slot);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read storage slot: {}", path.display()))?;
        Ok(Some(contents))
    }

    fn write(&self, slot: &str, value: &str) -> Result<()> {
        write_atomic(&self.slot_path(slot), value.as_bytes())
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("Storage path has no parent directory: {}", path.display()))?;
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create storage directory: {}", parent.display()))?;

    let tmp_path = path.with_extension(format!("{}.tmp", std::process::id()));
    fs::write(&tmp_path, bytes)
        .with_context(|| format!("Failed to write storage file: {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to replace storage file: {}", path.display()))?;
    Ok(())
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, slot: &str) -> Result<Option<String>> {
        Ok(self.slots.lock().get(slot).cloned())
    }

    fn write(&self, slot: &str, value: &str) -> Result<()> {
        self.slots.lock().insert(slot.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn read(&self, slot: &str) -> Result<Option<String>> {
        (**self).read(slot)
    }

    fn write(&self, slot: &str, value: &str) -> Result<()> {
        (**self).write(slot, value)
    }
}

/// Parse a persisted favorites payload. Duplicates keep their first position.
pub fn parse_favorites(raw: &str) -> Result<Vec<String>, WeatherError> {
    let cities: Vec<String> =
        serde_json::from_str(raw).map_err(|e| WeatherError::PersistStateCorrupt(e.to_string()))?;

    let mut unique: Vec<String> = Vec::with_capacity(cities.len());
    for city in cities {
        if !unique.contains(&city) {
            unique.push(city);
        }
    }
    Ok(unique)
}

pub struct FavoritesStore<S: KeyValueStore> {
    storage: S,
    cities: Vec<String>,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    /// Open the store, loading whatever was persisted. Unreadable or corrupt
    /// state is logged and replaced by an empty list.
    pub fn load(storage: S) -> Self {
        let cities = match storage.read(FAVORITES_SLOT) {
            Ok(None) => Vec::new(),
            Ok(Some(raw)) => parse_favorites(&raw).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "resetting favorites");
                Vec::new()
            }),
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "failed to read favorites, starting empty");
                Vec::new()
            }
        };

        Self { storage, cities }
    }

    /// Favorites in insertion order.
    pub fn list(&self) -> &[String] {
        &self.cities
    }

    pub fn is_favorite(&self, city: &str) -> bool {
        self.cities.iter().any(|c| c == city)
    }

    /// Append `city` unless it is already present. Returns whether it was added.
    pub fn add(&mut self, city: &str) -> Result<bool, WeatherError> {
        if self.is_favorite(city) {
            return Ok(false);
        }

        let mut updated = self.cities.clone();
        updated.push(city.to_string());
        self.commit(updated)?;
        Ok(true)
    }

    /// Remove `city`. Returns whether it was present.
    pub fn remove(&mut self, city: &str) -> Result<bool, WeatherError> {
        let updated: Vec<String> = self.cities.iter().filter(|c| *c != city).cloned().collect();
        let removed = updated.len() != self.cities.len();
        self.commit(updated)?;
        Ok(removed)
    }

    /// Add `city` if absent, remove it if present. Returns whether it is now a favorite.
    pub fn toggle(&mut self, city: &str) -> Result<bool, WeatherError> {
        if self.is_favorite(city) {
            self.remove(city)?;
            Ok(false)
        } else {
            self.add(city)?;
            Ok(true)
        }
    }

    // The in-memory list only changes once the write has succeeded.
    fn commit(&mut self, updated: Vec<String>) -> Result<(), WeatherError> {
        let payload =
            serde_json::to_string(&updated).map_err(|e| WeatherError::Storage(e.to_string()))?;
        self.storage
            .write(FAVORITES_SLOT, &payload)
            .map_err(|e| WeatherError::Storage(format!("{e:#}")))?;

        self.cities = updated;
        Ok(())
    }
}

impl<S: KeyValueStore> std::fmt::Debug for FavoritesStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore").field("cities", &self.cities).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Debug, Default)]
    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn read(&self, _slot: &str) -> Result<Option<String>> {
            Ok(Some(r#"["Oslo"]"#.to_string()))
        }

        fn write(&self, _slot: &str, _value: &str) -> Result<()> {
            Err(anyhow::anyhow!("disk full"))
        }
    }

    #[test]
    fn add_is_idempotent() {
        let mut store = FavoritesStore::load(MemoryStore::new());

        assert!(store.add("Paris").unwrap());
        assert_eq!(store.list(), ["Paris"]);

        assert!(!store.add("Paris").unwrap());
        assert_eq!(store.list(), ["Paris"]);
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut store = FavoritesStore::load(MemoryStore::new());

        assert!(store.toggle("Paris").unwrap());
        assert!(store.is_favorite("Paris"));
        assert!(!store.toggle("Paris").unwrap());
        assert!(!store.is_favorite("Paris"));
        assert!(store.list().is_empty());
    }

    #[test]
    fn list_keeps_insertion_order() {
        let mut store = FavoritesStore::load(MemoryStore::new());
        for city in ["Tokyo", "Lima", "Oslo"] {
            store.add(city).unwrap();
        }
        store.remove("Lima").unwrap();
        store.add("Cairo").unwrap();

        assert_eq!(store.list(), ["Tokyo", "Oslo", "Cairo"]);
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut store = FavoritesStore::load(MemoryStore::new());
        store.add("Paris").unwrap();
        assert!(!store.is_favorite("paris"));
    }

    #[test]
    fn every_mutation_persists_full_list() {
        let backing = Arc::new(MemoryStore::new());
        let mut store = FavoritesStore::load(backing.clone());

        store.add("Paris").unwrap();
        store.add("Rome").unwrap();
        assert_eq!(backing.read(FAVORITES_SLOT).unwrap().as_deref(), Some(r#"["Paris","Rome"]"#));

        store.remove("Paris").unwrap();
        assert_eq!(backing.read(FAVORITES_SLOT).unwrap().as_deref(), Some(r#"["Rome"]"#));
    }

    #[test]
    fn reload_reproduces_list() {
        let backing = Arc::new(MemoryStore::new());
        {
            let mut store = FavoritesStore::load(backing.clone());
            store.add("Paris").unwrap();
            store.add("Berlin").unwrap();
        }

        let reloaded = FavoritesStore::load(backing);
        assert_eq!(reloaded.list(), ["Paris", "Berlin"]);
    }

    #[test]
    fn corrupt_state_self_heals_to_empty() {
        let backing = Arc::new(MemoryStore::new());
        backing.write(FAVORITES_SLOT, "{not-json").unwrap();

        let mut store = FavoritesStore::load(backing.clone());
        assert!(store.list().is_empty());

        store.add("Paris").unwrap();
        assert_eq!(backing.read(FAVORITES_SLOT).unwrap().as_deref(), Some(r#"["Paris"]"#));
    }

    #[test]
    fn non_string_array_is_corrupt() {
        let err = parse_favorites("[1, 2]").unwrap_err();
        assert!(matches!(err, WeatherError::PersistStateCorrupt(_)));
        assert!(parse_favorites(r#"{"city": "Paris"}"#).is_err());
    }

    #[test]
    fn duplicates_in_persisted_state_are_dropped() {
        let cities = parse_favorites(r#"["Paris","Rome","Paris"]"#).unwrap();
        assert_eq!(cities, ["Paris", "Rome"]);
    }

    #[test]
    fn failed_write_leaves_list_untouched() {
        let mut store = FavoritesStore::load(FailingStore);
        assert_eq!(store.list(), ["Oslo"]);

        let err = store.add("Paris").unwrap_err();
        assert!(matches!(err, WeatherError::Storage(_)));
        assert!(err.to_string().contains("disk full"));
        assert_eq!(store.list(), ["Oslo"]);

        assert!(store.toggle("Oslo").is_err());
        assert!(store.is_favorite("Oslo"));
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let files = FileStore::new(dir.path().join("favorites"));

        {
            let mut store = FavoritesStore::load(files.clone());
            store.add("Paris").unwrap();
            store.add("Kyiv").unwrap();
        }

        let on_disk = fs::read_to_string(files.slot_path(FAVORITES_SLOT)).expect("read");
        assert_eq!(on_disk, r#"["Paris","Kyiv"]"#);

        let reloaded = FavoritesStore::load(files);
        assert_eq!(reloaded.list(), ["Paris", "Kyiv"]);
    }

    #[test]
    fn file_store_missing_slot_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FavoritesStore::load(FileStore::new(dir.path()));
        assert!(store.list().is_empty());
    }
}
