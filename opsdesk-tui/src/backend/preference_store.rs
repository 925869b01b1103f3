//! File-backed preference store
//!
//! Persists UI memory (expanded sections and the like) as a flat JSON
//! map. Reads come from an in-memory copy loaded on construction; every
//! write goes straight through to disk.

use opsdesk_core::{CoreError, CoreResult, PreferenceStore};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// JSON-file backed preference store.
pub struct JsonPreferenceStore {
    file_path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl JsonPreferenceStore {
    /// Open (or start) the store at `data_dir/preferences.json`.
    ///
    /// An unreadable file starts the store empty rather than failing;
    /// the next write replaces it.
    pub fn open(data_dir: PathBuf) -> Self {
        let file_path = data_dir.join("preferences.json");
        let values = match fs::read_to_string(&file_path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("Discarding unreadable preferences: {e}");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self {
            file_path,
            values: Mutex::new(values),
        }
    }

    fn write_through(&self, values: &BTreeMap<String, String>) -> CoreResult<()> {
        if let Some(dir) = self.file_path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| CoreError::StorageError(e.to_string()))?;
            }
        }
        let content = serde_json::to_string_pretty(values)
            .map_err(|e| CoreError::SerializationError(e.to_string()))?;
        fs::write(&self.file_path, content).map_err(|e| CoreError::StorageError(e.to_string()))
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        self.write_through(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_a_new_instance() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let first = JsonPreferenceStore::open(tmp.path().to_path_buf());
        first.set("invoices.expanded", "[0,2]").unwrap();
        drop(first);

        let second = JsonPreferenceStore::open(tmp.path().to_path_buf());
        assert_eq!(
            second.get("invoices.expanded").unwrap().as_deref(),
            Some("[0,2]")
        );
        assert_eq!(second.get("missing").unwrap(), None);
    }

    #[test]
    fn corrupt_file_starts_empty_and_heals_on_write() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        fs::write(tmp.path().join("preferences.json"), "not json").unwrap();

        let store = JsonPreferenceStore::open(tmp.path().to_path_buf());
        assert_eq!(store.get("invoices.expanded").unwrap(), None);

        store.set("invoices.expanded", "[1]").unwrap();
        let content = fs::read_to_string(tmp.path().join("preferences.json")).unwrap();
        assert!(content.contains("invoices.expanded"));
    }
}
