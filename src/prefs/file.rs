//! JSON file value store
//!
//! Per-user preferences for hosts without a registry. The file holds a flat
//! `name -> u32` map; an unreadable or malformed file reads as empty.

use super::{PrefsError, ValueStore};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const PREFS_FILE_NAME: &str = "import_prefs.json";

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<config_dir>/<product>/import_prefs.json`
    pub fn for_product(product: &str) -> Result<Self, PrefsError> {
        let dir = dirs::config_dir().ok_or(PrefsError::NoConfigDir)?;
        Ok(Self::new(dir.join(product).join(PREFS_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> BTreeMap<String, u32> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(_) => return BTreeMap::new(),
        };
        match serde_json::from_str(&json) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!("Ignoring malformed preferences {:?}: {}", self.path, e);
                BTreeMap::new()
            }
        }
    }
}

impl ValueStore for JsonFileStore {
    fn read_dword(&self, name: &str) -> Option<u32> {
        self.read_map().get(name).copied()
    }

    fn write_dwords(&mut self, values: &[(&str, u32)]) -> Result<(), PrefsError> {
        let mut map = self.read_map();
        for (name, value) in values {
            map.insert((*name).to_owned(), *value);
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&map)?;
        std::fs::write(&self.path, json)?;

        tracing::debug!("Saved {} preference values to {:?}", values.len(), self.path);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::options::{AlphaMode, ImportOptions};
    use crate::prefs::{ImportPrefs, PreferenceStore, Preferences};
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_reads_nothing() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join(PREFS_FILE_NAME));
        assert_eq!(store.read_dword("UnMult"), None);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempdir().unwrap();
        // parent directory is created on first write
        let path = dir.path().join("ProEXR").join(PREFS_FILE_NAME);
        let mut prefs = Preferences::new(JsonFileStore::new(path.clone()));
        let options = ImportOptions {
            alpha_mode: AlphaMode::Separate,
            unmult: true,
            ignore_layer_text: true,
            memory_map: false,
        };
        prefs.save(Some(&options), Some(true)).unwrap();

        let reopened = Preferences::new(JsonFileStore::new(path));
        assert_eq!(
            reopened.load(),
            Some(ImportPrefs {
                options,
                always_dialog: true
            })
        );
    }

    #[test]
    fn test_malformed_file_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(PREFS_FILE_NAME);
        std::fs::write(&path, "{ not json").unwrap();

        let prefs = Preferences::new(JsonFileStore::new(path));
        assert_eq!(prefs.load(), None);
    }
}
