//! Plug-in configuration
//!
//! Names that locate per-user preferences, plus an optional log filter.
//! Everything has a default, so an empty JSON object is a valid config.

use crate::prefs::{Preferences, PrefsError, ValueStore};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    pub vendor: String,
    pub product: String,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: Option<String>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        // Existing installs keep their stored preferences under these names.
        Self {
            vendor: "fnord".to_string(),
            product: "ProEXR".to_string(),
            log_filter: None,
        }
    }
}

impl PluginConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Registry key below HKEY_CURRENT_USER
    pub fn registry_path(&self) -> String {
        format!("Software\\{}\\{}", self.vendor, self.product)
    }

    /// Preference store for this platform: the registry on Windows, a JSON
    /// file in the user config directory elsewhere.
    pub fn open_store(&self) -> Result<Preferences<Box<dyn ValueStore>>, PrefsError> {
        #[cfg(target_os = "windows")]
        let store: Box<dyn ValueStore> =
            Box::new(crate::prefs::RegistryStore::new(&self.registry_path()));

        #[cfg(not(target_os = "windows"))]
        let store: Box<dyn ValueStore> =
            Box::new(crate::prefs::JsonFileStore::for_product(&self.product)?);

        Ok(Preferences::new(store))
    }
}
