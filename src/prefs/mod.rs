//! Preference store adapter
//!
//! The import-side settings and the always-show flag live under one fixed,
//! versionless per-user location as five DWORD values. Reads never fail:
//! a missing or out-of-range entry makes the whole record "not found".

pub mod error;
mod file;
mod memory;
#[cfg(target_os = "windows")]
mod registry;

pub use error::PrefsError;
pub use file::JsonFileStore;
pub use memory::MemoryStore;
#[cfg(target_os = "windows")]
pub use registry::RegistryStore;

use crate::options::{AlphaMode, ImportOptions};

/// Persisted entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefKey {
    AlphaAction,
    UnMult,
    IgnoreLayerText,
    MemoryMap,
    AlwaysDialog,
}

impl PrefKey {
    pub const ALL: [PrefKey; 5] = [
        PrefKey::AlphaAction,
        PrefKey::UnMult,
        PrefKey::IgnoreLayerText,
        PrefKey::MemoryMap,
        PrefKey::AlwaysDialog,
    ];

    /// Value name in the store
    pub fn name(self) -> &'static str {
        match self {
            PrefKey::AlphaAction => "Alpha Action",
            PrefKey::UnMult => "UnMult",
            PrefKey::IgnoreLayerText => "Ignore Layertext",
            PrefKey::MemoryMap => "Memory Map",
            PrefKey::AlwaysDialog => "Always Dialog",
        }
    }
}

/// Everything the import side keeps between runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportPrefs {
    pub options: ImportOptions,
    pub always_dialog: bool,
}

/// Raw DWORD storage under the fixed key path
pub trait ValueStore {
    fn read_dword(&self, name: &str) -> Option<u32>;
    fn write_dwords(&mut self, values: &[(&str, u32)]) -> Result<(), PrefsError>;
}

impl<S: ValueStore + ?Sized> ValueStore for Box<S> {
    fn read_dword(&self, name: &str) -> Option<u32> {
        (**self).read_dword(name)
    }

    fn write_dwords(&mut self, values: &[(&str, u32)]) -> Result<(), PrefsError> {
        (**self).write_dwords(values)
    }
}

/// Typed access used by the import dialog
pub trait PreferenceStore {
    /// `None` when any entry is missing or corrupt
    fn load(&self) -> Option<ImportPrefs>;
    /// Persist the supplied parts; `None` parts are left as stored
    fn save(
        &mut self,
        options: Option<&ImportOptions>,
        always_dialog: Option<bool>,
    ) -> Result<(), PrefsError>;
}

/// Schema layer over a [`ValueStore`]
#[derive(Debug, Clone, Default)]
pub struct Preferences<S> {
    store: S,
}

impl<S: ValueStore> Preferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn read_bool(&self, key: PrefKey) -> Option<bool> {
        match self.store.read_dword(key.name())? {
            0 => Some(false),
            1 => Some(true),
            other => {
                tracing::debug!("Preference {:?} has invalid value {}", key.name(), other);
                None
            }
        }
    }
}

impl<S: ValueStore> PreferenceStore for Preferences<S> {
    fn load(&self) -> Option<ImportPrefs> {
        let alpha_mode = self
            .store
            .read_dword(PrefKey::AlphaAction.name())
            .and_then(AlphaMode::from_dword)?;

        Some(ImportPrefs {
            options: ImportOptions {
                alpha_mode,
                unmult: self.read_bool(PrefKey::UnMult)?,
                ignore_layer_text: self.read_bool(PrefKey::IgnoreLayerText)?,
                memory_map: self.read_bool(PrefKey::MemoryMap)?,
            },
            always_dialog: self.read_bool(PrefKey::AlwaysDialog)?,
        })
    }

    fn save(
        &mut self,
        options: Option<&ImportOptions>,
        always_dialog: Option<bool>,
    ) -> Result<(), PrefsError> {
        let mut values = Vec::with_capacity(PrefKey::ALL.len());

        if let Some(options) = options {
            values.push((PrefKey::AlphaAction.name(), options.alpha_mode.to_dword()));
            values.push((PrefKey::UnMult.name(), u32::from(options.unmult)));
            values.push((
                PrefKey::IgnoreLayerText.name(),
                u32::from(options.ignore_layer_text),
            ));
            values.push((PrefKey::MemoryMap.name(), u32::from(options.memory_map)));
        }
        if let Some(always) = always_dialog {
            values.push((PrefKey::AlwaysDialog.name(), u32::from(always)));
        }

        if values.is_empty() {
            return Ok(());
        }
        self.store.write_dwords(&values)
    }
}

impl<P: PreferenceStore + ?Sized> PreferenceStore for &mut P {
    fn load(&self) -> Option<ImportPrefs> {
        (**self).load()
    }

    fn save(
        &mut self,
        options: Option<&ImportOptions>,
        always_dialog: Option<bool>,
    ) -> Result<(), PrefsError> {
        (**self).save(options, always_dialog)
    }
}
