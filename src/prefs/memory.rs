//! In-process value store
//!
//! Used for tests and for hosts that run without a per-user profile.

use super::{PrefsError, ValueStore};
use std::collections::BTreeMap;
use std::io;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, u32>,
    writes: usize,
    read_only: bool,
}

impl MemoryStore {
    /// Store that rejects every write
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Default::default()
        }
    }

    /// Number of successful `write_dwords` calls
    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn values(&self) -> &BTreeMap<String, u32> {
        &self.values
    }
}

impl ValueStore for MemoryStore {
    fn read_dword(&self, name: &str) -> Option<u32> {
        self.values.get(name).copied()
    }

    fn write_dwords(&mut self, values: &[(&str, u32)]) -> Result<(), PrefsError> {
        if self.read_only {
            return Err(PrefsError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "store is read-only",
            )));
        }
        for (name, value) in values {
            self.values.insert((*name).to_owned(), *value);
        }
        self.writes += 1;
        Ok(())
    }
}
