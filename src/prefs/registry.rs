//! Registry value store
//!
//! REG_DWORD values under `HKEY_CURRENT_USER\<key path>`.

use super::{PrefsError, ValueStore};
use windows::core::PCWSTR;
use windows::Win32::Foundation::ERROR_SUCCESS;
use windows::Win32::System::Registry::{
    RegCloseKey, RegCreateKeyExW, RegOpenKeyExW, RegQueryValueExW, RegSetValueExW, HKEY,
    HKEY_CURRENT_USER, KEY_READ, KEY_WRITE, REG_DWORD, REG_OPTION_NON_VOLATILE, REG_VALUE_TYPE,
};

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

#[derive(Debug, Clone)]
pub struct RegistryStore {
    key_path: Vec<u16>,
}

impl RegistryStore {
    /// `key_path` is relative to HKEY_CURRENT_USER, e.g. `Software\Vendor\Product`
    pub fn new(key_path: &str) -> Self {
        Self {
            key_path: wide(key_path),
        }
    }
}

/// Closes the key on drop
struct OpenKey(HKEY);

impl Drop for OpenKey {
    fn drop(&mut self) {
        unsafe {
            let _ = RegCloseKey(self.0);
        }
    }
}

impl ValueStore for RegistryStore {
    fn read_dword(&self, name: &str) -> Option<u32> {
        let mut hkey = HKEY::default();
        let status = unsafe {
            RegOpenKeyExW(
                HKEY_CURRENT_USER,
                PCWSTR(self.key_path.as_ptr()),
                0,
                KEY_READ,
                &mut hkey,
            )
        };
        if status != ERROR_SUCCESS {
            return None;
        }
        let key = OpenKey(hkey);

        let name = wide(name);
        let mut value_type = REG_VALUE_TYPE::default();
        let mut value = 0u32;
        let mut size = std::mem::size_of::<u32>() as u32;
        let status = unsafe {
            RegQueryValueExW(
                key.0,
                PCWSTR(name.as_ptr()),
                None,
                Some(&mut value_type),
                Some(&mut value as *mut u32 as *mut u8),
                Some(&mut size),
            )
        };

        if status == ERROR_SUCCESS && value_type == REG_DWORD && size == 4 {
            Some(value)
        } else {
            None
        }
    }

    fn write_dwords(&mut self, values: &[(&str, u32)]) -> Result<(), PrefsError> {
        let mut hkey = HKEY::default();
        let status = unsafe {
            RegCreateKeyExW(
                HKEY_CURRENT_USER,
                PCWSTR(self.key_path.as_ptr()),
                0,
                PCWSTR::null(),
                REG_OPTION_NON_VOLATILE,
                KEY_WRITE,
                None,
                &mut hkey,
                None,
            )
        };
        if status != ERROR_SUCCESS {
            return Err(PrefsError::Registry(status.0));
        }
        let key = OpenKey(hkey);

        // Every value is attempted; the first failure is reported.
        let mut first_error = None;
        for (name, value) in values {
            let name = wide(name);
            let status = unsafe {
                RegSetValueExW(
                    key.0,
                    PCWSTR(name.as_ptr()),
                    0,
                    REG_DWORD,
                    Some(&value.to_le_bytes()),
                )
            };
            if status != ERROR_SUCCESS {
                first_error.get_or_insert(status.0);
            }
        }

        match first_error {
            Some(code) => Err(PrefsError::Registry(code)),
            None => Ok(()),
        }
    }
}
