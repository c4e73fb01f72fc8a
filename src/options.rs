//! Option records exchanged with the host
//!
//! Export options live for one export session and are never persisted.
//! Import options are mirrored into the preference store as the user's
//! last explicit choice.

use crate::compression::Compression;

/// Write-side options handed to the encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportOptions {
    pub compression: Compression,
    /// Store 32-bit float channels instead of half
    pub float_not_half: bool,
    /// Luminance/chroma encoding (half precision only)
    pub luminance_chroma: bool,
    /// Write one flattened image instead of per-layer data
    pub layer_composite: bool,
    /// Include hidden layers in a layered export
    pub hidden_layers: bool,
}

/// How alpha is delivered to the host on import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum AlphaMode {
    /// Premultiplied color becomes layer transparency
    #[default]
    Transparency = 0,
    /// Alpha stays a separate channel
    Separate = 1,
}

impl AlphaMode {
    /// Stored DWORD value
    pub fn to_dword(self) -> u32 {
        self as u32
    }

    /// Decode a stored DWORD. Anything other than 0 or 1 is corrupt.
    pub fn from_dword(value: u32) -> Option<Self> {
        match value {
            0 => Some(AlphaMode::Transparency),
            1 => Some(AlphaMode::Separate),
            _ => None,
        }
    }
}

/// Read-side options handed to the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportOptions {
    pub alpha_mode: AlphaMode,
    /// Remove premultiplication from color (separate alpha only)
    pub unmult: bool,
    /// Skip the layer description text embedded in the header
    pub ignore_layer_text: bool,
    /// Read the file through a memory map
    pub memory_map: bool,
}

impl ImportOptions {
    /// Un-multiply only means something for separate alpha.
    pub fn normalized(mut self) -> Self {
        if self.alpha_mode == AlphaMode::Transparency {
            self.unmult = false;
        }
        self
    }
}

/// Opaque handle to the destination file as recorded by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAlias(pub String);

impl FileAlias {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Per-export state owned by the host session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSession {
    pub options: ExportOptions,
    pub alias: Option<FileAlias>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_defaults() {
        let options = ExportOptions::default();
        assert_eq!(options.compression, Compression::Piz);
        assert!(!options.float_not_half);
        assert!(!options.luminance_chroma);
        assert!(!options.layer_composite);
        assert!(!options.hidden_layers);
    }

    #[test]
    fn test_alpha_mode_dword() {
        assert_eq!(AlphaMode::from_dword(0), Some(AlphaMode::Transparency));
        assert_eq!(AlphaMode::from_dword(1), Some(AlphaMode::Separate));
        assert_eq!(AlphaMode::from_dword(7), None);
        assert_eq!(AlphaMode::Separate.to_dword(), 1);
    }

    #[test]
    fn test_normalized_clears_unmult_for_transparency() {
        let options = ImportOptions {
            alpha_mode: AlphaMode::Transparency,
            unmult: true,
            ..Default::default()
        };
        assert!(!options.normalized().unmult);

        let options = ImportOptions {
            alpha_mode: AlphaMode::Separate,
            unmult: true,
            ..Default::default()
        };
        assert!(options.normalized().unmult);
    }
}
