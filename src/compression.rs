//! EXR compression methods and their host codes
//!
//! The dialog indexes compression by a dense ordinal (0..=9, list order),
//! while automation records carry a four-character code. Both directions
//! go through one static table indexed by ordinal.

use crate::fourcc::FourCc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Compression {
    None = 0,
    /// Run length encoding
    Rle = 1,
    /// zlib, one scan line at a time
    Zips = 2,
    /// zlib, blocks of 16 scan lines
    Zip = 3,
    /// Wavelet
    #[default]
    Piz = 4,
    /// Lossy 24-bit float
    Pxr24 = 5,
    /// Lossy 16-bit float
    B44 = 6,
    /// B44 with flat-region squeeze
    B44a = 7,
    /// DCT, 32 scan lines
    Dwaa = 8,
    /// DCT, 256 scan lines
    Dwab = 9,
}

/// Enum type id under which compression values are recorded
pub const TYPE_COMPRESSION: FourCc = FourCc::new(b"eXct");

/// One row of the key table
#[derive(Debug, Clone, Copy)]
pub struct CompressionEntry {
    pub compression: Compression,
    pub code: FourCc,
    pub label: &'static str,
}

/// Indexed by ordinal
pub static COMPRESSION_TABLE: [CompressionEntry; 10] = [
    CompressionEntry {
        compression: Compression::None,
        code: FourCc::new(b"eXc0"),
        label: "None",
    },
    CompressionEntry {
        compression: Compression::Rle,
        code: FourCc::new(b"eXc1"),
        label: "RLE",
    },
    CompressionEntry {
        compression: Compression::Zips,
        code: FourCc::new(b"eXc2"),
        label: "Zip",
    },
    CompressionEntry {
        compression: Compression::Zip,
        code: FourCc::new(b"eXc3"),
        label: "Zip16",
    },
    CompressionEntry {
        compression: Compression::Piz,
        code: FourCc::new(b"eXc4"),
        label: "Piz",
    },
    CompressionEntry {
        compression: Compression::Pxr24,
        code: FourCc::new(b"eXc5"),
        label: "PXR24",
    },
    CompressionEntry {
        compression: Compression::B44,
        code: FourCc::new(b"eXc6"),
        label: "B44",
    },
    CompressionEntry {
        compression: Compression::B44a,
        code: FourCc::new(b"eXc7"),
        label: "B44A",
    },
    CompressionEntry {
        compression: Compression::Dwaa,
        code: FourCc::new(b"eXc8"),
        label: "DWAA",
    },
    CompressionEntry {
        compression: Compression::Dwab,
        code: FourCc::new(b"eXc9"),
        label: "DWAB",
    },
];

impl Compression {
    /// All methods in dialog list order
    pub const ALL: [Compression; 10] = [
        Compression::None,
        Compression::Rle,
        Compression::Zips,
        Compression::Zip,
        Compression::Piz,
        Compression::Pxr24,
        Compression::B44,
        Compression::B44a,
        Compression::Dwaa,
        Compression::Dwab,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }

    /// Name shown in the dialog list
    pub fn label(self) -> &'static str {
        COMPRESSION_TABLE[self.ordinal() as usize].label
    }
}

/// External code to compression. Unrecognized codes fall back to Piz.
pub fn compression_from_code(code: FourCc) -> Compression {
    match COMPRESSION_TABLE.iter().find(|entry| entry.code == code) {
        Some(entry) => entry.compression,
        None => {
            tracing::debug!("Unknown compression code {}, using Piz", code);
            Compression::Piz
        }
    }
}

pub fn code_for_compression(compression: Compression) -> FourCc {
    COMPRESSION_TABLE[compression.ordinal() as usize].code
}

/// Out-of-table ordinals map to the null code.
pub fn code_for_ordinal(ordinal: u8) -> FourCc {
    COMPRESSION_TABLE
        .get(ordinal as usize)
        .map(|entry| entry.code)
        .unwrap_or(FourCc::NULL)
}
