//! Automation record keys

use crate::fourcc::FourCc;

/// Standard host key for the target file
pub const KEY_IN: FourCc = FourCc::new(b"In  ");
pub const KEY_COMPRESSION: FourCc = FourCc::new(b"eXcm");
pub const KEY_FLOAT: FourCc = FourCc::new(b"eXfl");
pub const KEY_LUMINANCE_CHROMA: FourCc = FourCc::new(b"eXlc");
pub const KEY_COMPOSITE: FourCc = FourCc::new(b"eXcp");
pub const KEY_HIDDEN_LAYERS: FourCc = FourCc::new(b"eXhd");

/// Keys read on playback, in the order they are written
pub const EXPORT_KEYS: [FourCc; 6] = [
    KEY_IN,
    KEY_COMPRESSION,
    KEY_FLOAT,
    KEY_LUMINANCE_CHROMA,
    KEY_COMPOSITE,
    KEY_HIDDEN_LAYERS,
];
