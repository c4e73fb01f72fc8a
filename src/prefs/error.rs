//! Preference store error types

use std::io;
use thiserror::Error;

/// Errors that can occur while persisting preferences
#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Registry error: {0}")]
    Registry(u32),

    #[error("No per-user configuration directory")]
    NoConfigDir,
}
