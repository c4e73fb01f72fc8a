//! exrport - OpenEXR export/import option negotiation for image-editor hosts
//!
//! The host drives two phases per file: [`phase::export_options_phase`]
//! settles compression and layer options from automation records and the
//! export dialog, [`phase::import_options_phase`] settles alpha handling
//! from stored preferences and the import dialog.

pub mod compression;
pub mod config;
pub mod dialog;
pub mod fourcc;
pub mod input;
pub mod options;
pub mod phase;
pub mod prefs;
pub mod scripting;

use config::PluginConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "exrport=info";

/// Initialize logging with the default filter
pub fn init() {
    init_with(&PluginConfig::default());
}

/// Initialize logging, preferring `RUST_LOG` over the configured filter.
///
/// Hosts may load the plug-in more than once per process, so an already
/// installed subscriber is left in place.
pub fn init_with(config: &PluginConfig) {
    let fallback = config
        .log_filter
        .clone()
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_ok() {
        tracing::info!("exrport initializing...");
    }
}
