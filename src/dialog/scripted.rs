//! Dialog host that replays recorded user actions
//!
//! Lets hosts without a window system (render farms, batch conversion)
//! and tests drive the same session logic as the native dialogs.

use super::{
    DialogError, DialogHost, DialogOutcome, ExportDialogSession, ImportDialogSession,
};
use crate::compression::Compression;
use crate::options::AlphaMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportAction {
    SelectCompression(Compression),
    LuminanceChroma(bool),
    Float(bool),
    Composite(bool),
    HiddenLayers(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportAction {
    Alpha(AlphaMode),
    UnMult(bool),
    IgnoreLayerText(bool),
    MemoryMap(bool),
    AlwaysDialog(bool),
    /// The "set current as defaults" button
    SetDefaults,
}

/// A dialog kind with no script configured is reported as unavailable.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDialogs {
    export: Option<(Vec<ExportAction>, DialogOutcome)>,
    import: Option<(Vec<ImportAction>, DialogOutcome)>,
    export_runs: usize,
    import_runs: usize,
}

impl ScriptedDialogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_export(mut self, actions: Vec<ExportAction>, outcome: DialogOutcome) -> Self {
        self.export = Some((actions, outcome));
        self
    }

    pub fn with_import(mut self, actions: Vec<ImportAction>, outcome: DialogOutcome) -> Self {
        self.import = Some((actions, outcome));
        self
    }

    pub fn export_runs(&self) -> usize {
        self.export_runs
    }

    pub fn import_runs(&self) -> usize {
        self.import_runs
    }
}

impl DialogHost for ScriptedDialogs {
    fn run_export(
        &mut self,
        session: &mut ExportDialogSession,
    ) -> Result<DialogOutcome, DialogError> {
        let (actions, outcome) = self
            .export
            .as_ref()
            .ok_or_else(|| DialogError::Unavailable("no export script".into()))?;
        self.export_runs += 1;

        for action in actions {
            match *action {
                ExportAction::SelectCompression(c) => session.select_compression(c),
                ExportAction::LuminanceChroma(b) => session.set_luminance_chroma(b),
                ExportAction::Float(b) => session.set_float(b),
                ExportAction::Composite(b) => session.set_composite(b),
                ExportAction::HiddenLayers(b) => session.set_hidden_layers(b),
            }
        }
        Ok(*outcome)
    }

    fn run_import(
        &mut self,
        session: &mut ImportDialogSession<'_>,
    ) -> Result<DialogOutcome, DialogError> {
        let (actions, outcome) = self
            .import
            .as_ref()
            .ok_or_else(|| DialogError::Unavailable("no import script".into()))?;
        self.import_runs += 1;

        for action in actions {
            match *action {
                ImportAction::Alpha(mode) => session.select_alpha_mode(mode),
                ImportAction::UnMult(b) => session.set_unmult(b),
                ImportAction::IgnoreLayerText(b) => session.set_ignore_layer_text(b),
                ImportAction::MemoryMap(b) => session.set_memory_map(b),
                ImportAction::AlwaysDialog(b) => session.set_always_dialog(b),
                ImportAction::SetDefaults => {
                    // Failure is already logged by the session.
                    let _ = session.set_current_as_defaults();
                }
            }
        }
        Ok(*outcome)
    }
}
