//! Options phases of an export or import call
//!
//! The host calls these once per file, before any pixel data moves.

use crate::dialog::{
    resolve_import_options, show_export_dialog, DialogError, DialogHost, ImportContext,
    ImportResolution,
};
use crate::options::{ExportSession, ImportOptions};
use crate::scripting::{read_script_params, write_script_params, HostError, ScriptingSuite};

/// What the host is exporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentInfo {
    pub layer_count: usize,
    pub has_hidden_layers: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    /// Options are final, continue with the write
    Proceed,
    /// The user backed out
    Cancelled,
}

/// Settle export options from the automation record and, when wanted, the
/// dialog, then record the result for replay.
pub fn export_options_phase<S, H>(
    suite: &mut S,
    dialogs: &mut H,
    session: &mut ExportSession,
    document: &DocumentInfo,
) -> Result<PhaseOutcome, HostError>
where
    S: ScriptingSuite + ?Sized,
    H: DialogHost + ?Sized,
{
    let show_dialog = read_script_params(suite, session)?;

    if show_dialog {
        match show_export_dialog(
            dialogs,
            &mut session.options,
            document.layer_count,
            document.has_hidden_layers,
        ) {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!("Export cancelled from options dialog");
                return Ok(PhaseOutcome::Cancelled);
            }
            Err(e) => {
                tracing::warn!("Export options dialog unavailable: {}", e);
                return Ok(PhaseOutcome::Cancelled);
            }
        }
    }

    write_script_params(suite, session)?;

    tracing::info!(
        "Export options: {:?} ({} layers)",
        session.options,
        document.layer_count
    );
    Ok(PhaseOutcome::Proceed)
}

/// Settle import options from stored defaults and, when asked for, the
/// dialog.
pub fn import_options_phase(
    ctx: &mut ImportContext<'_>,
    initial: ImportOptions,
) -> Result<ImportResolution, DialogError> {
    let resolution = resolve_import_options(ctx, initial).map_err(|e| {
        tracing::warn!("Import options dialog unavailable: {}", e);
        e
    })?;

    if resolution.accepted {
        tracing::info!(
            "Import options: {:?} (dialog shown: {})",
            resolution.options,
            resolution.dialog_shown
        );
    } else {
        tracing::info!("Import cancelled from options dialog");
    }
    Ok(resolution)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::compression::{code_for_compression, Compression, TYPE_COMPRESSION};
    use crate::dialog::{DialogOutcome, ExportAction, ImportAction, ScriptedDialogs};
    use crate::input::{FixedModifiers, SilentFeedback};
    use crate::options::{AlphaMode, FileAlias};
    use crate::prefs::{MemoryStore, PreferenceStore, Preferences};
    use crate::scripting::descriptor::CLASS_EXR_OPTIONS;
    use crate::scripting::keys::{KEY_COMPRESSION, KEY_FLOAT, KEY_IN};
    use crate::scripting::{ActionDescriptor, DescriptorValue, RecordSuite};

    fn single_layer() -> DocumentInfo {
        DocumentInfo {
            layer_count: 1,
            has_hidden_layers: false,
        }
    }

    #[test]
    fn test_interactive_export_records_dialog_choice() {
        let mut suite = RecordSuite::recording();
        let mut dialogs = ScriptedDialogs::new().with_export(
            vec![ExportAction::SelectCompression(Compression::Zip)],
            DialogOutcome::Confirmed,
        );
        let mut session = ExportSession::default();

        let outcome =
            export_options_phase(&mut suite, &mut dialogs, &mut session, &single_layer()).unwrap();

        assert_eq!(outcome, PhaseOutcome::Proceed);
        assert_eq!(dialogs.export_runs(), 1);
        let recorded = suite.recorded.unwrap();
        assert_eq!(
            recorded.get(KEY_COMPRESSION),
            Some(&DescriptorValue::Enum {
                type_id: TYPE_COMPRESSION,
                value: code_for_compression(Compression::Zip),
            })
        );
    }

    #[test]
    fn test_silent_playback_skips_dialog() {
        let record = ActionDescriptor::new(CLASS_EXR_OPTIONS)
            .with(KEY_IN, DescriptorValue::Alias("/tmp/out.exr".into()))
            .with(KEY_FLOAT, DescriptorValue::Boolean(true));
        let mut suite = RecordSuite::playing(record);
        suite.show_dialog = false;
        let mut dialogs = ScriptedDialogs::new();
        let mut session = ExportSession::default();

        let outcome =
            export_options_phase(&mut suite, &mut dialogs, &mut session, &single_layer()).unwrap();

        assert_eq!(outcome, PhaseOutcome::Proceed);
        assert_eq!(dialogs.export_runs(), 0);
        assert!(session.options.float_not_half);
        assert_eq!(session.alias, Some(FileAlias::new("/tmp/out.exr")));
        assert_eq!(suite.recorded.unwrap().len(), 6);
    }

    #[test]
    fn test_cancel_writes_nothing() {
        let mut suite = RecordSuite::recording();
        let mut dialogs = ScriptedDialogs::new().with_export(vec![], DialogOutcome::Cancelled);
        let mut session = ExportSession::default();

        let outcome =
            export_options_phase(&mut suite, &mut dialogs, &mut session, &single_layer()).unwrap();

        assert_eq!(outcome, PhaseOutcome::Cancelled);
        assert!(suite.recorded.is_none());
    }

    #[test]
    fn test_unavailable_dialog_cancels() {
        let mut suite = RecordSuite::default();
        let mut dialogs = ScriptedDialogs::new();
        let mut session = ExportSession::default();

        let outcome =
            export_options_phase(&mut suite, &mut dialogs, &mut session, &single_layer()).unwrap();

        assert_eq!(outcome, PhaseOutcome::Cancelled);
        assert_eq!(session, ExportSession::default());
    }

    #[test]
    fn test_host_error_aborts_before_dialog() {
        let mut suite = RecordSuite::playing(ActionDescriptor::new(CLASS_EXR_OPTIONS));
        suite.reader_error = Some(HostError::OUT_OF_MEMORY);
        let mut dialogs = ScriptedDialogs::new().with_export(vec![], DialogOutcome::Confirmed);
        let mut session = ExportSession::default();

        let result = export_options_phase(&mut suite, &mut dialogs, &mut session, &single_layer());

        assert_eq!(result, Err(HostError::OUT_OF_MEMORY));
        assert_eq!(dialogs.export_runs(), 0);
    }

    #[test]
    fn test_import_phase_with_modifier() {
        let mut store = Preferences::new(MemoryStore::default());
        let mut dialogs = ScriptedDialogs::new().with_import(
            vec![
                ImportAction::Alpha(AlphaMode::Separate),
                ImportAction::UnMult(true),
            ],
            DialogOutcome::Confirmed,
        );
        let mut ctx = ImportContext {
            store: &mut store,
            modifiers: &FixedModifiers(true),
            dialogs: &mut dialogs,
            feedback: &SilentFeedback,
        };

        let resolution = import_options_phase(&mut ctx, ImportOptions::default()).unwrap();

        assert!(resolution.dialog_shown);
        assert!(resolution.accepted);
        assert_eq!(resolution.options.alpha_mode, AlphaMode::Separate);
        assert!(resolution.options.unmult);
        // confirming stores only the always-show flag
        let stored = store.load().unwrap();
        assert_eq!(stored.options, ImportOptions::default());
    }

    #[test]
    fn test_import_phase_unavailable_dialog() {
        let mut store = Preferences::new(MemoryStore::default());
        let mut dialogs = ScriptedDialogs::new();
        let mut ctx = ImportContext {
            store: &mut store,
            modifiers: &FixedModifiers(true),
            dialogs: &mut dialogs,
            feedback: &SilentFeedback,
        };

        let result = import_options_phase(&mut ctx, ImportOptions::default());
        assert!(matches!(result, Err(DialogError::Unavailable(_))));
    }
}
