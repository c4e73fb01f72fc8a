//! Import options dialog
//!
//! Import options come from the preference store. The dialog only appears
//! when a modifier key is held or the user asked to always see it; its
//! "set defaults" button writes the displayed state straight to the store.

use super::{DialogError, DialogHost, DialogOutcome, Toggle};
use crate::input::{Feedback, ModifierKeys};
use crate::options::{AlphaMode, ImportOptions};
use crate::prefs::{PreferenceStore, PrefsError};

/// Displayed state of the import dialog
pub struct ImportDialogSession<'a> {
    alpha_mode: AlphaMode,
    unmult: Toggle,
    ignore_layer_text: Toggle,
    memory_map: Toggle,
    always_dialog: Toggle,
    store: &'a mut dyn PreferenceStore,
    feedback: &'a dyn Feedback,
}

impl<'a> ImportDialogSession<'a> {
    pub fn new(
        options: &ImportOptions,
        always_dialog: bool,
        store: &'a mut dyn PreferenceStore,
        feedback: &'a dyn Feedback,
    ) -> Self {
        Self {
            alpha_mode: options.alpha_mode,
            unmult: Toggle::new(options.unmult, options.alpha_mode == AlphaMode::Separate),
            ignore_layer_text: Toggle::new(options.ignore_layer_text, true),
            memory_map: Toggle::new(options.memory_map, true),
            always_dialog: Toggle::new(always_dialog, true),
            store,
            feedback,
        }
    }

    pub fn alpha_mode(&self) -> AlphaMode {
        self.alpha_mode
    }

    pub fn unmult(&self) -> Toggle {
        self.unmult
    }

    pub fn ignore_layer_text(&self) -> Toggle {
        self.ignore_layer_text
    }

    pub fn memory_map(&self) -> Toggle {
        self.memory_map
    }

    pub fn always_dialog(&self) -> Toggle {
        self.always_dialog
    }

    /// Radio group; un-multiply is only offered for separate alpha
    pub fn select_alpha_mode(&mut self, mode: AlphaMode) {
        self.alpha_mode = mode;
        self.unmult.enabled = mode == AlphaMode::Separate;
    }

    pub fn set_unmult(&mut self, checked: bool) {
        self.unmult.click(checked);
    }

    pub fn set_ignore_layer_text(&mut self, checked: bool) {
        self.ignore_layer_text.click(checked);
    }

    pub fn set_memory_map(&mut self, checked: bool) {
        self.memory_map.click(checked);
    }

    pub fn set_always_dialog(&mut self, checked: bool) {
        self.always_dialog.click(checked);
    }

    /// Options as currently displayed
    pub fn options(&self) -> ImportOptions {
        ImportOptions {
            alpha_mode: self.alpha_mode,
            unmult: self.unmult.checked,
            ignore_layer_text: self.ignore_layer_text.checked,
            memory_map: self.memory_map.checked,
        }
        .normalized()
    }

    /// Persist the displayed state without closing the dialog.
    ///
    /// Beeps once the store accepted the write.
    pub fn set_current_as_defaults(&mut self) -> Result<(), PrefsError> {
        let options = self.options();
        let always = self.always_dialog.checked;

        match self.store.save(Some(&options), Some(always)) {
            Ok(()) => {
                tracing::debug!("Saved import defaults: {:?}, always={}", options, always);
                self.feedback.confirm();
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to save import defaults: {}", e);
                Err(e)
            }
        }
    }
}

/// Outcome of the import options phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportResolution {
    pub options: ImportOptions,
    pub dialog_shown: bool,
    /// False only when the dialog was shown and cancelled
    pub accepted: bool,
}

/// Collaborators for one import call
pub struct ImportContext<'a> {
    pub store: &'a mut dyn PreferenceStore,
    pub modifiers: &'a dyn ModifierKeys,
    pub dialogs: &'a mut dyn DialogHost,
    pub feedback: &'a dyn Feedback,
}

/// Overlay stored preferences onto `options` and return the always-show
/// flag.
///
/// When the store has no complete record, the caller's `options` are
/// written back together with `always_dialog = false` so the next run finds
/// a full set.
pub fn load_defaults(store: &mut dyn PreferenceStore, options: &mut ImportOptions) -> bool {
    match store.load() {
        Some(prefs) => {
            *options = prefs.options;
            prefs.always_dialog
        }
        None => {
            tracing::debug!("No stored import preferences, writing defaults");
            if let Err(e) = store.save(Some(options), Some(false)) {
                tracing::warn!("Failed to store default import preferences: {}", e);
            }
            false
        }
    }
}

/// Work out the import options, showing the dialog when asked for.
pub fn resolve_import_options(
    ctx: &mut ImportContext<'_>,
    initial: ImportOptions,
) -> Result<ImportResolution, DialogError> {
    let mut defaults = initial;
    let always_dialog = load_defaults(ctx.store, &mut defaults);

    let override_held = ctx.modifiers.override_held();
    if !(override_held || always_dialog) {
        return Ok(ImportResolution {
            options: defaults,
            dialog_shown: false,
            accepted: true,
        });
    }

    tracing::debug!(
        "Showing import dialog (modifier={}, always={})",
        override_held,
        always_dialog
    );

    let mut session = ImportDialogSession::new(&defaults, always_dialog, ctx.store, ctx.feedback);
    let outcome = ctx.dialogs.run_import(&mut session)?;
    let options = session.options();
    let always = session.always_dialog().checked;

    match outcome {
        DialogOutcome::Confirmed => {
            if let Err(e) = ctx.store.save(None, Some(always)) {
                tracing::warn!("Failed to store always-show flag: {}", e);
            }
            Ok(ImportResolution {
                options,
                dialog_shown: true,
                accepted: true,
            })
        }
        DialogOutcome::Cancelled => Ok(ImportResolution {
            options: defaults,
            dialog_shown: true,
            accepted: false,
        }),
    }
}
