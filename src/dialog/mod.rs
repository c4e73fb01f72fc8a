//! Export and import option dialogs
//!
//! Each dialog is driven through an explicit session object that holds the
//! displayed control state. The session is created from the current
//! options, handed by `&mut` to a [`DialogHost`] for the modal run, and read
//! back afterwards. The native backend and the scripted backend both only
//! translate user actions into session calls, so the enable/disable policy
//! lives in one place.

mod export;
mod import;
pub mod layout;
mod scripted;
#[cfg(target_os = "windows")]
pub mod win32;

pub use export::{show_export_dialog, ExportDialogSession};
pub use import::{
    load_defaults, resolve_import_options, ImportContext, ImportDialogSession, ImportResolution,
};
pub use scripted::{ExportAction, ImportAction, ScriptedDialogs};
#[cfg(target_os = "windows")]
pub use win32::Win32Dialogs;

use thiserror::Error;

/// State of one check box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Toggle {
    pub checked: bool,
    pub enabled: bool,
}

impl Toggle {
    pub fn new(checked: bool, enabled: bool) -> Self {
        Self { checked, enabled }
    }

    /// User click; a disabled control does not change
    pub fn click(&mut self, checked: bool) {
        if self.enabled {
            self.checked = checked;
        }
    }
}

/// How a modal run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    Confirmed,
    Cancelled,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DialogError {
    #[error("Dialog unavailable: {0}")]
    Unavailable(String),
}

/// Runs the modal dialogs
pub trait DialogHost {
    fn run_export(&mut self, session: &mut ExportDialogSession)
        -> Result<DialogOutcome, DialogError>;

    fn run_import(
        &mut self,
        session: &mut ImportDialogSession<'_>,
    ) -> Result<DialogOutcome, DialogError>;
}

impl<H: DialogHost + ?Sized> DialogHost for &mut H {
    fn run_export(
        &mut self,
        session: &mut ExportDialogSession,
    ) -> Result<DialogOutcome, DialogError> {
        (**self).run_export(session)
    }

    fn run_import(
        &mut self,
        session: &mut ImportDialogSession<'_>,
    ) -> Result<DialogOutcome, DialogError> {
        (**self).run_import(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_toggle_ignores_clicks() {
        let mut toggle = Toggle::new(true, false);
        toggle.click(false);
        assert!(toggle.checked);

        let mut toggle = Toggle::new(false, true);
        toggle.click(true);
        assert!(toggle.checked);
    }
}
