//! Export options dialog

use super::{DialogError, DialogHost, DialogOutcome, Toggle};
use crate::compression::Compression;
use crate::options::ExportOptions;

/// Displayed state of the export dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDialogSession {
    compression: Compression,
    luminance_chroma: Toggle,
    float_not_half: Toggle,
    composite: Toggle,
    hidden_layers: Toggle,
    multi_layer: bool,
}

impl ExportDialogSession {
    /// Populate controls from `options` and apply the context policy.
    ///
    /// Layered documents export per-layer data, so luminance/chroma is
    /// unavailable and the composite switch is offered. Single-layer
    /// documents have nothing to composite, and float precision follows the
    /// luminance/chroma switch because that encoding is half-only.
    pub fn new(options: &ExportOptions, layer_count: usize, has_hidden_layers: bool) -> Self {
        let multi_layer = layer_count > 1;

        let mut session = Self {
            compression: options.compression,
            luminance_chroma: Toggle::new(options.luminance_chroma, !multi_layer),
            float_not_half: Toggle::new(options.float_not_half, true),
            composite: Toggle::new(options.layer_composite, multi_layer),
            hidden_layers: Toggle::new(options.hidden_layers, has_hidden_layers),
            multi_layer,
        };
        session.track_luminance_chroma();
        session
    }

    /// Compression list contents, in display order
    pub fn compression_items() -> impl Iterator<Item = (usize, &'static str)> {
        Compression::ALL
            .iter()
            .enumerate()
            .map(|(index, c)| (index, c.label()))
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// List index of the current selection
    pub fn compression_index(&self) -> usize {
        self.compression.ordinal() as usize
    }

    pub fn luminance_chroma(&self) -> Toggle {
        self.luminance_chroma
    }

    pub fn float_not_half(&self) -> Toggle {
        self.float_not_half
    }

    pub fn composite(&self) -> Toggle {
        self.composite
    }

    pub fn hidden_layers(&self) -> Toggle {
        self.hidden_layers
    }

    pub fn select_compression(&mut self, compression: Compression) {
        self.compression = compression;
    }

    /// Select by list index; out-of-range indices are ignored
    pub fn select_compression_index(&mut self, index: usize) {
        if let Some(compression) = Compression::ALL.get(index) {
            self.compression = *compression;
        }
    }

    pub fn set_luminance_chroma(&mut self, checked: bool) {
        self.luminance_chroma.click(checked);
        self.track_luminance_chroma();
    }

    pub fn set_float(&mut self, checked: bool) {
        self.float_not_half.click(checked);
    }

    pub fn set_composite(&mut self, checked: bool) {
        self.composite.click(checked);
    }

    pub fn set_hidden_layers(&mut self, checked: bool) {
        self.hidden_layers.click(checked);
    }

    fn track_luminance_chroma(&mut self) {
        if !self.multi_layer {
            self.float_not_half.enabled = !self.luminance_chroma.checked;
        }
    }

    /// Read every control back at once
    ///
    /// Luminance/chroma and float are never both set: a layered document
    /// drops luminance/chroma, and float reads as half while luminance/chroma
    /// disables it.
    pub fn to_options(&self) -> ExportOptions {
        ExportOptions {
            compression: self.compression,
            float_not_half: self.float_not_half.checked && self.float_not_half.enabled,
            luminance_chroma: self.luminance_chroma.checked && !self.multi_layer,
            layer_composite: self.composite.checked,
            hidden_layers: self.hidden_layers.checked,
        }
    }
}

/// Show the export dialog for a document with `layer_count` layers.
///
/// Returns `Ok(true)` with `options` replaced when the user confirms and
/// `Ok(false)` with `options` untouched on cancel. If the dialog cannot be
/// shown nothing is mutated.
pub fn show_export_dialog<H: DialogHost + ?Sized>(
    host: &mut H,
    options: &mut ExportOptions,
    layer_count: usize,
    has_hidden_layers: bool,
) -> Result<bool, DialogError> {
    let mut session = ExportDialogSession::new(options, layer_count, has_hidden_layers);

    match host.run_export(&mut session)? {
        DialogOutcome::Confirmed => {
            *options = session.to_options();
            tracing::debug!("Export options confirmed: {:?}", options);
            Ok(true)
        }
        DialogOutcome::Cancelled => Ok(false),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::dialog::{ExportAction, ScriptedDialogs};

    #[test]
    fn test_single_layer_policy() {
        let session = ExportDialogSession::new(&ExportOptions::default(), 1, false);
        assert!(session.luminance_chroma().enabled);
        assert!(!session.composite().enabled);
        assert!(session.float_not_half().enabled);
        assert!(!session.hidden_layers().enabled);
    }

    #[test]
    fn test_multi_layer_policy() {
        let options = ExportOptions {
            luminance_chroma: true,
            ..Default::default()
        };
        let session = ExportDialogSession::new(&options, 3, true);
        assert!(!session.luminance_chroma().enabled);
        assert!(session.composite().enabled);
        // float is not tied to luminance/chroma when layered
        assert!(session.float_not_half().enabled);
        assert!(session.hidden_layers().enabled);
    }

    #[test]
    fn test_luminance_chroma_disables_float() {
        let options = ExportOptions {
            float_not_half: true,
            ..Default::default()
        };
        let mut session = ExportDialogSession::new(&options, 1, false);
        assert!(session.float_not_half().enabled);

        session.set_luminance_chroma(true);
        assert!(!session.float_not_half().enabled);
        assert!(!session.to_options().float_not_half);

        session.set_luminance_chroma(false);
        assert!(session.float_not_half().enabled);
        assert!(session.to_options().float_not_half);
    }

    #[test]
    fn test_compression_list_preselects_current() {
        let options = ExportOptions {
            compression: Compression::Pxr24,
            ..Default::default()
        };
        let mut session = ExportDialogSession::new(&options, 1, false);
        assert_eq!(session.compression_index(), 5);
        assert_eq!(ExportDialogSession::compression_items().count(), 10);

        session.select_compression_index(42);
        assert_eq!(session.compression(), Compression::Pxr24);
        session.select_compression_index(8);
        assert_eq!(session.compression(), Compression::Dwaa);
    }

    #[test]
    fn test_single_layer_lumichrom_forces_float_off() {
        let mut host = ScriptedDialogs::new().with_export(
            vec![
                ExportAction::Float(true),
                ExportAction::LuminanceChroma(true),
            ],
            DialogOutcome::Confirmed,
        );
        let mut options = ExportOptions::default();

        let accepted = show_export_dialog(&mut host, &mut options, 1, false).unwrap();

        assert!(accepted);
        assert!(options.luminance_chroma);
        assert!(!options.float_not_half);
    }

    #[test]
    fn test_multi_layer_composite_is_user_set() {
        let mut host = ScriptedDialogs::new().with_export(
            vec![
                ExportAction::Composite(true),
                ExportAction::LuminanceChroma(true),
                ExportAction::SelectCompression(Compression::Zip),
            ],
            DialogOutcome::Confirmed,
        );
        let mut options = ExportOptions::default();

        assert!(show_export_dialog(&mut host, &mut options, 4, false).unwrap());
        assert!(options.layer_composite);
        assert!(!options.luminance_chroma);
        assert_eq!(options.compression, Compression::Zip);
    }

    #[test]
    fn test_multi_layer_drops_stale_luminance_chroma() {
        let options = ExportOptions {
            luminance_chroma: true,
            ..Default::default()
        };
        let mut host = ScriptedDialogs::new()
            .with_export(vec![ExportAction::Float(true)], DialogOutcome::Confirmed);
        let mut options_out = options;

        assert!(show_export_dialog(&mut host, &mut options_out, 3, false).unwrap());
        assert!(options_out.float_not_half);
        assert!(!options_out.luminance_chroma);

        // the session still shows the prior state on the disabled control
        let session = ExportDialogSession::new(&options, 3, false);
        assert!(session.luminance_chroma().checked);
        assert!(!session.to_options().luminance_chroma);
    }

    #[test]
    fn test_hidden_layers_only_when_present() {
        let script = vec![ExportAction::HiddenLayers(true)];

        let mut host = ScriptedDialogs::new().with_export(script.clone(), DialogOutcome::Confirmed);
        let mut options = ExportOptions::default();
        show_export_dialog(&mut host, &mut options, 2, false).unwrap();
        assert!(!options.hidden_layers);

        let mut host = ScriptedDialogs::new().with_export(script, DialogOutcome::Confirmed);
        let mut options = ExportOptions::default();
        show_export_dialog(&mut host, &mut options, 2, true).unwrap();
        assert!(options.hidden_layers);
    }

    #[test]
    fn test_cancel_leaves_options_untouched() {
        let mut host = ScriptedDialogs::new().with_export(
            vec![ExportAction::SelectCompression(Compression::None)],
            DialogOutcome::Cancelled,
        );
        let mut options = ExportOptions::default();

        assert!(!show_export_dialog(&mut host, &mut options, 1, false).unwrap());
        assert_eq!(options, ExportOptions::default());
    }

    #[test]
    fn test_unavailable_dialog_does_not_mutate() {
        let mut host = ScriptedDialogs::new();
        let mut options = ExportOptions {
            compression: Compression::B44,
            ..Default::default()
        };

        let result = show_export_dialog(&mut host, &mut options, 1, false);
        assert!(matches!(result, Err(DialogError::Unavailable(_))));
        assert_eq!(options.compression, Compression::B44);
    }
}
