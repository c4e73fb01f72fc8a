//! Export options <-> automation records

use super::error::HostError;
use super::host::ScriptingSuite;
use super::keys::{
    EXPORT_KEYS, KEY_COMPOSITE, KEY_COMPRESSION, KEY_FLOAT, KEY_HIDDEN_LAYERS, KEY_IN,
    KEY_LUMINANCE_CHROMA,
};
use crate::compression::{code_for_compression, compression_from_code, TYPE_COMPRESSION};
use crate::options::ExportSession;

/// Apply a played-back record to `session`.
///
/// Returns whether the options dialog should still be shown. Keys may
/// arrive in any order and unknown keys are skipped. A missing-parameter
/// report from the host is treated as "key absent"; any other host error is
/// returned unchanged, with fields read before the failure left applied.
pub fn read_script_params<S: ScriptingSuite + ?Sized>(
    suite: &mut S,
    session: &mut ExportSession,
) -> Result<bool, HostError> {
    if !suite.descriptor_available() {
        return Ok(true);
    }

    if let Some(mut reader) = suite.open_reader(&EXPORT_KEYS) {
        let mut sticky: Option<HostError> = None;

        while let Some((key, _type_id)) = reader.next_key() {
            let result = match key {
                KEY_IN => reader.get_alias().map(|alias| session.alias = Some(alias)),
                KEY_COMPRESSION => reader
                    .get_enum()
                    .map(|code| session.options.compression = compression_from_code(code)),
                KEY_FLOAT => reader
                    .get_bool()
                    .map(|b| session.options.float_not_half = b),
                KEY_LUMINANCE_CHROMA => reader
                    .get_bool()
                    .map(|b| session.options.luminance_chroma = b),
                KEY_COMPOSITE => reader
                    .get_bool()
                    .map(|b| session.options.layer_composite = b),
                KEY_HIDDEN_LAYERS => reader
                    .get_bool()
                    .map(|b| session.options.hidden_layers = b),
                other => {
                    tracing::debug!("Ignoring unknown script key {}", other);
                    Ok(())
                }
            };

            if let Err(err) = result {
                sticky.get_or_insert(err);
            }
        }

        let closed = reader.close();
        match sticky.map_or(closed, Err) {
            Err(err) if err.is_missing_parameter() => {
                tracing::debug!("Script record is missing parameters, using defaults");
            }
            Err(err) => return Err(err),
            Ok(()) => {}
        }
    }

    Ok(suite.play_dialog())
}

/// Record the final options so the action can be replayed.
///
/// Fields are written in a fixed order, the alias first when present. The
/// writer's close result is returned as the host reported it.
pub fn write_script_params<S: ScriptingSuite + ?Sized>(
    suite: &mut S,
    session: &ExportSession,
) -> Result<(), HostError> {
    if !suite.descriptor_available() {
        return Ok(());
    }

    let Some(mut writer) = suite.open_writer() else {
        return Ok(());
    };

    let options = &session.options;
    if let Some(alias) = &session.alias {
        writer.put_alias(KEY_IN, alias);
    }
    writer.put_enum(
        KEY_COMPRESSION,
        TYPE_COMPRESSION,
        code_for_compression(options.compression),
    );
    writer.put_bool(KEY_FLOAT, options.float_not_half);
    writer.put_bool(KEY_LUMINANCE_CHROMA, options.luminance_chroma);
    writer.put_bool(KEY_COMPOSITE, options.layer_composite);
    writer.put_bool(KEY_HIDDEN_LAYERS, options.hidden_layers);

    writer.close()
}
