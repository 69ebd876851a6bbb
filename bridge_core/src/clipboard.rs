//! # Clipboard Import and Export
//!
//! Parameters travel through the clipboard as a pretty-printed JSON object
//! keyed by parameter name. Export goes out as an [`Effect::WriteClipboard`];
//! the shell reports back with [`clipboard_write_finished`]. Import parses the
//! whole text before touching any field, so malformed input changes nothing.
//!
//! These helpers do not consult or change the controller's in-flight flags.
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::clipboard::load_parameters_from_clipboard;
//! use bridge_core::controller::FormController;
//! use bridge_core::settings::FormSettings;
//!
//! let mut controller = FormController::with_bridge_parameters(FormSettings::default());
//! load_parameters_from_clipboard(&mut controller, Ok(r#"{"LBRIDGE": "30"}"#.to_string()));
//! assert_eq!(controller.form().field("LBRIDGE").unwrap().value, "30");
//! ```

use serde_json::Value;

use crate::controller::{Effect, Effects, FormController};
use crate::errors::{BridgeError, BridgeResult};
use crate::form::ToastKind;
use crate::parameters::format_number;

pub const COPIED: &str = "Parameters copied to clipboard";
pub const COPY_FAILED: &str = "Could not copy parameters";
pub const LOADED: &str = "Parameters loaded from clipboard";
pub const INVALID_FORMAT: &str = "Invalid parameter format in clipboard";
pub const READ_FAILED: &str = "Could not read from clipboard";

/// Parse clipboard text into `(key, value)` pairs.
///
/// Accepts a JSON object whose values are strings, numbers, booleans or
/// null (read as an empty value). Anything else is a
/// [`BridgeError::ClipboardFormat`].
pub fn parse_clipboard_parameters(text: &str) -> BridgeResult<Vec<(String, String)>> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| BridgeError::clipboard_format(format!("Not valid JSON: {}", e)))?;

    let Value::Object(map) = value else {
        return Err(BridgeError::clipboard_format("Expected a JSON object of parameters"));
    };

    map.into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => match n.as_f64() {
                    Some(f) if n.is_f64() => format_number(f),
                    _ => n.to_string(),
                },
                Value::Bool(b) => b.to_string(),
                Value::Null => String::new(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(BridgeError::clipboard_format(format!("Value for {} is not a scalar", key)));
                }
            };
            Ok((key, text))
        })
        .collect()
}

/// Export the current parameter set as pretty-printed JSON
pub fn copy_parameters_to_clipboard(controller: &mut FormController) -> Effects {
    let json = controller.collect_form_data().to_pretty_json();
    vec![Effect::WriteClipboard(json)]
}

/// Report the result of a clipboard write
pub fn clipboard_write_finished(controller: &mut FormController, result: BridgeResult<()>) -> Effects {
    match result {
        Ok(()) => controller.show_toast(COPIED, ToastKind::Success),
        Err(e) => {
            tracing::warn!(error = %e, "clipboard write failed");
            controller.show_toast(COPY_FAILED, ToastKind::Error)
        }
    }
}

/// Write parsed pairs into matching fields, ignoring unknown keys.
///
/// Returns how many fields were updated.
pub fn apply_parameter_values(controller: &mut FormController, entries: Vec<(String, String)>) -> usize {
    let mut applied = 0;
    for (key, value) in entries {
        if controller.set_field_value(&key, value) {
            applied += 1;
        } else {
            tracing::debug!(key = %key, "ignoring unknown clipboard key");
        }
    }
    applied
}

/// Import parameters from clipboard text, or report why it could not be read
pub fn load_parameters_from_clipboard(controller: &mut FormController, text: BridgeResult<String>) -> Effects {
    let text = match text {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "clipboard read failed");
            return controller.show_toast(READ_FAILED, ToastKind::Error);
        }
    };

    match parse_clipboard_parameters(&text) {
        Ok(entries) => {
            let applied = apply_parameter_values(controller, entries);
            tracing::info!(applied, "parameters loaded from clipboard");
            controller.show_toast(LOADED, ToastKind::Success)
        }
        Err(e) => {
            tracing::warn!(error = %e, "clipboard format error");
            controller.show_toast(INVALID_FORMAT, ToastKind::Error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::FormSettings;

    fn controller() -> FormController {
        FormController::with_bridge_parameters(FormSettings::default())
    }

    fn values(c: &FormController) -> Vec<(String, String)> {
        c.form().fields.iter().map(|f| (f.key.clone(), f.value.clone())).collect()
    }

    #[test]
    fn test_import_sets_only_matching_field() {
        let mut c = controller();
        let mut expected = values(&c);
        for (key, value) in expected.iter_mut() {
            if key == "LBRIDGE" {
                *value = "30".to_string();
            }
        }

        load_parameters_from_clipboard(&mut c, Ok(r#"{"LBRIDGE": "30", "UNKNOWN": "1"}"#.to_string()));

        assert_eq!(values(&c), expected);
        assert_eq!(c.form().toasts[0].message, LOADED);
    }

    #[test]
    fn test_import_malformed_changes_nothing() {
        let mut c = controller();
        let before = values(&c);

        load_parameters_from_clipboard(&mut c, Ok("not-json".to_string()));

        assert_eq!(values(&c), before);
        assert_eq!(c.form().toasts[0].message, INVALID_FORMAT);
        assert_eq!(c.form().toasts[0].kind, ToastKind::Error);
    }

    #[test]
    fn test_import_is_all_or_nothing() {
        let mut c = controller();
        let before = values(&c);
        load_parameters_from_clipboard(&mut c, Ok(r#"{"LBRIDGE": "30", "NSPAN": [1, 2]}"#.to_string()));
        assert_eq!(values(&c), before);
    }

    #[test]
    fn test_import_unreadable_clipboard() {
        let mut c = controller();
        load_parameters_from_clipboard(&mut c, Err(BridgeError::clipboard_unavailable("read", "no display")));
        assert_eq!(c.form().toasts[0].message, READ_FAILED);
    }

    #[test]
    fn test_parse_scalar_values() {
        let entries = parse_clipboard_parameters(r#"{"NSPAN": 3, "SKEW": 12.5, "LBRIDGE": 30000.0, "F": true, "N": null}"#)
            .unwrap();
        let lookup = |k: &str| entries.iter().find(|(key, _)| key == k).map(|(_, v)| v.as_str());
        assert_eq!(lookup("NSPAN"), Some("3"));
        assert_eq!(lookup("SKEW"), Some("12.5"));
        assert_eq!(lookup("LBRIDGE"), Some("30000"));
        assert_eq!(lookup("F"), Some("true"));
        assert_eq!(lookup("N"), Some(""));
    }

    #[test]
    fn test_parse_rejects_non_object() {
        let err = parse_clipboard_parameters("[1, 2]").unwrap_err();
        assert_eq!(err.error_code(), "CLIPBOARD_FORMAT");
    }

    #[test]
    fn test_copy_round_trips_through_import() {
        let mut c = controller();
        c.set_field_value("TOPRL", "99000");
        let effects = copy_parameters_to_clipboard(&mut c);
        let [Effect::WriteClipboard(json)] = effects.as_slice() else {
            panic!("expected clipboard write");
        };
        assert!(json.contains("\"TOPRL\": \"99000\""));

        let mut other = controller();
        load_parameters_from_clipboard(&mut other, Ok(json.clone()));
        assert_eq!(other.form().field("TOPRL").unwrap().value, "99000");
    }

    #[test]
    fn test_write_finished_toasts() {
        let mut c = controller();
        clipboard_write_finished(&mut c, Ok(()));
        clipboard_write_finished(&mut c, Err(BridgeError::clipboard_unavailable("write", "denied")));
        let messages: Vec<_> = c.form().toasts.iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, vec![COPIED, COPY_FAILED]);
    }
}
