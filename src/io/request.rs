//! Request and preset documents.
//!
//! Two shapes are accepted:
//! - a flat mapping `{ "fingerboard_radius": 41, ... }`
//! - a preset document `{ "parameters": { ... }, ... }`, as written by
//!   `neckgen defaults`
//!
//! Anything else is an `InputFormatError`; field-level problems are left to
//! the validator.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::Value;

use crate::domain::RawParams;
use crate::error::{AppError, EXIT_INPUT, InputFormatError};

/// JSON type name used in "must be an object" errors.
pub fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Extract the parameter mapping from either accepted document shape.
pub fn parameters_from_document(doc: Value) -> Result<RawParams, InputFormatError> {
    let mut map = match doc {
        Value::Object(map) => map,
        other => return Err(InputFormatError::NotAnObject(json_kind(&other))),
    };

    match map.remove("parameters") {
        Some(Value::Object(params)) => Ok(params),
        Some(other) => Err(InputFormatError::NotAnObject(json_kind(&other))),
        None => Ok(map),
    }
}

/// Read a request/preset file from disk.
pub fn read_request(path: &Path) -> Result<RawParams, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            EXIT_INPUT,
            format!("Failed to open parameter file '{}': {e}", path.display()),
        )
    })?;
    let doc: Value = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::from(InputFormatError::Json(e)))?;
    Ok(parameters_from_document(doc)?)
}

/// Apply `key=value` overrides on top of a request.
///
/// Values that parse as JSON (`41`, `true`, `"x"`) keep their JSON type;
/// anything else is taken as a plain string and left to the validator's
/// coercion.
pub fn apply_overrides(raw: &mut RawParams, overrides: &[String]) -> Result<(), AppError> {
    for item in overrides {
        let Some((key, value)) = item.split_once('=') else {
            return Err(AppError::new(
                EXIT_INPUT,
                format!("Invalid override '{item}': expected key=value"),
            ));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(AppError::new(
                EXIT_INPUT,
                format!("Invalid override '{item}': empty key"),
            ));
        }
        let value = value.trim();
        let parsed = serde_json::from_str::<Value>(value)
            .unwrap_or_else(|_| Value::String(value.to_string()));
        raw.insert(key.to_string(), parsed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_mapping_is_taken_as_is() {
        let raw = parameters_from_document(json!({"fingerboard_radius": 41})).unwrap();
        assert_eq!(raw["fingerboard_radius"], 41);
    }

    #[test]
    fn preset_document_is_unwrapped() {
        let doc = json!({
            "name": "Baroque violin",
            "parameters": {"fingerboard_radius": 42, "num_frets": 0}
        });
        let raw = parameters_from_document(doc).unwrap();
        assert_eq!(raw.len(), 2);
        assert!(!raw.contains_key("name"));
    }

    #[test]
    fn non_objects_are_refused() {
        let err = parameters_from_document(json!([1, 2])).unwrap_err();
        assert_eq!(err.to_string(), "Parameters must be a JSON object, got array");

        let err = parameters_from_document(json!({"parameters": 3})).unwrap_err();
        assert!(matches!(err, InputFormatError::NotAnObject("number")));
    }

    #[test]
    fn overrides_keep_json_types() {
        let mut raw = RawParams::new();
        let overrides = vec![
            "num_frets=7".to_string(),
            "show_measurements=false".to_string(),
            "instrument_family = viol".to_string(),
            "instrument_name=\"Bass viol\"".to_string(),
        ];
        apply_overrides(&mut raw, &overrides).unwrap();
        assert_eq!(raw["num_frets"], 7);
        assert_eq!(raw["show_measurements"], false);
        assert_eq!(raw["instrument_family"], "viol");
        assert_eq!(raw["instrument_name"], "Bass viol");
    }

    #[test]
    fn malformed_override_is_an_input_error() {
        let mut raw = RawParams::new();
        let err = apply_overrides(&mut raw, &["radius".to_string()]).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INPUT);
        assert!(apply_overrides(&mut raw, &["=3".to_string()]).is_err());
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let err = read_request(Path::new("/nonexistent/neck.json")).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INPUT);
    }

    #[test]
    fn preset_file_round_trips_through_disk() {
        let dir = std::env::temp_dir().join(format!("neckgen-request-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("preset.json");
        std::fs::write(&path, r#"{"parameters": {"fingerboard_radius": "41"}}"#).unwrap();

        let raw = read_request(&path).unwrap();
        assert_eq!(raw["fingerboard_radius"], "41");

        std::fs::write(&path, "{ not json").unwrap();
        let err = read_request(&path).unwrap_err();
        assert!(err.to_string().starts_with("Invalid parameter JSON:"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
