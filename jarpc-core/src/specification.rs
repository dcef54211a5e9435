//! Specification document codec
//!
//! A specification document is a machine-readable description of a
//! procedure set: a JSON array with one object per procedure. It is used
//! to seed registries from a file and to publish a server's API to
//! consumers (stub generators among them).
//!
//! Each entry carries:
//!
//! - `name` (required string): the procedure name
//! - `params`: an object (by-name) or array (by-position) of *sample
//!   literal values*, each standing for the declared parameter type;
//!   `null` or absent means no parameters
//! - `returns`: a sample literal of the return type; its presence makes
//!   the procedure a method, its absence a notification
//!
//! ```json
//! [
//!   {"name": "sayHello", "params": {"name": "somestring"}, "returns": "somestring"},
//!   {"name": "add", "params": [1, 1], "returns": 1},
//!   {"name": "initCounter", "params": {"value": 1}}
//! ]
//! ```
//!
//! The codec is symmetric: reading a written document reproduces the
//! original procedures, modulo the key ordering of by-name parameter
//! objects.

use crate::error::{Error, ErrorCode, ErrorObject, Result};
use crate::procedure::{ParamStyle, Procedure};
use crate::types::JsonType;
use serde_json::{Map, Value};
use std::path::Path;

/// Parse a specification document from its JSON text.
///
/// Returns the procedures in document order. Structural violations (a
/// non-array document, a non-object entry, a missing or non-string
/// `name`, a `params` member that is neither object, array nor null, or
/// a duplicated procedure name) yield [`Error::InvalidRequest`]; JSON
/// syntax errors yield a parse-error envelope.
pub fn parse_str(text: &str) -> Result<Vec<Procedure>> {
    let document: Value = serde_json::from_str(text)
        .map_err(|_| Error::JsonRpc(ErrorObject::from_code(ErrorCode::ParseError)))?;
    let Value::Array(entries) = document else {
        return Err(Error::InvalidRequest(
            "specification document must be a JSON array".to_string(),
        ));
    };

    let mut procedures: Vec<Procedure> = Vec::with_capacity(entries.len());
    for entry in &entries {
        let procedure = parse_entry(entry)?;
        if procedures.iter().any(|p| p.name() == procedure.name()) {
            return Err(Error::InvalidRequest(format!(
                "duplicate procedure name in specification: {}",
                procedure.name()
            )));
        }
        procedures.push(procedure);
    }
    Ok(procedures)
}

/// Parse a specification document from a file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Procedure>> {
    let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        Error::InvalidRequest(format!(
            "cannot read specification file {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;
    parse_str(&text)
}

fn parse_entry(entry: &Value) -> Result<Procedure> {
    let Value::Object(fields) = entry else {
        return Err(Error::InvalidRequest(
            "specification entry must be a JSON object".to_string(),
        ));
    };
    let name = match fields.get("name") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => {
            return Err(Error::InvalidRequest(
                "specification entry is missing a string \"name\"".to_string(),
            ))
        }
    };

    let params = fields.get("params").unwrap_or(&Value::Null);
    let returns = fields.get("returns");

    let base = match (returns, params) {
        (Some(literal), Value::Array(_)) => {
            Procedure::method(name, ParamStyle::ByPosition, JsonType::of(literal))
        }
        (Some(literal), _) => Procedure::method(name, ParamStyle::ByName, JsonType::of(literal)),
        (None, Value::Array(_)) => Procedure::notification(name, ParamStyle::ByPosition),
        (None, _) => Procedure::notification(name, ParamStyle::ByName),
    };

    match params {
        Value::Null => Ok(base),
        Value::Object(named) => Ok(named
            .iter()
            .fold(base, |p, (key, literal)| p.with_param(key, JsonType::of(literal)))),
        Value::Array(positional) => Ok(positional.iter().enumerate().fold(base, |p, (i, literal)| {
            p.with_param(positional_name(i), JsonType::of(literal))
        })),
        _ => Err(Error::InvalidRequest(format!(
            "\"params\" must be an object, array or null in procedure {}",
            base.name()
        ))),
    }
}

/// Synthetic name of the i-th positional parameter (zero-based input).
fn positional_name(index: usize) -> String {
    format!("param{:02}", index + 1)
}

/// Render procedures as a specification document value.
///
/// Entries appear in iteration order. Methods carry a `returns` sample
/// literal; parameter lists become objects (by-name) or arrays
/// (by-position) of sample literals, and an empty list is written as
/// `null`.
pub fn to_value<'a>(procedures: impl IntoIterator<Item = &'a Procedure>) -> Value {
    Value::Array(procedures.into_iter().map(entry_to_value).collect())
}

/// Render procedures as compact JSON text.
pub fn to_string<'a>(procedures: impl IntoIterator<Item = &'a Procedure>) -> Result<String> {
    serde_json::to_string(&to_value(procedures)).map_err(|e| Error::Serialization(e.to_string()))
}

/// Render procedures as indented JSON text, the form meant for files.
pub fn to_string_pretty<'a>(procedures: impl IntoIterator<Item = &'a Procedure>) -> Result<String> {
    serde_json::to_string_pretty(&to_value(procedures))
        .map_err(|e| Error::Serialization(e.to_string()))
}

/// Write a specification document to a file.
pub fn write_file<'a>(
    path: impl AsRef<Path>,
    procedures: impl IntoIterator<Item = &'a Procedure>,
) -> Result<()> {
    let text = to_string_pretty(procedures)?;
    std::fs::write(path.as_ref(), text).map_err(|e| {
        Error::InvalidRequest(format!(
            "cannot write specification file {}: {}",
            path.as_ref().display(),
            e
        ))
    })
}

fn entry_to_value(procedure: &Procedure) -> Value {
    let mut entry = Map::new();
    entry.insert(
        "name".to_string(),
        Value::String(procedure.name().to_string()),
    );

    let params = if procedure.params().is_empty() {
        Value::Null
    } else {
        match procedure.param_style() {
            ParamStyle::ByName => Value::Object(
                procedure
                    .params()
                    .iter()
                    .map(|p| (p.name.clone(), p.json_type.sample_literal()))
                    .collect(),
            ),
            ParamStyle::ByPosition => Value::Array(
                procedure
                    .params()
                    .iter()
                    .map(|p| p.json_type.sample_literal())
                    .collect(),
            ),
        }
    };
    entry.insert("params".to_string(), params);

    if let Some(return_type) = procedure.return_type() {
        entry.insert("returns".to_string(), return_type.sample_literal());
    }
    Value::Object(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procedure::ProcedureKind;
    use serde_json::json;

    #[test]
    fn parses_methods_and_notifications() {
        let text = r#"[
            {"name": "sayHello", "params": {"name": "somestring"}, "returns": "somestring"},
            {"name": "initCounter", "params": {"value": 1}}
        ]"#;
        let procedures = parse_str(text).unwrap();
        assert_eq!(procedures.len(), 2);

        assert_eq!(procedures[0].name(), "sayHello");
        assert_eq!(procedures[0].kind(), ProcedureKind::Method);
        assert_eq!(procedures[0].return_type(), Some(JsonType::String));
        assert_eq!(procedures[0].param_style(), ParamStyle::ByName);

        assert_eq!(procedures[1].kind(), ProcedureKind::Notification);
        assert_eq!(procedures[1].return_type(), None);
        assert_eq!(procedures[1].params()[0].json_type, JsonType::Integer);
    }

    #[test]
    fn positional_params_get_synthetic_names() {
        let text = r#"[{"name": "add", "params": [1, 1], "returns": 1}]"#;
        let procedures = parse_str(text).unwrap();
        let p = &procedures[0];
        assert_eq!(p.param_style(), ParamStyle::ByPosition);
        assert_eq!(p.params()[0].name, "param01");
        assert_eq!(p.params()[1].name, "param02");
    }

    #[test]
    fn literal_types_are_inferred() {
        let text = r#"[{"name": "m", "params": [true, "s", 1, 1.5, {}, [], null], "returns": {}}]"#;
        let p = &parse_str(text).unwrap()[0];
        let types: Vec<JsonType> = p.params().iter().map(|p| p.json_type).collect();
        assert_eq!(
            types,
            vec![
                JsonType::Boolean,
                JsonType::String,
                JsonType::Integer,
                JsonType::Real,
                JsonType::Object,
                JsonType::Array,
                JsonType::Null,
            ]
        );
        assert_eq!(p.return_type(), Some(JsonType::Object));
    }

    #[test]
    fn absent_and_null_params_mean_empty() {
        let text = r#"[{"name": "a", "returns": 1}, {"name": "b", "params": null, "returns": 1}]"#;
        let procedures = parse_str(text).unwrap();
        assert!(procedures[0].params().is_empty());
        assert!(procedures[1].params().is_empty());
    }

    #[test]
    fn rejects_duplicates_and_bad_entries() {
        let dup = r#"[{"name": "a"}, {"name": "a"}]"#;
        assert!(matches!(parse_str(dup), Err(Error::InvalidRequest(_))));

        let no_name = r#"[{"params": []}]"#;
        assert!(matches!(parse_str(no_name), Err(Error::InvalidRequest(_))));

        let bad_name = r#"[{"name": 5}]"#;
        assert!(matches!(parse_str(bad_name), Err(Error::InvalidRequest(_))));

        let not_object = r#"[42]"#;
        assert!(matches!(parse_str(not_object), Err(Error::InvalidRequest(_))));

        let not_array = r#"{"name": "a"}"#;
        assert!(matches!(parse_str(not_array), Err(Error::InvalidRequest(_))));

        let bad_params = r#"[{"name": "a", "params": 7}]"#;
        assert!(matches!(parse_str(bad_params), Err(Error::InvalidRequest(_))));
    }

    #[test]
    fn syntax_errors_surface_as_parse_error() {
        let err = parse_str("[{\"name\":").unwrap_err();
        assert_eq!(err.code(), ErrorCode::ParseError.code());
    }

    #[test]
    fn writes_canonical_literals() {
        let procedures = vec![
            Procedure::method("sayHello", ParamStyle::ByName, JsonType::String)
                .with_param("name", JsonType::String),
            Procedure::method("add", ParamStyle::ByPosition, JsonType::Integer)
                .with_param("param01", JsonType::Integer)
                .with_param("param02", JsonType::Integer),
            Procedure::notification("tick", ParamStyle::ByName),
        ];
        let value = to_value(&procedures);
        assert_eq!(
            value,
            json!([
                {"name": "sayHello", "params": {"name": "somestring"}, "returns": "somestring"},
                {"name": "add", "params": [1, 1], "returns": 1},
                {"name": "tick", "params": null}
            ])
        );
    }

    #[test]
    fn read_of_write_reproduces_procedures() {
        let original = vec![
            Procedure::method("sayHello", ParamStyle::ByName, JsonType::String)
                .with_param("name", JsonType::String),
            Procedure::method("calc", ParamStyle::ByPosition, JsonType::Real)
                .with_param("param01", JsonType::Real)
                .with_param("param02", JsonType::Integer),
            Procedure::notification("initCounter", ParamStyle::ByName)
                .with_param("value", JsonType::Integer),
        ];
        let text = to_string(&original).unwrap();
        let reread = parse_str(&text).unwrap();
        assert_eq!(reread, original);
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("procedures.json");
        let original = vec![
            Procedure::method("m", ParamStyle::ByName, JsonType::Boolean)
                .with_param("flag", JsonType::Boolean),
        ];
        write_file(&path, &original).unwrap();
        let reread = parse_file(&path).unwrap();
        assert_eq!(reread, original);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = parse_file("/nonexistent/spec.json").unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }
}
