//! Wire-level types shared by the JSON-RPC 1.0 and 2.0 protocol engines
//!
//! This module defines the building blocks every other component speaks:
//!
//! - [`Id`]: the request identifier sum type (integer, string or null)
//! - [`JsonType`]: the scalar type tags used by procedure declarations
//! - [`ProtocolVersion`]: the v1/v2 selector for engines and clients
//! - [`V2Request`] / [`V2Response`]: JSON-RPC 2.0 envelopes
//! - [`V1Request`] / [`V1Response`]: JSON-RPC 1.0 envelopes
//!
//! The JSON value model itself is `serde_json::Value`: a tagged union over
//! null, bool, number, string, array and object with structural equality,
//! which is exactly what the protocol requires.
//!
//! # Absent vs. null ids
//!
//! JSON-RPC 2.0 distinguishes a *missing* `id` field (the request is a
//! notification) from an `id` that is present but `null`. The envelopes
//! therefore carry `Option<Id>` where `None` means the field is absent and
//! `Some(Id::Null)` means it was spelled `null` on the wire. Conflating the
//! two would break notification detection.

use crate::error::ErrorObject;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier correlating a request with its response.
///
/// The wire representation is untagged: an `Id` serializes directly as a
/// JSON integer, string or null. `Hash`/`Eq` are implemented so ids can key
/// batch-response maps, including string ids round-tripped from a server.
///
/// # Examples
///
/// ```rust
/// use jarpc_core::Id;
///
/// let a: Id = 42i64.into();
/// let b: Id = "req-7".into();
/// assert_eq!(a.to_string(), "42");
/// assert_eq!(b.to_string(), "\"req-7\"");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    /// Numeric identifier, the form the client engine assigns.
    Number(i64),
    /// String identifier; servers may echo these and clients must cope.
    String(String),
    /// A literal `null` id. In v1 this marks a notification.
    Null,
}

impl Id {
    /// Classify a decoded JSON value as an id.
    ///
    /// Accepts integers, strings and null; everything else (reals,
    /// booleans, containers) is not a valid id and yields `None`.
    pub fn from_value(value: &Value) -> Option<Id> {
        match value {
            Value::Null => Some(Id::Null),
            Value::String(s) => Some(Id::String(s.clone())),
            Value::Number(n) => n.as_i64().map(Id::Number),
            _ => None,
        }
    }

    /// True for the `null` id.
    pub fn is_null(&self) -> bool {
        matches!(self, Id::Null)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Number(n) => write!(f, "{}", n),
            Id::String(s) => write!(f, "\"{}\"", s),
            Id::Null => write!(f, "null"),
        }
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Number(n)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::String(s.to_string())
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::String(s)
    }
}

/// Scalar type tags for procedure parameter and return declarations.
///
/// These are the only types the registry validates against; anything more
/// structured than "is an object" / "is an array" is the handler's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonType {
    String,
    Boolean,
    Integer,
    Real,
    Object,
    Array,
    Null,
}

impl JsonType {
    /// Classify a JSON value into the declaration type it would satisfy.
    ///
    /// Numbers with an integral representation classify as `Integer`,
    /// all other numbers as `Real`.
    pub fn of(value: &Value) -> JsonType {
        match value {
            Value::Null => JsonType::Null,
            Value::Bool(_) => JsonType::Boolean,
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    JsonType::Integer
                } else {
                    JsonType::Real
                }
            }
            Value::String(_) => JsonType::String,
            Value::Array(_) => JsonType::Array,
            Value::Object(_) => JsonType::Object,
        }
    }

    /// Check whether `value` satisfies this declaration type.
    ///
    /// `Integer` accepts any JSON number with a zero fractional part, so
    /// `5` and `5.0` both validate while `5.2` does not. `Real` accepts
    /// every JSON number, integers included.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            JsonType::String => value.is_string(),
            JsonType::Boolean => value.is_boolean(),
            JsonType::Integer => match value {
                Value::Number(n) => {
                    n.is_i64()
                        || n.is_u64()
                        || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
                }
                _ => false,
            },
            JsonType::Real => value.is_number(),
            JsonType::Object => value.is_object(),
            JsonType::Array => value.is_array(),
            JsonType::Null => value.is_null(),
        }
    }

    /// Canonical literal of this type, used by the specification writer.
    pub fn sample_literal(self) -> Value {
        match self {
            JsonType::String => Value::String("somestring".to_string()),
            JsonType::Boolean => Value::Bool(true),
            JsonType::Integer => serde_json::json!(1),
            JsonType::Real => serde_json::json!(1.0),
            JsonType::Object => serde_json::json!({"objectkey": "objectvalue"}),
            JsonType::Array => serde_json::json!([]),
            JsonType::Null => Value::Null,
        }
    }
}

/// Protocol revision selector for engines and clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProtocolVersion {
    /// JSON-RPC 1.0: no `jsonrpc` field, positional params, null-id
    /// notifications, responses carrying both `result` and `error`.
    V1,
    /// JSON-RPC 2.0: `jsonrpc: "2.0"`, named or positional params,
    /// id-absence notifications, batch support.
    #[default]
    V2,
}

/// The literal carried in every JSON-RPC 2.0 envelope.
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 request envelope.
///
/// Built by the client engine; the server engines decode requests from raw
/// values instead so that malformed shapes can be answered with the precise
/// error code rather than a generic deserialization failure.
///
/// A `None` id makes this a notification: the field is omitted entirely on
/// the wire and no response will be produced for it.
#[derive(Debug, Clone, Serialize)]
pub struct V2Request {
    /// Always `"2.0"`.
    pub jsonrpc: String,
    /// Name of the procedure to invoke.
    pub method: String,
    /// Parameters; an object, array or null.
    pub params: Value,
    /// Request id; omitted (`None`) for notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
}

impl V2Request {
    /// Build a method-call request with the given id.
    pub fn call(method: impl Into<String>, params: Value, id: Id) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id: Some(id),
        }
    }

    /// Build a notification request (no id, no response expected).
    pub fn notification(method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id: None,
        }
    }
}

/// JSON-RPC 2.0 response envelope.
///
/// Exactly one of `result` / `error` is present; the factory constructors
/// enforce the exclusivity so the struct cannot be built in an invalid
/// state. The `id` echoes the request id, or is `Id::Null` when the
/// request id could not be determined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct V2Response {
    /// Always `"2.0"`.
    pub jsonrpc: String,
    /// Result value; present only on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error envelope; present only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
    /// Echo of the request id.
    pub id: Id,
}

impl V2Response {
    /// Successful response carrying `result`.
    pub fn success(result: Value, id: Id) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Failed response carrying `error`.
    pub fn error(error: ErrorObject, id: Id) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }

    /// True when this response carries a result.
    pub fn is_success(&self) -> bool {
        self.result.is_some()
    }
}

/// JSON-RPC 1.0 request envelope.
///
/// v1 has no version marker; all three fields are mandatory on the wire
/// and `id: null` marks a notification.
#[derive(Debug, Clone, Serialize)]
pub struct V1Request {
    /// Name of the procedure to invoke.
    pub method: String,
    /// Positional parameters; an array (or null for "no parameters").
    pub params: Value,
    /// Request id; `Id::Null` for notifications.
    pub id: Id,
}

impl V1Request {
    /// Build a method-call request with the given id.
    pub fn call(method: impl Into<String>, params: Value, id: Id) -> Self {
        Self {
            method: method.into(),
            params,
            id,
        }
    }

    /// Build a notification request (`id: null`).
    pub fn notification(method: impl Into<String>, params: Value) -> Self {
        Self {
            method: method.into(),
            params,
            id: Id::Null,
        }
    }
}

/// JSON-RPC 1.0 response envelope.
///
/// The v1 wire format requires both `result` and `error` on every
/// response, with the unused side set to null. That is purely a
/// serialization detail: the constructors keep the success/failure sum
/// intact, and `error: None` serializes as `"error": null`.
#[derive(Debug, Clone, Serialize)]
pub struct V1Response {
    /// Result value; `null` on failure.
    pub result: Value,
    /// Error envelope; `null` on success.
    pub error: Option<ErrorObject>,
    /// Echo of the request id.
    pub id: Id,
}

impl V1Response {
    /// Successful response: `result` set, `error: null`.
    pub fn success(result: Value, id: Id) -> Self {
        Self {
            result,
            error: None,
            id,
        }
    }

    /// Failed response: `result: null`, `error` set.
    pub fn error(error: ErrorObject, id: Id) -> Self {
        Self {
            result: Value::Null,
            error: Some(error),
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    #[test]
    fn id_display() {
        assert_eq!(Id::Number(42).to_string(), "42");
        assert_eq!(Id::String("abc".into()).to_string(), "\"abc\"");
        assert_eq!(Id::Null.to_string(), "null");
    }

    #[test]
    fn id_from_value_accepts_int_string_null() {
        assert_eq!(Id::from_value(&json!(7)), Some(Id::Number(7)));
        assert_eq!(Id::from_value(&json!("x")), Some(Id::String("x".into())));
        assert_eq!(Id::from_value(&Value::Null), Some(Id::Null));
        assert_eq!(Id::from_value(&json!(3.2)), None);
        assert_eq!(Id::from_value(&json!(true)), None);
        assert_eq!(Id::from_value(&json!([1])), None);
    }

    #[test]
    fn id_serde_is_untagged() {
        assert_eq!(serde_json::to_string(&Id::Number(1)).unwrap(), "1");
        assert_eq!(serde_json::to_string(&Id::String("a".into())).unwrap(), "\"a\"");
        assert_eq!(serde_json::to_string(&Id::Null).unwrap(), "null");
        let id: Id = serde_json::from_str("\"a\"").unwrap();
        assert_eq!(id, Id::String("a".into()));
    }

    #[test]
    fn json_type_classification() {
        assert_eq!(JsonType::of(&json!("x")), JsonType::String);
        assert_eq!(JsonType::of(&json!(5)), JsonType::Integer);
        assert_eq!(JsonType::of(&json!(5.5)), JsonType::Real);
        assert_eq!(JsonType::of(&json!(true)), JsonType::Boolean);
        assert_eq!(JsonType::of(&json!([])), JsonType::Array);
        assert_eq!(JsonType::of(&json!({})), JsonType::Object);
        assert_eq!(JsonType::of(&Value::Null), JsonType::Null);
    }

    #[test]
    fn integer_accepts_integral_reals_only() {
        assert!(JsonType::Integer.matches(&json!(5)));
        assert!(JsonType::Integer.matches(&json!(5.0)));
        assert!(!JsonType::Integer.matches(&json!(5.2)));
        assert!(!JsonType::Integer.matches(&json!("5")));
    }

    #[test]
    fn real_accepts_any_number() {
        assert!(JsonType::Real.matches(&json!(5)));
        assert!(JsonType::Real.matches(&json!(5.2)));
        assert!(!JsonType::Real.matches(&json!(true)));
    }

    #[test]
    fn sample_literals_round_trip_through_classification() {
        for ty in [
            JsonType::String,
            JsonType::Boolean,
            JsonType::Integer,
            JsonType::Real,
            JsonType::Object,
            JsonType::Array,
            JsonType::Null,
        ] {
            assert_eq!(JsonType::of(&ty.sample_literal()), ty);
        }
    }

    #[test]
    fn v2_request_notification_omits_id() {
        let req = V2Request::notification("ping", Value::Null);
        let text = serde_json::to_string(&req).unwrap();
        assert!(!text.contains("\"id\""));
        assert!(text.contains("\"jsonrpc\":\"2.0\""));
    }

    #[test]
    fn v2_request_call_carries_id() {
        let req = V2Request::call("ping", json!([1]), Id::Number(9));
        let text = serde_json::to_string(&req).unwrap();
        assert!(text.contains("\"id\":9"));
        assert!(text.contains("\"params\":[1]"));
    }

    #[test]
    fn v2_response_success_shape() {
        let resp = V2Response::success(json!("ok"), Id::Number(1));
        let text = serde_json::to_string(&resp).unwrap();
        assert!(text.contains("\"result\":\"ok\""));
        assert!(!text.contains("\"error\""));
        assert!(resp.is_success());
    }

    #[test]
    fn v2_response_error_shape() {
        let resp = V2Response::error(ErrorObject::from_code(ErrorCode::MethodNotFound), Id::Null);
        let text = serde_json::to_string(&resp).unwrap();
        assert!(text.contains("\"error\""));
        assert!(text.contains("-32601"));
        assert!(text.contains("\"id\":null"));
        assert!(!text.contains("\"result\""));
    }

    #[test]
    fn v1_response_always_carries_both_fields() {
        let ok = V1Response::success(json!(12), Id::Number(1));
        let text = serde_json::to_string(&ok).unwrap();
        assert!(text.contains("\"result\":12"));
        assert!(text.contains("\"error\":null"));
        assert!(!text.contains("jsonrpc"));

        let err = V1Response::error(ErrorObject::from_code(ErrorCode::InvalidParams), Id::Number(1));
        let text = serde_json::to_string(&err).unwrap();
        assert!(text.contains("\"result\":null"));
        assert!(text.contains("-32602"));
    }

    #[test]
    fn v1_notification_request_has_null_id() {
        let req = V1Request::notification("tick", json!([]));
        let text = serde_json::to_string(&req).unwrap();
        assert!(text.contains("\"id\":null"));
    }
}
