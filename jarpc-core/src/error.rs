//! Error taxonomy for jarpc
//!
//! Two layers, converted at the engine boundary:
//!
//! - [`Error`]: the application-level error enum (thiserror) used in
//!   `Result` returns throughout the crates.
//! - [`ErrorObject`]: the wire-format error envelope (`code`, `message`,
//!   optional `data`) that appears inside responses.
//!
//! [`ErrorCode`] is the immutable table of protocol-defined codes and
//! their canonical messages. The codes are wire-visible and fixed:
//!
//! | code   | meaning                                  |
//! |--------|------------------------------------------|
//! | -32700 | parse error                              |
//! | -32600 | invalid request                          |
//! | -32601 | method not found                         |
//! | -32602 | invalid params                           |
//! | -32603 | internal error                           |
//! | -32604 | procedure is a method                    |
//! | -32605 | procedure is a notification              |
//! | -32001 | invalid response (client side)           |
//! | -32003 | connector failure (client side)          |
//!
//! The range `-32099..=-32000` is reserved for server-defined errors
//! raised by handlers via [`ErrorObject::server`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::RangeInclusive;
use thiserror::Error;

/// Result type used throughout the jarpc crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Range of error codes handlers may use for their own failures.
pub const SERVER_ERROR_RANGE: RangeInclusive<i32> = -32099..=-32000;

/// Protocol-defined error codes with canonical messages.
///
/// This is a value table, not a registry: codes and messages are fixed at
/// compile time and shared by every engine in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The message body was not valid JSON.
    ParseError,
    /// The JSON was well-formed but is not a valid request object.
    InvalidRequest,
    /// The requested method is not registered.
    MethodNotFound,
    /// The parameters do not match the procedure declaration.
    InvalidParams,
    /// A handler failed in an unspecified way.
    InternalError,
    /// A notification-shaped request named a procedure declared as method.
    ProcedureIsMethod,
    /// A method-shaped request named a procedure declared as notification.
    ProcedureIsNotification,
    /// A server reply did not match the protocol shape (client side).
    ClientInvalidResponse,
    /// The transport failed to deliver the request (client side).
    ClientConnector,
}

impl ErrorCode {
    /// The numeric, wire-visible code.
    pub const fn code(self) -> i32 {
        match self {
            ErrorCode::ParseError => -32700,
            ErrorCode::InvalidRequest => -32600,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::InternalError => -32603,
            ErrorCode::ProcedureIsMethod => -32604,
            ErrorCode::ProcedureIsNotification => -32605,
            ErrorCode::ClientInvalidResponse => -32001,
            ErrorCode::ClientConnector => -32003,
        }
    }

    /// Canonical human-readable message for this code.
    ///
    /// These strings are stable and intended for log consumption, not for
    /// structured parsing.
    pub const fn message(self) -> &'static str {
        match self {
            ErrorCode::ParseError => "JSON_PARSE_ERROR: The JSON-Object is not JSON-Valid",
            ErrorCode::InvalidRequest => {
                "INVALID_JSON_REQUEST: The JSON sent is not a valid JSON-RPC Request object"
            }
            ErrorCode::MethodNotFound => {
                "METHOD_NOT_FOUND: The method being requested is not available on this server"
            }
            ErrorCode::InvalidParams => {
                "INVALID_PARAMS: Invalid method parameters (invalid name and/or type) recognised"
            }
            ErrorCode::InternalError => {
                "INTERNAL_ERROR: An internal error occurred while executing the procedure"
            }
            ErrorCode::ProcedureIsMethod => {
                "PROCEDURE_IS_METHOD: The requested notification is declared as a method"
            }
            ErrorCode::ProcedureIsNotification => {
                "PROCEDURE_IS_NOTIFICATION: The requested method is declared as notification"
            }
            ErrorCode::ClientInvalidResponse => {
                "CLIENT_INVALID_RESPONSE: The response is not a valid JSON-RPC response object"
            }
            ErrorCode::ClientConnector => {
                "CLIENT_CONNECTOR_ERROR: The client connector could not deliver the request"
            }
        }
    }

    /// Look a protocol code up by its numeric value.
    pub fn from_code(code: i32) -> Option<ErrorCode> {
        match code {
            -32700 => Some(ErrorCode::ParseError),
            -32600 => Some(ErrorCode::InvalidRequest),
            -32601 => Some(ErrorCode::MethodNotFound),
            -32602 => Some(ErrorCode::InvalidParams),
            -32603 => Some(ErrorCode::InternalError),
            -32604 => Some(ErrorCode::ProcedureIsMethod),
            -32605 => Some(ErrorCode::ProcedureIsNotification),
            -32001 => Some(ErrorCode::ClientInvalidResponse),
            -32003 => Some(ErrorCode::ClientConnector),
            _ => None,
        }
    }
}

/// Wire-format error envelope.
///
/// This is the object carried in the `error` member of a response:
/// a numeric `code`, a human-readable `message` and an optional
/// structured `data` payload that passes through the engine unchanged.
///
/// # Examples
///
/// ```rust
/// use jarpc_core::{ErrorCode, ErrorObject};
/// use serde_json::json;
///
/// let not_found = ErrorObject::from_code(ErrorCode::MethodNotFound);
/// assert_eq!(not_found.code, -32601);
///
/// let custom = ErrorObject::server_with_data(-32050, "quota exceeded", json!({"limit": 10}));
/// assert!(custom.is_server_defined());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    /// Numeric error code.
    pub code: i32,
    /// Human-readable error message.
    pub message: String,
    /// Optional structured payload attached by the producer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorObject {
    /// Error with an arbitrary code and message.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Error for a protocol-defined code with its canonical message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self::new(code.code(), code.message())
    }

    /// Server-defined error raised by a handler.
    ///
    /// `code` is expected to lie in [`SERVER_ERROR_RANGE`]; the engine
    /// forwards whatever the handler produced either way.
    pub fn server(code: i32, message: impl Into<String>) -> Self {
        Self::new(code, message)
    }

    /// Server-defined error with an attached data payload.
    pub fn server_with_data(code: i32, message: impl Into<String>, data: Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Attach a data payload.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// True when `code` lies in the server-defined range.
    pub fn is_server_defined(&self) -> bool {
        SERVER_ERROR_RANGE.contains(&self.code)
    }
}

impl std::fmt::Display for ErrorObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ErrorObject {}

/// Application-level error for jarpc operations.
///
/// Server engines convert these into wire envelopes; the client engine
/// raises them as typed failures and never re-emits them onto the wire.
/// [`Error::code`] exposes the numeric code each variant corresponds to.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// A wire-format error: either decoded from a server reply or raised
    /// by a handler that wants a specific error envelope forwarded.
    #[error("JSON-RPC error: {0}")]
    JsonRpc(#[from] ErrorObject),

    /// Conversion between Rust types and JSON failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The client transport failed to deliver the request.
    #[error("connector error: {0}")]
    Connector(String),

    /// A server reply did not match the expected protocol shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// A request or specification document is structurally invalid.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Registration of an already-present procedure name.
    #[error("duplicate procedure: {0}")]
    DuplicateProcedure(String),

    /// Registration with a handler of the wrong kind for the procedure.
    #[error("registration error: {0}")]
    Registration(String),
}

impl Error {
    /// The numeric error code this failure maps to.
    pub fn code(&self) -> i32 {
        match self {
            Error::JsonRpc(obj) => obj.code,
            Error::Serialization(_) => ErrorCode::InternalError.code(),
            Error::Connector(_) => ErrorCode::ClientConnector.code(),
            Error::InvalidResponse(_) => ErrorCode::ClientInvalidResponse.code(),
            Error::InvalidRequest(_) => ErrorCode::InvalidRequest.code(),
            Error::DuplicateProcedure(_) => ErrorCode::InvalidRequest.code(),
            Error::Registration(_) => ErrorCode::InvalidRequest.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn codes_match_wire_values() {
        assert_eq!(ErrorCode::ParseError.code(), -32700);
        assert_eq!(ErrorCode::InvalidRequest.code(), -32600);
        assert_eq!(ErrorCode::MethodNotFound.code(), -32601);
        assert_eq!(ErrorCode::InvalidParams.code(), -32602);
        assert_eq!(ErrorCode::InternalError.code(), -32603);
        assert_eq!(ErrorCode::ProcedureIsMethod.code(), -32604);
        assert_eq!(ErrorCode::ProcedureIsNotification.code(), -32605);
        assert_eq!(ErrorCode::ClientInvalidResponse.code(), -32001);
        assert_eq!(ErrorCode::ClientConnector.code(), -32003);
    }

    #[test]
    fn from_code_round_trips() {
        for code in [
            ErrorCode::ParseError,
            ErrorCode::InvalidRequest,
            ErrorCode::MethodNotFound,
            ErrorCode::InvalidParams,
            ErrorCode::InternalError,
            ErrorCode::ProcedureIsMethod,
            ErrorCode::ProcedureIsNotification,
            ErrorCode::ClientInvalidResponse,
            ErrorCode::ClientConnector,
        ] {
            assert_eq!(ErrorCode::from_code(code.code()), Some(code));
        }
        assert_eq!(ErrorCode::from_code(-1), None);
    }

    #[test]
    fn messages_are_nonempty_and_stable() {
        assert!(ErrorCode::MethodNotFound.message().starts_with("METHOD_NOT_FOUND"));
        assert!(ErrorCode::ParseError.message().starts_with("JSON_PARSE_ERROR"));
    }

    #[test]
    fn error_object_serde_omits_absent_data() {
        let plain = ErrorObject::new(-32000, "boom");
        let text = serde_json::to_string(&plain).unwrap();
        assert!(!text.contains("data"));

        let with_data = plain.with_data(json!({"k": 1}));
        let text = serde_json::to_string(&with_data).unwrap();
        assert!(text.contains("\"data\":{\"k\":1}"));

        let decoded: ErrorObject = serde_json::from_str(&text).unwrap();
        assert_eq!(decoded, with_data);
    }

    #[test]
    fn server_range_detection() {
        assert!(ErrorObject::server(-32000, "x").is_server_defined());
        assert!(ErrorObject::server(-32099, "x").is_server_defined());
        assert!(!ErrorObject::from_code(ErrorCode::InternalError).is_server_defined());
    }

    #[test]
    fn error_code_mapping() {
        assert_eq!(Error::Connector("down".into()).code(), -32003);
        assert_eq!(Error::InvalidResponse("bad".into()).code(), -32001);
        assert_eq!(Error::InvalidRequest("bad".into()).code(), -32600);
        let wrapped: Error = ErrorObject::new(-32050, "user").into();
        assert_eq!(wrapped.code(), -32050);
    }

    #[test]
    fn error_object_display() {
        let obj = ErrorObject::from_code(ErrorCode::MethodNotFound);
        let text = obj.to_string();
        assert!(text.contains("-32601"));
        assert!(text.contains("METHOD_NOT_FOUND"));
    }
}
