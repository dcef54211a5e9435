//! JSON-RPC 1.0 server engine
//!
//! Same dispatch pipeline as the 2.0 engine with the v1 wire rules:
//!
//! - no `jsonrpc` version marker
//! - `method`, `params` and `id` are all required fields
//! - `params` is positional: an array, or null standing for an empty
//!   array; objects are rejected as InvalidRequest
//! - `id: null` marks a notification
//! - responses carry both `result` and `error`, the unused side null
//! - no batch support; an array at the top level is an invalid request

use crate::handler::HandlerRef;
use crate::registry::ProcedureRegistry;
use jarpc_core::procedure::ProcedureKind;
use jarpc_core::{ClientConnectionHandler, Error, ErrorCode, ErrorObject, Id, V1Response};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Server-side protocol engine for JSON-RPC 1.0.
pub struct V1Engine {
    registry: Arc<ProcedureRegistry>,
}

impl V1Engine {
    /// Create an engine over a populated registry.
    pub fn new(registry: Arc<ProcedureRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this engine dispatches against.
    pub fn registry(&self) -> &Arc<ProcedureRegistry> {
        &self.registry
    }

    /// Process one request string and return the response string, empty
    /// for a valid notification.
    pub fn handle(&self, request: &str) -> String {
        match serde_json::from_str::<Value>(request) {
            Ok(message) => self.handle_value(&message),
            Err(_) => crate::encode_payload(&V1Response::error(
                ErrorObject::from_code(ErrorCode::ParseError),
                Id::Null,
            )),
        }
    }

    /// Process an already-parsed message value.
    pub fn handle_value(&self, message: &Value) -> String {
        match message {
            Value::Object(_) => match self.handle_single(message) {
                Some(response) => crate::encode_payload(&response),
                None => String::new(),
            },
            _ => crate::encode_payload(&invalid_request()),
        }
    }

    fn handle_single(&self, request: &Value) -> Option<V1Response> {
        let Value::Object(fields) = request else {
            return Some(invalid_request());
        };
        if !fields_are_valid(fields) {
            return Some(invalid_request());
        }
        let Some(method) = fields.get("method").and_then(Value::as_str) else {
            return Some(invalid_request());
        };
        let id = fields
            .get("id")
            .and_then(Id::from_value)
            .unwrap_or(Id::Null);
        let notification_intent = id.is_null();

        let Some((procedure, handler)) = self.registry.get(method) else {
            return Some(V1Response::error(
                ErrorObject::from_code(ErrorCode::MethodNotFound),
                id,
            ));
        };
        match (notification_intent, procedure.kind()) {
            (false, ProcedureKind::Notification) => {
                return Some(V1Response::error(
                    ErrorObject::from_code(ErrorCode::ProcedureIsNotification),
                    id,
                ));
            }
            (true, ProcedureKind::Method) => {
                return Some(V1Response::error(
                    ErrorObject::from_code(ErrorCode::ProcedureIsMethod),
                    Id::Null,
                ));
            }
            _ => {}
        }

        let params = fields.get("params").unwrap_or(&Value::Null);
        if !procedure.validate_params(params) {
            return Some(V1Response::error(
                ErrorObject::from_code(ErrorCode::InvalidParams),
                id,
            ));
        }

        tracing::debug!(method, "dispatching v1 request");
        match handler {
            HandlerRef::Method(f) => Some(match f(params) {
                Ok(result) => V1Response::success(result, id),
                Err(Error::JsonRpc(error)) => V1Response::error(error, id),
                Err(other) => {
                    tracing::error!(method, error = %other, "method handler failed");
                    V1Response::error(ErrorObject::from_code(ErrorCode::InternalError), id)
                }
            }),
            HandlerRef::Notification(f) => {
                if let Err(error) = f(params) {
                    tracing::warn!(method, error = %error, "notification handler failed");
                }
                None
            }
        }
    }
}

impl ClientConnectionHandler for V1Engine {
    fn handle_request(&self, request: &str) -> String {
        self.handle(request)
    }
}

fn invalid_request() -> V1Response {
    V1Response::error(ErrorObject::from_code(ErrorCode::InvalidRequest), Id::Null)
}

/// Structural validation of a v1 request object: string `method`,
/// mandatory `id` (integer, string or null) and mandatory positional
/// `params` (array or null).
fn fields_are_valid(fields: &Map<String, Value>) -> bool {
    if !fields.get("method").is_some_and(Value::is_string) {
        return false;
    }
    let Some(id) = fields.get("id") else {
        return false;
    };
    if !(id.is_null() || id.is_string() || id.as_i64().is_some()) {
        return false;
    }
    let Some(params) = fields.get("params") else {
        return false;
    };
    params.is_array() || params.is_null()
}
