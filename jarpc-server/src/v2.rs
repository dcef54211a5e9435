//! JSON-RPC 2.0 server engine
//!
//! [`V2Engine`] turns a request string into a response string: parse,
//! shape dispatch (single vs. batch), request-field validation, registry
//! lookup, kind reconciliation, parameter validation, handler invocation
//! and response composition. Every step that can fail maps to one of the
//! protocol error codes; handler failures never escape the engine.
//!
//! The engine is synchronous and stateless across requests: all
//! per-request state lives on the stack, so `handle` may be called from
//! any number of threads in parallel. Concurrency, framing and ordering
//! across requests are transport concerns.
//!
//! # Notifications
//!
//! A valid notification invocation produces no output, even when the
//! handler fails (the failure is logged). Protocol errors are always
//! answered: a request that cannot be attributed to a valid notification
//! gets an error envelope, with the echoed id falling back to `null`.

use crate::handler::HandlerRef;
use crate::registry::ProcedureRegistry;
use jarpc_core::procedure::ProcedureKind;
use jarpc_core::{ClientConnectionHandler, Error, ErrorCode, ErrorObject, Id, V2Response};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Server-side protocol engine for JSON-RPC 2.0.
///
/// Construct it with a fully-populated registry; the registry is shared
/// immutably from then on.
///
/// # Examples
///
/// ```rust
/// use jarpc_core::{JsonType, ParamStyle, Procedure};
/// use jarpc_server::{method_fn, ProcedureRegistry, V2Engine};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let mut registry = ProcedureRegistry::new();
/// registry
///     .add(
///         Procedure::method("add", ParamStyle::ByPosition, JsonType::Integer)
///             .with_param("param01", JsonType::Integer)
///             .with_param("param02", JsonType::Integer),
///         method_fn(|params| {
///             let a = params[0].as_i64().unwrap_or(0);
///             let b = params[1].as_i64().unwrap_or(0);
///             Ok(json!(a + b))
///         }),
///     )
///     .unwrap();
///
/// let engine = V2Engine::new(Arc::new(registry));
/// let response = engine.handle(r#"{"jsonrpc":"2.0","id":2,"method":"add","params":[5,7]}"#);
/// assert!(response.contains("\"result\":12"));
/// ```
pub struct V2Engine {
    registry: Arc<ProcedureRegistry>,
}

impl V2Engine {
    /// Create an engine over a populated registry.
    pub fn new(registry: Arc<ProcedureRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this engine dispatches against.
    pub fn registry(&self) -> &Arc<ProcedureRegistry> {
        &self.registry
    }

    /// Process one request string and return the response string.
    ///
    /// Returns an empty string when the input produces no response (a
    /// valid notification, or a batch of only notifications).
    pub fn handle(&self, request: &str) -> String {
        match serde_json::from_str::<Value>(request) {
            Ok(message) => self.handle_value(&message),
            Err(_) => crate::encode_payload(&V2Response::error(
                ErrorObject::from_code(ErrorCode::ParseError),
                Id::Null,
            )),
        }
    }

    /// Process an already-parsed message value.
    pub fn handle_value(&self, message: &Value) -> String {
        match message {
            Value::Array(entries) => self.handle_batch(entries),
            Value::Object(_) => match self.handle_single(message) {
                Some(response) => crate::encode_payload(&response),
                None => String::new(),
            },
            _ => crate::encode_payload(&invalid_request()),
        }
    }

    /// Process a batch: every entry independently, responses in input
    /// order with notification responses suppressed.
    fn handle_batch(&self, entries: &[Value]) -> String {
        if entries.is_empty() {
            return crate::encode_payload(&invalid_request());
        }
        let responses: Vec<V2Response> = entries
            .iter()
            .filter_map(|entry| self.handle_single(entry))
            .collect();
        if responses.is_empty() {
            String::new()
        } else {
            crate::encode_payload(&responses)
        }
    }

    /// Process one request object; `None` means "no response".
    fn handle_single(&self, request: &Value) -> Option<V2Response> {
        let Value::Object(fields) = request else {
            return Some(invalid_request());
        };
        if !fields_are_valid(fields) {
            return Some(invalid_request());
        }
        let Some(method) = fields.get("method").and_then(Value::as_str) else {
            return Some(invalid_request());
        };

        // Field presence of "id" (null included) selects the method path.
        let id_field = fields.get("id");
        let echoed = id_field.and_then(Id::from_value).unwrap_or(Id::Null);

        let Some((procedure, handler)) = self.registry.get(method) else {
            return Some(V2Response::error(
                ErrorObject::from_code(ErrorCode::MethodNotFound),
                echoed,
            ));
        };
        match (id_field.is_some(), procedure.kind()) {
            (true, ProcedureKind::Notification) => {
                return Some(V2Response::error(
                    ErrorObject::from_code(ErrorCode::ProcedureIsNotification),
                    echoed,
                ));
            }
            (false, ProcedureKind::Method) => {
                return Some(V2Response::error(
                    ErrorObject::from_code(ErrorCode::ProcedureIsMethod),
                    Id::Null,
                ));
            }
            _ => {}
        }

        let params = fields.get("params").unwrap_or(&Value::Null);
        if !procedure.validate_params(params) {
            return Some(V2Response::error(
                ErrorObject::from_code(ErrorCode::InvalidParams),
                echoed,
            ));
        }

        tracing::debug!(method, "dispatching v2 request");
        match handler {
            HandlerRef::Method(f) => Some(match f(params) {
                Ok(result) => V2Response::success(result, echoed),
                Err(Error::JsonRpc(error)) => V2Response::error(error, echoed),
                Err(other) => {
                    tracing::error!(method, error = %other, "method handler failed");
                    V2Response::error(ErrorObject::from_code(ErrorCode::InternalError), echoed)
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

impl ClientConnectionHandler for V2Engine {
    fn handle_request(&self, request: &str) -> String {
        self.handle(request)
    }
}

fn invalid_request() -> V2Response {
    V2Response::error(ErrorObject::from_code(ErrorCode::InvalidRequest), Id::Null)
}

/// Structural validation of a v2 request object.
///
/// Required: `jsonrpc` equal to `"2.0"` and a string `method`. Optional:
/// an `id` that is an integer, string or null, and a `params` that is an
/// object, array or null.
fn fields_are_valid(fields: &Map<String, Value>) -> bool {
    if fields.get("jsonrpc").and_then(Value::as_str) != Some(jarpc_core::JSONRPC_VERSION) {
        return false;
    }
    if !fields.get("method").is_some_and(Value::is_string) {
        return false;
    }
    if let Some(id) = fields.get("id") {
        if !(id.is_null() || id.is_string() || id.as_i64().is_some()) {
            return false;
        }
    }
    if let Some(params) = fields.get("params") {
        if !(params.is_object() || params.is_array() || params.is_null()) {
            return false;
        }
    }
    true
}
