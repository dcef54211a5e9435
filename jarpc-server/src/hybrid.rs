//! Hybrid v1/v2 server engine
//!
//! [`HybridEngine`] serves both protocol revisions on one endpoint by
//! inspecting each message: a JSON array, or an object whose `jsonrpc`
//! member equals `"2.0"`, goes to the 2.0 engine; any other parseable
//! value goes to the 1.0 engine. Both engines share one registry, so a
//! procedure registered once is callable in either dialect, and each
//! input is answered in its own dialect's shape.
//!
//! A message that does not parse at all has no detectable dialect and is
//! answered with a 2.0-shaped parse error.

use crate::registry::ProcedureRegistry;
use crate::v1::V1Engine;
use crate::v2::V2Engine;
use jarpc_core::{ClientConnectionHandler, ErrorCode, ErrorObject, Id, V2Response, JSONRPC_VERSION};
use serde_json::Value;
use std::sync::Arc;

/// Per-message autodetecting engine over a shared registry.
pub struct HybridEngine {
    v1: V1Engine,
    v2: V2Engine,
}

impl HybridEngine {
    /// Create a hybrid engine; both inner engines share `registry`.
    pub fn new(registry: Arc<ProcedureRegistry>) -> Self {
        Self {
            v1: V1Engine::new(Arc::clone(&registry)),
            v2: V2Engine::new(registry),
        }
    }

    /// The registry both inner engines dispatch against.
    pub fn registry(&self) -> &Arc<ProcedureRegistry> {
        self.v2.registry()
    }

    /// Process one request string in whichever dialect it is shaped in.
    pub fn handle(&self, request: &str) -> String {
        match serde_json::from_str::<Value>(request) {
            Ok(message) if is_v2_shaped(&message) => self.v2.handle_value(&message),
            Ok(message) => self.v1.handle_value(&message),
            Err(_) => crate::encode_payload(&V2Response::error(
                ErrorObject::from_code(ErrorCode::ParseError),
                Id::Null,
            )),
        }
    }
}

impl ClientConnectionHandler for HybridEngine {
    fn handle_request(&self, request: &str) -> String {
        self.handle(request)
    }
}

fn is_v2_shaped(message: &Value) -> bool {
    message.is_array()
        || message.get("jsonrpc").and_then(Value::as_str) == Some(JSONRPC_VERSION)
}
