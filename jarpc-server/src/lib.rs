//! Server-side JSON-RPC 1.0/2.0 protocol engines for jarpc
//!
//! This crate turns a populated [`ProcedureRegistry`] into a serving
//! endpoint. Three engines cover the protocol revisions:
//!
//! - [`V2Engine`]: JSON-RPC 2.0, including batch requests
//! - [`V1Engine`]: JSON-RPC 1.0
//! - [`HybridEngine`]: autodetects the revision per message
//!
//! Every engine implements
//! [`ClientConnectionHandler`](jarpc_core::ClientConnectionHandler), the
//! per-message entry point a server transport calls: hand it the request
//! string, send back whatever non-empty string it returns. The engines
//! are synchronous and shared-state-free per request; transports decide
//! how many threads call into them.
//!
//! # Quick start
//!
//! ```rust
//! use jarpc_core::{JsonType, ParamStyle, Procedure};
//! use jarpc_server::{typed_method_fn, ProcedureRegistry, V2Engine};
//! use serde::Deserialize;
//! use std::sync::Arc;
//!
//! #[derive(Deserialize)]
//! struct AddParams {
//!     value1: i64,
//!     value2: i64,
//! }
//!
//! let mut registry = ProcedureRegistry::new();
//! registry
//!     .add(
//!         Procedure::method("add", ParamStyle::ByName, JsonType::Integer)
//!             .with_param("value1", JsonType::Integer)
//!             .with_param("value2", JsonType::Integer),
//!         typed_method_fn(|p: AddParams| Ok(p.value1 + p.value2)),
//!     )
//!     .unwrap();
//!
//! let engine = V2Engine::new(Arc::new(registry));
//! let response =
//!     engine.handle(r#"{"jsonrpc":"2.0","id":1,"method":"add","params":{"value1":5,"value2":7}}"#);
//! assert!(response.contains("\"result\":12"));
//! ```

pub mod handler;
pub mod hybrid;
pub mod registry;
pub mod v1;
pub mod v2;

pub use handler::{
    method_fn, notification_fn, typed_method_fn, HandlerRef, MethodFn, NotificationFn,
    RequestHandler,
};
pub use hybrid::HybridEngine;
pub use registry::ProcedureRegistry;
pub use v1::V1Engine;
pub use v2::V2Engine;

use serde::Serialize;

/// Serialize a response payload to its wire string.
///
/// Serialization of the engine-built response types cannot fail for any
/// reachable value; if it ever does, the failure is logged and an empty
/// string (= no response) is returned rather than sending garbage.
pub(crate) fn encode_payload<T: Serialize>(payload: &T) -> String {
    match serde_json::to_string(payload) {
        Ok(text) => text,
        Err(error) => {
            tracing::error!(error = %error, "failed to serialize response payload");
            String::new()
        }
    }
}
