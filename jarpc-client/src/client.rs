//! Blocking JSON-RPC client
//!
//! [`Client`] ties a [`ClientEngine`] to a [`ClientTransport`]: build the
//! request, push it through the transport, decode what comes back. It is
//! the piece user code talks to; the engine and transport stay swappable
//! underneath.
//!
//! # Examples
//!
//! ```rust,no_run
//! use jarpc_client::{Client, LoopbackTransport};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # fn demo(transport: Arc<LoopbackTransport>) -> jarpc_core::Result<()> {
//! let client = Client::new(transport);
//! let sum = client.call("add", &json!([5, 7]))?;
//! assert_eq!(sum, json!(12));
//! client.notify("initCounter", &json!({"value": 33}))?;
//! # Ok(())
//! # }
//! ```

use crate::batch::{BatchCall, BatchResponse};
use crate::protocol::ClientEngine;
use jarpc_core::{ClientTransport, Error, ProtocolVersion, Result};
use serde_json::Value;
use std::sync::Arc;

/// Blocking client over a pluggable transport.
pub struct Client {
    transport: Arc<dyn ClientTransport>,
    engine: ClientEngine,
}

impl Client {
    /// JSON-RPC 2.0 client over the given transport.
    pub fn new(transport: Arc<dyn ClientTransport>) -> Self {
        Self::with_version(transport, ProtocolVersion::V2)
    }

    /// Client speaking the given protocol revision.
    pub fn with_version(transport: Arc<dyn ClientTransport>, version: ProtocolVersion) -> Self {
        Self {
            transport,
            engine: ClientEngine::new(version),
        }
    }

    /// Call a method and return its result value.
    pub fn call(&self, method: &str, params: &Value) -> Result<Value> {
        let request = self.engine.build_request(method, params, false)?;
        tracing::debug!(method, "sending method call");
        let response = self.send(&request)?;
        self.engine.parse_response(&response)
    }

    /// Send a notification; no response is expected or read.
    pub fn notify(&self, method: &str, params: &Value) -> Result<()> {
        let request = self.engine.build_request(method, params, true)?;
        tracing::debug!(method, "sending notification");
        self.send(&request)?;
        Ok(())
    }

    /// Send a batch and return the id-keyed responses.
    pub fn call_batch(&self, batch: &BatchCall) -> Result<BatchResponse> {
        let request = batch.to_json()?;
        tracing::debug!(entries = batch.len(), "sending batch");
        let response = self.send(&request)?;
        self.engine.parse_batch_response(&response)
    }

    /// Reset the request-id counter to 1.
    pub fn reset_id(&self) {
        self.engine.reset_id();
    }

    /// The protocol engine driving this client.
    pub fn engine(&self) -> &ClientEngine {
        &self.engine
    }

    /// Deliver a request, normalizing transport failures to connector
    /// errors at the engine boundary.
    fn send(&self, request: &str) -> Result<String> {
        self.transport.send_rpc_message(request).map_err(|error| match error {
            Error::Connector(_) => error,
            other => Error::Connector(other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// Canned-response transport that records the last request sent.
    struct ScriptedTransport {
        response: Mutex<String>,
        last_request: Mutex<String>,
        fail: bool,
    }

    impl ScriptedTransport {
        fn replying(response: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Mutex::new(response.to_string()),
                last_request: Mutex::new(String::new()),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                response: Mutex::new(String::new()),
                last_request: Mutex::new(String::new()),
                fail: true,
            })
        }

        fn last_request(&self) -> Value {
            serde_json::from_str(&self.last_request.lock().unwrap()).unwrap()
        }
    }

    impl ClientTransport for ScriptedTransport {
        fn send_rpc_message(&self, request: &str) -> Result<String> {
            if self.fail {
                return Err(Error::Connector("connection refused".to_string()));
            }
            *self.last_request.lock().unwrap() = request.to_string();
            Ok(self.response.lock().unwrap().clone())
        }
    }

    #[test]
    fn call_round_trip() {
        let transport = ScriptedTransport::replying(r#"{"jsonrpc":"2.0","id":1,"result":23}"#);
        let client = Client::new(Arc::clone(&transport) as Arc<dyn ClientTransport>);
        let result = client.call("abcd", &json!([23])).unwrap();
        assert_eq!(result, json!(23));

        let sent = transport.last_request();
        assert_eq!(sent["method"], json!("abcd"));
        assert_eq!(sent["params"], json!([23]));
        assert_eq!(sent["id"], json!(1));
    }

    #[test]
    fn notify_sends_without_reading_a_response() {
        let transport = ScriptedTransport::replying("");
        let client = Client::new(Arc::clone(&transport) as Arc<dyn ClientTransport>);
        client.notify("tick", &json!({"n": 1})).unwrap();
        let sent = transport.last_request();
        assert!(sent.get("id").is_none());
    }

    #[test]
    fn transport_failures_surface_as_connector_errors() {
        let transport = ScriptedTransport::failing();
        let client = Client::new(transport as Arc<dyn ClientTransport>);
        let err = client.call("abcd", &Value::Null).unwrap_err();
        assert_eq!(err.code(), -32003);
    }

    #[test]
    fn v1_client_builds_v1_requests() {
        let transport = ScriptedTransport::replying(r#"{"id":1,"result":5,"error":null}"#);
        let client = Client::with_version(
            Arc::clone(&transport) as Arc<dyn ClientTransport>,
            ProtocolVersion::V1,
        );
        let result = client.call("sub", &json!([7, 2])).unwrap();
        assert_eq!(result, json!(5));
        let sent = transport.last_request();
        assert!(sent.get("jsonrpc").is_none());
        assert_eq!(sent["id"], json!(1));
    }

    #[test]
    fn batch_round_trip() {
        let transport = ScriptedTransport::replying(
            r#"[{"jsonrpc":"2.0","id":1,"result":3},{"jsonrpc":"2.0","id":2,"result":7}]"#,
        );
        let client = Client::new(Arc::clone(&transport) as Arc<dyn ClientTransport>);

        let mut batch = BatchCall::new();
        let first = batch.add_call("add", json!([1, 2]));
        batch.add_notification("tick", Value::Null);
        let second = batch.add_call("add", json!([3, 4]));

        let responses = client.call_batch(&batch).unwrap();
        assert_eq!(
            responses.result_for(&jarpc_core::Id::Number(first)),
            Some(&json!(3))
        );
        assert_eq!(
            responses.result_for(&jarpc_core::Id::Number(second)),
            Some(&json!(7))
        );

        let sent = transport.last_request();
        assert_eq!(sent.as_array().unwrap().len(), 3);
    }
}
