//! jarpc: a JSON-RPC 1.0/2.0 framework with pluggable transports
//!
//! This is the convenience crate that re-exports the jarpc sub-crates.
//! Depend on it when you want client and server functionality through a
//! single dependency.
//!
//! # Architecture
//!
//! - **jarpc-core**: wire types, procedure descriptors and validation,
//!   the error taxonomy, the specification codec, and the transport
//!   boundary traits
//! - **jarpc-server**: the procedure registry and the v1 / v2 / hybrid
//!   protocol engines
//! - **jarpc-client**: the client engine, batch calls, and a blocking
//!   client over any transport
//!
//! The engines are synchronous and transport-agnostic: a transport hands
//! them a request string and sends back whatever non-empty string they
//! return. Anything that can move strings (HTTP, TCP, Unix domain
//! sockets, or a direct in-process call) can carry them.
//!
//! # Quick start
//!
//! ```rust
//! use jarpc::client::{Client, LoopbackTransport};
//! use jarpc::core::{JsonType, ParamStyle, Procedure};
//! use jarpc::server::{method_fn, HybridEngine, ProcedureRegistry};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! // Server side: declare and implement a procedure.
//! let mut registry = ProcedureRegistry::new();
//! registry
//!     .add(
//!         Procedure::method("sayHello", ParamStyle::ByName, JsonType::String)
//!             .with_param("name", JsonType::String),
//!         method_fn(|params| {
//!             let name = params["name"].as_str().unwrap_or_default();
//!             Ok(json!(format!("Hello: {}!", name)))
//!         }),
//!     )
//!     .unwrap();
//! let engine = Arc::new(HybridEngine::new(Arc::new(registry)));
//!
//! // Client side: call it through the in-process transport.
//! let client = Client::new(Arc::new(LoopbackTransport::new(engine)));
//! let greeting = client.call("sayHello", &json!({"name": "Peter"})).unwrap();
//! assert_eq!(greeting, json!("Hello: Peter!"));
//! ```

pub use jarpc_client as client;
pub use jarpc_core as core;
pub use jarpc_server as server;

// Convenience re-exports of the most commonly used types
pub use jarpc_client::{BatchCall, BatchResponse, Client, ClientEngine, LoopbackTransport};
pub use jarpc_core::{
    Error, ErrorCode, ErrorObject, Id, JsonType, ParamStyle, Procedure, ProcedureKind,
    ProtocolVersion, Result,
};
pub use jarpc_server::{HybridEngine, ProcedureRegistry, V1Engine, V2Engine};
