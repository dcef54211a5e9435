//! Core JSON-RPC 1.0/2.0 types, validation and codecs for jarpc
//!
//! This crate is the foundation the `jarpc-server` and `jarpc-client`
//! crates build on. It provides:
//!
//! - **Wire types**: request/response envelopes for both protocol
//!   revisions, the [`Id`] sum type and the [`JsonType`] declaration tags
//! - **Procedure descriptors**: typed declarations with parameter
//!   validation ([`Procedure`])
//! - **Error taxonomy**: the protocol code table ([`ErrorCode`]), the
//!   wire error envelope ([`ErrorObject`]) and the application
//!   [`Error`] enum
//! - **Specification codec**: reading and writing machine-readable
//!   procedure descriptions ([`specification`])
//! - **Transport boundary**: the traits every transport implements
//!   ([`transport`])
//!
//! The JSON value model is `serde_json::Value`; all components speak it
//! exclusively. Nothing in this crate performs IO beyond the
//! specification file helpers, and nothing blocks: concurrency is the
//! business of transports.

pub mod error;
pub mod procedure;
pub mod specification;
pub mod transport;
pub mod types;

pub use error::{Error, ErrorCode, ErrorObject, Result, SERVER_ERROR_RANGE};
pub use procedure::{ParamStyle, Parameter, Procedure, ProcedureKind};
pub use transport::{ClientConnectionHandler, ClientTransport, ServerTransport};
pub use types::{
    Id, JsonType, ProtocolVersion, V1Request, V1Response, V2Request, V2Response, JSONRPC_VERSION,
};
