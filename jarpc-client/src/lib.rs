//! Client-side JSON-RPC 1.0/2.0 protocol engine for jarpc
//!
//! This crate provides everything a caller needs on its side of the
//! wire:
//!
//! - [`ClientEngine`]: request building, id management and response
//!   decoding for either protocol revision
//! - [`BatchCall`] / [`BatchResponse`]: JSON-RPC 2.0 batch construction
//!   and id-keyed result access
//! - [`Client`]: a blocking convenience wrapper over any
//!   [`ClientTransport`](jarpc_core::ClientTransport)
//! - [`LoopbackTransport`]: the in-process transport, for embedding and
//!   for tests
//!
//! Failures are typed, never protocol envelopes: a server's error
//! envelope surfaces as `Error::JsonRpc` with its code, message and
//! data; transport trouble surfaces as `Error::Connector` (-32003); a
//! malformed reply surfaces as `Error::InvalidResponse` (-32001).

pub mod batch;
pub mod client;
pub mod loopback;
pub mod protocol;

pub use batch::{BatchCall, BatchResponse};
pub use client::Client;
pub use loopback::LoopbackTransport;
pub use protocol::ClientEngine;
