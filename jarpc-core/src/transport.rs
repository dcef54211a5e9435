//! The transport boundary
//!
//! The protocol engines are transport-agnostic: they consume a request
//! string and produce a response string, nothing more. Everything about
//! moving those strings (framing, delimiters, timeouts, TLS, connection
//! concurrency, URL routing) belongs to a transport implementation
//! behind the three narrow traits below.
//!
//! On the server side a transport drives one or more
//! [`ClientConnectionHandler`]s (every protocol engine is one); on the
//! client side a transport is anything that can deliver a request string
//! and return the matching response string.

use crate::error::Result;
use std::sync::Arc;

/// Per-message entry point a server transport calls into.
///
/// Implementations must be callable from whatever thread the transport
/// supplies, concurrently and without external locking. An empty return
/// string means "no response" (the message was a notification, or a batch
/// consisting solely of notifications) and the transport must not send
/// anything back for it.
pub trait ClientConnectionHandler: Send + Sync {
    /// Process one inbound message and return the serialized response,
    /// or an empty string when the message produces none.
    fn handle_request(&self, request: &str) -> String;
}

impl<T: ClientConnectionHandler + ?Sized> ClientConnectionHandler for Arc<T> {
    fn handle_request(&self, request: &str) -> String {
        (**self).handle_request(request)
    }
}

/// Lifecycle contract of a server-side transport.
///
/// A transport owns its listening resources: they are acquired in
/// [`start_listening`](ServerTransport::start_listening) and released in
/// [`stop_listening`](ServerTransport::stop_listening) or on drop.
/// Handlers are registered before listening starts; a transport may keep
/// several and select one per inbound message, for example by URL path;
/// the engines are oblivious to that choice.
pub trait ServerTransport {
    /// Begin accepting messages. Returns false when the transport could
    /// not be brought up (port taken, socket path unavailable, …).
    fn start_listening(&mut self) -> bool;

    /// Stop accepting messages and release the listening resources.
    /// Returns false when the transport was not listening.
    fn stop_listening(&mut self) -> bool;

    /// Register a connection handler with this transport.
    fn add_connection_handler(&mut self, handler: Arc<dyn ClientConnectionHandler>);
}

/// Client-side transport: deliver one request, return its response.
///
/// The returned string must correspond 1:1 to the sent request (batch
/// responses arrive as a single string). Delivery failures are reported
/// as [`Error::Connector`](crate::Error::Connector); the client engine
/// translates anything else an implementation returns into a connector
/// error at its boundary.
pub trait ClientTransport: Send + Sync {
    /// Send a serialized request and return the serialized response.
    fn send_rpc_message(&self, request: &str) -> Result<String>;
}
