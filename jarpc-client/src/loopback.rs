//! In-process transport
//!
//! [`LoopbackTransport`] is the degenerate transport: it hands each
//! request straight to a server-side connection handler in the same
//! process and returns whatever comes back. No sockets, no framing, no
//! concurrency of its own.
//!
//! It serves two purposes: embedding a server and its clients in one
//! binary, and exercising the full client/server pipeline in tests
//! without network plumbing.

use jarpc_core::{ClientConnectionHandler, ClientTransport, Result};
use std::sync::Arc;

/// Client transport that invokes a connection handler directly.
pub struct LoopbackTransport {
    handler: Arc<dyn ClientConnectionHandler>,
}

impl LoopbackTransport {
    /// Wrap a connection handler (typically a protocol engine).
    pub fn new(handler: Arc<dyn ClientConnectionHandler>) -> Self {
        Self { handler }
    }
}

impl ClientTransport for LoopbackTransport {
    fn send_rpc_message(&self, request: &str) -> Result<String> {
        Ok(self.handler.handle_request(request))
    }
}
