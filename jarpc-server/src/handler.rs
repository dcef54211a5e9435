//! Handler abstractions for procedure invocation
//!
//! Two complementary ways to supply procedure implementations:
//!
//! 1. [`RequestHandler`]: one object handling every procedure of a
//!    service, routed by name. The natural choice when the procedure set
//!    is closed and the implementation is a single struct.
//! 2. [`HandlerRef`] closures built with [`method_fn`],
//!    [`notification_fn`] or [`typed_method_fn`]: one closure per
//!    procedure. The natural choice for open, piecemeal registration.
//!
//! The registry stores [`HandlerRef`]s either way; a [`RequestHandler`]
//! is adapted into per-procedure closures at registration time.
//!
//! Handlers are invoked from whatever thread the transport supplies and
//! must therefore be `Send + Sync`. A handler may block; bounding handler
//! concurrency is the transport's job.
//!
//! # Error signaling
//!
//! A method handler fails by returning an [`Error`]. Returning
//! `Error::JsonRpc` forwards that exact envelope to the caller; this is
//! how server-defined errors (codes `-32000..=-32099`, optional `data`
//! payload) are raised:
//!
//! ```rust
//! use jarpc_core::{Error, ErrorObject};
//! use jarpc_server::method_fn;
//!
//! let handler = method_fn(|_params| {
//!     Err(Error::JsonRpc(ErrorObject::server(-32012, "account is frozen")))
//! });
//! ```
//!
//! Any other error variant is answered with the opaque InternalError
//! envelope; the detail is logged, not sent.

use jarpc_core::procedure::ProcedureKind;
use jarpc_core::{Error, ErrorCode, ErrorObject, Result};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A single object implementing every procedure of a service.
///
/// The registry routes invocations to it by procedure name. Both methods
/// receive the raw params value (`Value::Null` when the request carried
/// none) after registry validation has accepted its shape.
pub trait RequestHandler: Send + Sync {
    /// Execute a method and produce its result value.
    fn handle_method(&self, name: &str, params: &Value) -> Result<Value>;

    /// Execute a notification. Failures are logged by the engine and
    /// never reach the caller.
    fn handle_notification(&self, name: &str, params: &Value) -> Result<()>;
}

/// Shared reference to a method implementation.
pub type MethodFn = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>;

/// Shared reference to a notification implementation.
pub type NotificationFn = Arc<dyn Fn(&Value) -> Result<()> + Send + Sync>;

/// Non-owning reference to one procedure's implementation.
///
/// The variant must agree with the kind of the procedure it is registered
/// under; the registry enforces that at registration time.
#[derive(Clone)]
pub enum HandlerRef {
    /// Implementation of a method (produces a result).
    Method(MethodFn),
    /// Implementation of a notification (produces nothing).
    Notification(NotificationFn),
}

impl HandlerRef {
    /// The procedure kind this handler implements.
    pub fn kind(&self) -> ProcedureKind {
        match self {
            HandlerRef::Method(_) => ProcedureKind::Method,
            HandlerRef::Notification(_) => ProcedureKind::Notification,
        }
    }
}

impl fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerRef::Method(_) => f.write_str("HandlerRef::Method"),
            HandlerRef::Notification(_) => f.write_str("HandlerRef::Notification"),
        }
    }
}

/// Wrap a closure as a method handler.
pub fn method_fn<F>(f: F) -> HandlerRef
where
    F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
{
    HandlerRef::Method(Arc::new(f))
}

/// Wrap a closure as a notification handler.
pub fn notification_fn<F>(f: F) -> HandlerRef
where
    F: Fn(&Value) -> Result<()> + Send + Sync + 'static,
{
    HandlerRef::Notification(Arc::new(f))
}

/// Wrap a typed closure as a method handler.
///
/// Params are deserialized into `P` before the call and the return value
/// is serialized back to JSON afterwards. A params value that passes the
/// registry's scalar validation but does not fit `P` is answered with
/// InvalidParams.
///
/// # Examples
///
/// ```rust
/// use jarpc_server::typed_method_fn;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct AddParams {
///     value1: i64,
///     value2: i64,
/// }
///
/// let handler = typed_method_fn(|p: AddParams| Ok(p.value1 + p.value2));
/// ```
pub fn typed_method_fn<P, R, F>(f: F) -> HandlerRef
where
    P: serde::de::DeserializeOwned,
    R: serde::Serialize,
    F: Fn(P) -> Result<R> + Send + Sync + 'static,
{
    method_fn(move |params: &Value| {
        let typed: P = serde_json::from_value(params.clone())
            .map_err(|_| Error::JsonRpc(ErrorObject::from_code(ErrorCode::InvalidParams)))?;
        let result = f(typed)?;
        serde_json::to_value(result).map_err(|e| Error::Serialization(e.to_string()))
    })
}
