//! Procedure registry
//!
//! The registry maps procedure names to their typed descriptors and
//! handler references. It is the single lookup structure the protocol
//! engines consult on every dispatch.
//!
//! A registry is built once before an engine starts serving; insertion is
//! the only mutation, and after construction engines share it behind an
//! `Arc` and read it lock-free from any thread. Dynamic registration
//! while serving is deliberately unsupported.
//!
//! # Examples
//!
//! ```rust
//! use jarpc_core::{JsonType, ParamStyle, Procedure};
//! use jarpc_server::{method_fn, ProcedureRegistry};
//! use serde_json::json;
//!
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
//!
//! assert!(registry.lookup("sayHello").is_some());
//! ```

use crate::handler::{HandlerRef, RequestHandler};
use jarpc_core::procedure::{Procedure, ProcedureKind};
use jarpc_core::{specification, Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Name → (descriptor, handler) mapping with insertion order retained.
///
/// Insertion order matters to [`to_specification`](Self::to_specification),
/// which publishes procedures in the order they were registered.
#[derive(Debug, Default)]
pub struct ProcedureRegistry {
    order: Vec<String>,
    entries: HashMap<String, (Procedure, HandlerRef)>,
}

impl ProcedureRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a procedure with its handler.
    ///
    /// Fails with [`Error::DuplicateProcedure`] when the name is already
    /// taken and with [`Error::Registration`] when the handler variant
    /// does not match the procedure kind.
    pub fn add(&mut self, procedure: Procedure, handler: HandlerRef) -> Result<()> {
        if self.entries.contains_key(procedure.name()) {
            return Err(Error::DuplicateProcedure(procedure.name().to_string()));
        }
        if procedure.kind() != handler.kind() {
            return Err(Error::Registration(format!(
                "handler kind does not match procedure kind for {}",
                procedure.name()
            )));
        }
        self.order.push(procedure.name().to_string());
        self.entries
            .insert(procedure.name().to_string(), (procedure, handler));
        Ok(())
    }

    /// Register a method procedure with a closure.
    pub fn add_method<F>(&mut self, procedure: Procedure, f: F) -> Result<()>
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.add(procedure, crate::handler::method_fn(f))
    }

    /// Register a notification procedure with a closure.
    pub fn add_notification<F>(&mut self, procedure: Procedure, f: F) -> Result<()>
    where
        F: Fn(&Value) -> Result<()> + Send + Sync + 'static,
    {
        self.add(procedure, crate::handler::notification_fn(f))
    }

    /// Build a registry routing every procedure through one handler object.
    pub fn with_handler(
        procedures: Vec<Procedure>,
        handler: Arc<dyn RequestHandler>,
    ) -> Result<Self> {
        let mut registry = Self::new();
        for procedure in procedures {
            let name = procedure.name().to_string();
            let handler_ref = match procedure.kind() {
                ProcedureKind::Method => {
                    let handler = Arc::clone(&handler);
                    crate::handler::method_fn(move |params| handler.handle_method(&name, params))
                }
                ProcedureKind::Notification => {
                    let handler = Arc::clone(&handler);
                    crate::handler::notification_fn(move |params| {
                        handler.handle_notification(&name, params)
                    })
                }
            };
            registry.add(procedure, handler_ref)?;
        }
        Ok(registry)
    }

    /// Build a registry from a specification document, routing every
    /// procedure through one handler object.
    pub fn from_specification(text: &str, handler: Arc<dyn RequestHandler>) -> Result<Self> {
        Self::with_handler(specification::parse_str(text)?, handler)
    }

    /// Publish the registered procedures as a specification document.
    pub fn to_specification(&self) -> Result<String> {
        specification::to_string(self.iter())
    }

    /// Descriptor for a name, if registered.
    pub fn lookup(&self, name: &str) -> Option<&Procedure> {
        self.entries.get(name).map(|(procedure, _)| procedure)
    }

    /// Handler for a name, if registered.
    pub fn handler_for(&self, name: &str) -> Option<&HandlerRef> {
        self.entries.get(name).map(|(_, handler)| handler)
    }

    /// Descriptor and handler for a name, if registered.
    pub fn get(&self, name: &str) -> Option<(&Procedure, &HandlerRef)> {
        self.entries
            .get(name)
            .map(|(procedure, handler)| (procedure, handler))
    }

    /// True when a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterate descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Procedure> {
        self.order
            .iter()
            .filter_map(|name| self.entries.get(name).map(|(procedure, _)| procedure))
    }

    /// Number of registered procedures.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{method_fn, notification_fn};
    use jarpc_core::{JsonType, ParamStyle};
    use serde_json::json;

    fn sample_method() -> Procedure {
        Procedure::method("m", ParamStyle::ByName, JsonType::Integer)
    }

    #[test]
    fn add_and_lookup() {
        let mut registry = ProcedureRegistry::new();
        registry
            .add(sample_method(), method_fn(|_| Ok(json!(1))))
            .unwrap();
        assert!(registry.contains("m"));
        assert_eq!(registry.lookup("m").unwrap().name(), "m");
        assert!(registry.handler_for("m").is_some());
        assert!(registry.lookup("nope").is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = ProcedureRegistry::new();
        registry
            .add(sample_method(), method_fn(|_| Ok(json!(1))))
            .unwrap();
        let err = registry
            .add(sample_method(), method_fn(|_| Ok(json!(2))))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateProcedure(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let mut registry = ProcedureRegistry::new();
        let err = registry
            .add(sample_method(), notification_fn(|_| Ok(())))
            .unwrap_err();
        assert!(matches!(err, Error::Registration(_)));

        let err = registry
            .add(
                Procedure::notification("n", ParamStyle::ByName),
                method_fn(|_| Ok(json!(1))),
            )
            .unwrap_err();
        assert!(matches!(err, Error::Registration(_)));
    }

    #[test]
    fn iteration_preserves_registration_order() {
        let mut registry = ProcedureRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry
                .add_method(
                    Procedure::method(name, ParamStyle::ByName, JsonType::Null),
                    |_| Ok(Value::Null),
                )
                .unwrap();
        }
        let names: Vec<&str> = registry.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn with_handler_routes_by_name() {
        struct Service;
        impl RequestHandler for Service {
            fn handle_method(&self, name: &str, _params: &Value) -> Result<Value> {
                Ok(json!(format!("ran {}", name)))
            }
            fn handle_notification(&self, _name: &str, _params: &Value) -> Result<()> {
                Ok(())
            }
        }

        let registry = ProcedureRegistry::with_handler(
            vec![
                Procedure::method("a", ParamStyle::ByName, JsonType::String),
                Procedure::notification("b", ParamStyle::ByName),
            ],
            Arc::new(Service),
        )
        .unwrap();

        let Some(HandlerRef::Method(f)) = registry.handler_for("a") else {
            panic!("expected a method handler for a");
        };
        assert_eq!(f(&Value::Null).unwrap(), json!("ran a"));
        assert!(matches!(
            registry.handler_for("b"),
            Some(HandlerRef::Notification(_))
        ));
    }

    #[test]
    fn specification_round_trip_through_registry() {
        struct Noop;
        impl RequestHandler for Noop {
            fn handle_method(&self, _: &str, _: &Value) -> Result<Value> {
                Ok(Value::Null)
            }
            fn handle_notification(&self, _: &str, _: &Value) -> Result<()> {
                Ok(())
            }
        }

        let text = r#"[
            {"name": "sayHello", "params": {"name": "somestring"}, "returns": "somestring"},
            {"name": "initCounter", "params": {"value": 1}}
        ]"#;
        let registry = ProcedureRegistry::from_specification(text, Arc::new(Noop)).unwrap();
        assert_eq!(registry.len(), 2);

        let published = registry.to_specification().unwrap();
        let reread = specification::parse_str(&published).unwrap();
        let names: Vec<&str> = reread.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["sayHello", "initCounter"]);
    }
}
