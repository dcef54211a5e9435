//! Procedure descriptors and parameter validation
//!
//! A [`Procedure`] is the typed declaration of a callable endpoint: its
//! name, whether it is a method (expects a response) or a notification
//! (must not produce one), how parameters are passed (by name or by
//! position), the ordered parameter list, and, for methods, the return
//! type.
//!
//! Descriptors are plain values. They are built once, registered with a
//! server registry or written into a specification document, and consulted
//! on every dispatch via [`Procedure::validate_params`].

use crate::types::JsonType;
use serde_json::Value;

/// Whether a procedure answers its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcedureKind {
    /// Expects a response; carries a declared return type.
    Method,
    /// Fire-and-forget; never produces a response.
    Notification,
}

/// How a procedure's parameters are passed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamStyle {
    /// Parameters arrive as a JSON object keyed by parameter name.
    ByName,
    /// Parameters arrive as a JSON array in declaration order.
    ByPosition,
}

/// One declared parameter: a name and its expected scalar type.
///
/// For by-position procedures the name is synthetic (`param01`, `param02`,
/// …) and the declaration order is authoritative.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub json_type: JsonType,
}

/// Typed declaration of a named procedure.
///
/// # Invariants
///
/// - A method always carries a return type, a notification never does;
///   the two constructors make the wrong combination unrepresentable.
/// - Parameter names are unique; re-declaring a name replaces its type
///   in place rather than appending a duplicate.
///
/// # Examples
///
/// ```rust
/// use jarpc_core::{JsonType, ParamStyle, Procedure};
///
/// let say_hello = Procedure::method("sayHello", ParamStyle::ByName, JsonType::String)
///     .with_param("name", JsonType::String);
///
/// let init = Procedure::notification("initCounter", ParamStyle::ByName)
///     .with_param("value", JsonType::Integer);
///
/// assert!(say_hello.validate_params(&serde_json::json!({"name": "Peter"})));
/// assert!(!init.validate_params(&serde_json::json!({"value": "nope"})));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Procedure {
    name: String,
    kind: ProcedureKind,
    param_style: ParamStyle,
    params: Vec<Parameter>,
    return_type: Option<JsonType>,
}

impl Procedure {
    /// Declare a method with the given parameter style and return type.
    pub fn method(name: impl Into<String>, param_style: ParamStyle, return_type: JsonType) -> Self {
        Self {
            name: name.into(),
            kind: ProcedureKind::Method,
            param_style,
            params: Vec::new(),
            return_type: Some(return_type),
        }
    }

    /// Declare a notification with the given parameter style.
    pub fn notification(name: impl Into<String>, param_style: ParamStyle) -> Self {
        Self {
            name: name.into(),
            kind: ProcedureKind::Notification,
            param_style,
            params: Vec::new(),
            return_type: None,
        }
    }

    /// Append a parameter declaration.
    ///
    /// Declaring an existing name again replaces its type in place, so the
    /// parameter list never contains duplicates.
    pub fn with_param(mut self, name: impl Into<String>, json_type: JsonType) -> Self {
        let name = name.into();
        if let Some(existing) = self.params.iter_mut().find(|p| p.name == name) {
            existing.json_type = json_type;
        } else {
            self.params.push(Parameter { name, json_type });
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ProcedureKind {
        self.kind
    }

    pub fn param_style(&self) -> ParamStyle {
        self.param_style
    }

    /// The ordered parameter declarations.
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// Declared return type; present iff this is a method.
    pub fn return_type(&self) -> Option<JsonType> {
        self.return_type
    }

    /// Validate an incoming `params` value against this declaration.
    ///
    /// - By-name: `params` must be an object containing every declared
    ///   name with a value of the declared type. Unknown extra keys are
    ///   tolerated.
    /// - By-position: `params` must be an array whose length equals the
    ///   declared count, element types matching in order.
    /// - `null` stands for an empty object/array and validates exactly
    ///   when no parameters are declared.
    ///
    /// Pure check: total over every input value, never mutates anything.
    pub fn validate_params(&self, params: &Value) -> bool {
        match (params, self.param_style) {
            (Value::Null, _) => self.params.is_empty(),
            (Value::Object(fields), ParamStyle::ByName) => self.params.iter().all(|p| {
                fields
                    .get(&p.name)
                    .map(|v| p.json_type.matches(v))
                    .unwrap_or(false)
            }),
            (Value::Array(items), ParamStyle::ByPosition) => {
                items.len() == self.params.len()
                    && self
                        .params
                        .iter()
                        .zip(items)
                        .all(|(p, v)| p.json_type.matches(v))
            }
            _ => false,
        }
    }
}
