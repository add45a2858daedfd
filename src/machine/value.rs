//! Runtime value representation for the CSE machine.

use std::fmt;

use crate::standardize::BoundVars;

use super::env::EnvRef;

/// A lambda paired with the environment it was created in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Closure {
    pub delta: usize,
    pub vars: BoundVars,
    pub env: EnvRef,
}

/// Built-in function tags.
///
/// `ConcWith` is the intermediate state of the curried `Conc`: the first
/// string has been applied, the second is still pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Builtin {
    Print,
    Conc,
    ConcWith(String),
    Stem,
    Stern,
    Order,
    Null,
    Isinteger,
    Isstring,
    Istruthvalue,
    Isfunction,
    Istuple,
    Isdummy,
    ItoS,
}

impl Builtin {
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Print => "Print",
            Builtin::Conc | Builtin::ConcWith(_) => "Conc",
            Builtin::Stem => "Stem",
            Builtin::Stern => "Stern",
            Builtin::Order => "Order",
            Builtin::Null => "Null",
            Builtin::Isinteger => "Isinteger",
            Builtin::Isstring => "Isstring",
            Builtin::Istruthvalue => "Istruthvalue",
            Builtin::Isfunction => "Isfunction",
            Builtin::Istuple => "Istuple",
            Builtin::Isdummy => "Isdummy",
            Builtin::ItoS => "ItoS",
        }
    }
}

/// A value on the machine stack or in an environment frame.
///
/// The empty tuple is `nil`; there is no separate nil variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Str(String),
    Truth(bool),
    Tuple(Vec<Value>),
    Dummy,
    Closure(Closure),
    /// Pending fixed point: wraps the closure `Y*` was applied to.
    Eta(Closure),
    Builtin(Builtin),
    /// The fixed-point combinator itself, before application.
    Ystar,
}

impl Value {
    pub fn nil() -> Value {
        Value::Tuple(Vec::new())
    }

    /// Short kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Str(_) => "string",
            Value::Truth(_) => "truthvalue",
            Value::Tuple(t) if t.is_empty() => "nil",
            Value::Tuple(_) => "tuple",
            Value::Dummy => "dummy",
            Value::Closure(_) | Value::Eta(_) | Value::Builtin(_) | Value::Ystar => "function",
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(
            self,
            Value::Closure(_) | Value::Eta(_) | Value::Builtin(_) | Value::Ystar
        )
    }

    /// Rendering used by `Print` and by diagnostics.
    pub fn render(&self) -> String {
        match self {
            Value::Integer(value) => value.to_string(),
            Value::Str(value) => value.clone(),
            Value::Truth(true) => "true".to_string(),
            Value::Truth(false) => "false".to_string(),
            Value::Tuple(elements) if elements.is_empty() => "nil".to_string(),
            Value::Tuple(elements) => {
                let rendered: Vec<String> = elements.iter().map(Value::render).collect();
                format!("({})", rendered.join(", "))
            }
            Value::Dummy => "dummy".to_string(),
            Value::Closure(closure) | Value::Eta(closure) => {
                format!("[lambda closure: {}]", closure.vars)
            }
            Value::Builtin(builtin) => format!("[builtin: {}]", builtin.name()),
            Value::Ystar => "[Y*]".to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}
