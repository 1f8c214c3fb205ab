//! Runtime values for the evaluator

use crate::symbols::TypeSymbol;
use crate::syntax::Literal;
use std::fmt;

/// Runtime value
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    /// 64-bit integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    Str(String),
    /// Result of a call to a `void` built-in, and of a program that produced nothing
    Void,
}

impl Value {
    /// Runtime tag as a type symbol
    pub fn type_of(&self) -> TypeSymbol {
        match self {
            Value::Bool(_) => TypeSymbol::Bool,
            Value::Int(_) => TypeSymbol::Int,
            Value::Float(_) => TypeSymbol::Float,
            Value::Str(_) => TypeSymbol::String,
            Value::Void => TypeSymbol::Void,
        }
    }

    /// Get type name for error messages
    pub fn type_name(&self) -> &'static str {
        self.type_of().name()
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value, promoting integers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Value::Void)
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(n) => Value::Int(*n),
            Literal::Float(x) => Value::Float(*x),
            Literal::Str(s) => Value::Str(s.clone()),
        }
    }
}

/// The `stringify` form: lowercase booleans, `.` as decimal separator
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => f.write_str(s),
            Value::Void => Ok(()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Void, Value::Void) => true,
            _ => false,
        }
    }
}
