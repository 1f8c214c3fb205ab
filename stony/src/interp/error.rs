//! Runtime errors for the evaluator

use std::fmt;

/// Fault that aborts the evaluation of one submission
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
}

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Value shape the binder should have ruled out
    TypeError,
    /// Integer `/` or `%` by zero
    DivisionByZero,
    /// String could not be parsed as the target type
    ConversionFailed,
    /// Store has no slot for a variable
    UndefinedVariable,
    /// Jump to a label that is not in the program
    UndefinedLabel,
    /// Built-in called outside its domain
    InvalidArgument,
    /// Structured statement reached the evaluator
    UnexpectedNode,
    /// IO error
    IoError,
}

impl RuntimeError {
    pub fn type_error(expected: &str, got: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::TypeError,
            message: format!("type error: expected {expected}, got {got}"),
        }
    }

    pub fn unsupported(op: impl fmt::Display, operands: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::TypeError,
            message: format!("operator '{op}' cannot be applied to {operands}"),
        }
    }

    pub fn division_by_zero() -> Self {
        RuntimeError {
            kind: ErrorKind::DivisionByZero,
            message: "division by zero".to_string(),
        }
    }

    pub fn conversion_failed(value: &str, target: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::ConversionFailed,
            message: format!("cannot convert {value:?} to {target}"),
        }
    }

    pub fn undefined_variable(name: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::UndefinedVariable,
            message: format!("undefined variable: {name}"),
        }
    }

    pub fn undefined_label(label: impl fmt::Display) -> Self {
        RuntimeError {
            kind: ErrorKind::UndefinedLabel,
            message: format!("undefined label: {label}"),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        RuntimeError {
            kind: ErrorKind::InvalidArgument,
            message: message.into(),
        }
    }

    pub fn unexpected_node(kind: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::UnexpectedNode,
            message: format!("unexpected node: {kind}"),
        }
    }

    pub fn io_error(msg: &str) -> Self {
        RuntimeError {
            kind: ErrorKind::IoError,
            message: format!("IO error: {msg}"),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Runtime error: {}", self.message)
    }
}

impl std::error::Error for RuntimeError {}

impl From<std::io::Error> for RuntimeError {
    fn from(err: std::io::Error) -> Self {
        RuntimeError::io_error(&err.to_string())
    }
}

/// Result type for evaluator operations
pub type EvalResult<T> = Result<T, RuntimeError>;
