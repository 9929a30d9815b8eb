// ABOUTME: Error types for parsing and evaluation failures in the Lisp interpreter

use crate::value::Value;
use thiserror::Error;

// ===== Arity constant strings (eliminates allocations in error paths) =====
pub const ARITY_ONE: &str = "1";
pub const ARITY_TWO: &str = "2";
pub const ARITY_THREE: &str = "3";
pub const ARITY_AT_LEAST_ONE: &str = "at least 1";
pub const ARITY_ZERO_OR_ONE: &str = "0-1";
pub const ARITY_ONE_OR_TWO: &str = "1-2";

// ===== Common error message strings =====
pub const ERR_SANDBOX_NOT_INIT: &str = "sandbox not initialized";

/// Errors produced by the reader while turning text into a `Value`.
///
/// Matches the two classes `spec.md` §4.1/§7 names: running out of tokens
/// inside an open collection, and an unterminated string literal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    #[error("EOF")]
    FailToParse,
    #[error("unbalanced")]
    Unbalanced,
}

#[derive(Error, Debug, Clone)]
pub enum EvalError {
    /// Type mismatch error with function name, expected type, actual type, and position
    #[error("{function}: expected {expected}, got {actual} at argument {position}")]
    TypeMismatch {
        function: String,
        expected: String,
        actual: String,
        position: usize,
    },

    /// Arity error with function name, expected count/range, and actual count
    #[error("{function}: expected {expected} argument{}, got {actual}", if *.expected == "1" { "" } else { "s" })]
    ArityError {
        function: String,
        expected: String, // "2", "1-3", "at least 1"
        actual: usize,
    },

    /// Runtime error with function context
    #[error("{function}: {message}")]
    RuntimeError { function: String, message: String },

    #[error("'{0}' not found")]
    NotFound(String),

    #[error("value is not callable")]
    NotCallable,

    /// A value raised by `(throw v)`, or rethrown by `catch*` re-raising.
    /// Any other `EvalError` caught by `try*`/`catch*` is converted into
    /// `Value::String(err.to_string())` before binding, per the Error
    /// Handling Design section of the spec.
    #[error("{0}")]
    Thrown(Box<Value>),
}

impl EvalError {
    /// Create a type mismatch error with full context
    pub fn type_error(function: &str, expected: &str, actual: &Value, position: usize) -> Self {
        EvalError::TypeMismatch {
            function: function.to_string(),
            expected: expected.to_string(),
            actual: actual.type_name().to_string(),
            position,
        }
    }

    /// Create an arity error with expected and actual counts
    pub fn arity_error(function: &str, expected: impl Into<String>, actual: usize) -> Self {
        EvalError::ArityError {
            function: function.to_string(),
            expected: expected.into(),
            actual,
        }
    }

    /// Create a runtime error with function context
    pub fn runtime_error(function: &str, message: impl Into<String>) -> Self {
        EvalError::RuntimeError {
            function: function.to_string(),
            message: message.into(),
        }
    }

    pub fn thrown(value: Value) -> Self {
        EvalError::Thrown(Box::new(value))
    }
}
