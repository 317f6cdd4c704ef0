//! Error types for building, rewriting, evaluating and rendering expressions.

use crate::value::DataType;
use thiserror::Error;

/// Errors that can occur while working with expression trees
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    /// Operand, argument or result type incompatible with what was required
    #[error("Type mismatch in {context}: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: String,
        actual: DataType,
        context: String,
    },

    /// Parameters bound to a lambda do not match the ones it declares
    #[error("Arity mismatch in {context}: {reason}")]
    ArityMismatch { context: String, reason: String },

    /// Call site supplied the wrong number of arguments
    #[error("{context} expects {expected} arguments, got {actual}")]
    ArgumentCountMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// Renderer met a node outside the grammar it accepts
    #[error("Unsupported node in {renderer} rendering: {node}")]
    UnsupportedNode {
        renderer: &'static str,
        node: String,
    },

    /// Member access on a record without that field
    #[error("Record {record} has no field {field}")]
    UnknownField { record: String, field: String },

    #[error("Division by zero")]
    DivisionByZero,
}

/// Result type for expression operations
pub type ExpressionResult<T> = Result<T, ExpressionError>;
