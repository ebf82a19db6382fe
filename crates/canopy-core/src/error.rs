//! Error types for tree access, numeric conversion and format adapters.

use thiserror::Error;

use crate::node::NodeKind;

/// Errors that can occur while building, reading, loading or saving a tree.
#[derive(Error, Debug)]
pub enum TreeError {
    /// The operation requires a different kind of node (e.g. `entry` on an array).
    #[error("{operation} requires {expected}, but the node is {found}")]
    WrongKind {
        operation: &'static str,
        expected: &'static str,
        found: NodeKind,
    },

    /// The requested scalar type does not match the stored kind.
    #[error("cannot read {requested} from a {found} node")]
    TypeMismatch {
        requested: &'static str,
        found: NodeKind,
    },

    /// A numeric conversion would overflow or change the value.
    #[error("invalid cast to {target}: {reason}")]
    InvalidCast {
        target: &'static str,
        reason: String,
    },

    /// A decimal value was requested as an integer type.
    #[error("cannot convert decimal {value} to integer type {target}")]
    DecimalToIntegerLoss { value: f64, target: &'static str },

    /// Positional access past the last child.
    #[error("index {index} out of range for node with {len} children")]
    OutOfRange { index: usize, len: usize },

    /// The format/operation combination is not supported.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// External content could not be parsed into a tree.
    #[error("malformed {format} input: {message}")]
    MalformedInput {
        format: &'static str,
        message: String,
    },

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TreeError {
    pub(crate) fn malformed(format: &'static str, message: impl ToString) -> Self {
        TreeError::MalformedInput {
            format,
            message: message.to_string(),
        }
    }

    pub(crate) fn invalid_cast<T>(reason: impl Into<String>) -> Self {
        TreeError::InvalidCast {
            target: std::any::type_name::<T>(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout canopy-core.
pub type Result<T> = std::result::Result<T, TreeError>;
