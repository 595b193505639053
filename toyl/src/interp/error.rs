//! Runtime errors for the interpreter

use std::fmt;

/// Runtime error during evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
}

/// Kinds of runtime errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Division by zero, whichever path detected it
    DivisionByZero,
    /// Read of a slot that was never written; a defect in whatever built the tree
    UninitializedRead,
    /// Node nesting deeper than the configured limit
    DepthExceeded,
}

impl RuntimeError {
    pub fn division_by_zero() -> Self {
        RuntimeError {
            kind: ErrorKind::DivisionByZero,
            message: "division by zero".to_string(),
        }
    }

    pub fn uninitialized_read(slot: usize) -> Self {
        RuntimeError {
            kind: ErrorKind::UninitializedRead,
            message: format!("read of uninitialized variable slot {slot}"),
        }
    }

    pub fn depth_exceeded(max_depth: usize) -> Self {
        RuntimeError {
            kind: ErrorKind::DepthExceeded,
            message: format!("expression nesting exceeds maximum depth of {max_depth}"),
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Runtime error: {}", self.message)
    }
}

impl std::error::Error for RuntimeError {}

/// Result type for interpreter operations
pub type InterpResult<T> = Result<T, RuntimeError>;
