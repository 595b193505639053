//! Error types and reporting

use crate::config::ConfigError;
use crate::interp::RuntimeError;
use thiserror::Error;

/// Result type alias for tree construction
pub type Result<T> = std::result::Result<T, BuildError>;

/// Errors raised while building a program, before evaluation starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Attempt to redeclare previously declared variable: {name}")]
    DuplicateDeclaration { name: String },

    #[error("Reference to undeclared variable: {name}")]
    UnknownVariable { name: String },

    #[error("Invalid numeric literal: {text:?}")]
    InvalidNumeral { text: String },

    #[error("Program must contain at least one statement")]
    EmptyProgram,
}

impl BuildError {
    pub fn duplicate_declaration(name: impl Into<String>) -> Self {
        Self::DuplicateDeclaration { name: name.into() }
    }

    pub fn unknown_variable(name: impl Into<String>) -> Self {
        Self::UnknownVariable { name: name.into() }
    }

    pub fn invalid_numeral(text: impl Into<String>) -> Self {
        Self::InvalidNumeral { text: text.into() }
    }
}

/// Any failure of a one-shot [`crate::run`]
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
