//! Error types for codegraph-pta
//!
//! The analysis itself is total over a well-formed program. Every error
//! here signals a broken upstream collaborator (malformed IR, bad
//! configuration) and is reported instead of producing wrong facts.

use crate::config::ConfigError;
use thiserror::Error;

/// Main error type for codegraph-pta operations
#[derive(Debug, Error)]
pub enum PtaError {
    /// Program IR violates a structural precondition
    #[error("Invalid program: {0}")]
    InvalidProgram(String),

    /// The program declares no entry method to start from
    #[error("Program has no entry method")]
    NoEntryMethod,

    /// An instance method reached by dispatch has no `this` variable
    #[error("Instance method {method} has no `this` variable")]
    MissingThis { method: String },

    /// Call site and callee disagree on the number of arguments
    #[error("Arity mismatch at {call_site} calling {callee}: {found} argument(s), {expected} parameter(s)")]
    ArityMismatch {
        call_site: String,
        callee: String,
        expected: usize,
        found: usize,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl PtaError {
    /// Create an invalid-program error
    pub fn invalid_program(msg: impl Into<String>) -> Self {
        PtaError::InvalidProgram(msg.into())
    }
}

/// Result type alias for codegraph-pta operations
pub type Result<T> = std::result::Result<T, PtaError>;
