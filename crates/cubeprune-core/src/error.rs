//! Error types for cubeprune

use thiserror::Error;

/// Main error type for decoder search operations
#[derive(Debug, Error)]
pub enum CoreError {
    /// A data-structure invariant was broken; the current feature
    /// evaluation must not continue with corrupted state.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Error in grammar rule definition
    #[error("Malformed rule: {0}")]
    MalformedRule(String),

    /// A node handle did not resolve within its arena
    #[error("Dangling node handle: {0:?}")]
    DanglingNode(crate::hypergraph::NodeId),

    /// A feature function was asked for state it never produced
    #[error("Missing dynamic-programming state for feature {0}")]
    MissingState(u32),

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for decoder search operations
pub type Result<T> = std::result::Result<T, CoreError>;
