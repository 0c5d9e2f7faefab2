//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Raised by catalog constructors, the catalog's reference checks and the
/// group planner. Storage failures belong to the infra layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. empty name, `min_students > max_students`).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A planned group set broke an allocation invariant.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier did not parse.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A record points at another record that does not exist
    /// (a product's author, a lesson's product).
    #[error("unknown {kind} {id}")]
    UnknownReference { kind: &'static str, id: String },

    /// The same student was added to a group twice.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn unknown_reference(kind: &'static str, id: impl ToString) -> Self {
        Self::UnknownReference {
            kind,
            id: id.to_string(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
