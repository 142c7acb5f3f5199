//! Domain error model.

use thiserror::Error;

use crate::validation::Violations;

/// Result type used across the domain and service layers.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every service operation either returns a value or fails with exactly one of
/// these kinds. Mapping kinds to transport status codes happens at the edge.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Required input fields are missing or malformed.
    #[error("validation failed: {0}")]
    Validation(Violations),

    /// Structurally valid input that violates a semantic precondition
    /// (e.g. an update payload without its identifier).
    #[error("{0}")]
    InvalidArgument(String),

    /// The referenced identifier has no corresponding record.
    #[error("{0}")]
    NotFound(String),

    /// Anything else (store unavailable, corrupted rows, ...).
    #[error("{0}")]
    Unexpected(String),
}

impl DomainError {
    pub fn validation(violations: impl Into<Violations>) -> Self {
        Self::Validation(violations.into())
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }

    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => "validation_error",
            DomainError::InvalidArgument(_) => "invalid_argument",
            DomainError::NotFound(_) => "not_found",
            DomainError::Unexpected(_) => "unexpected_error",
        }
    }
}

impl From<Violations> for DomainError {
    fn from(value: Violations) -> Self {
        Self::Validation(value)
    }
}
