//! Core error types for the subforms library.
//!
//! The library deliberately adds no error kind of its own to the validation
//! path: validation failures travel through per-field error lists on the
//! forms themselves. [`SubformsError`] covers the handful of operations
//! that can fail outside validation.

use thiserror::Error;

/// Errors raised by the subforms foundation types.
#[derive(Debug, Error)]
pub enum SubformsError {
    /// Raised when an operation is attempted that the caller should not be
    /// performing, such as mutating an immutable `QueryDict`.
    #[error("Suspicious operation: {0}")]
    SuspiciousOperation(String),

    /// Raised when a declarative form description is internally
    /// inconsistent, e.g. duplicate subform prefixes.
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),
}

/// A convenience `Result` alias using [`SubformsError`].
pub type SubformsResult<T> = Result<T, SubformsError>;
