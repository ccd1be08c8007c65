//! Domain error types

use thiserror::Error;

/// Domain-level errors raised while validating identifiers and settings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was empty.
    #[error("{field} must not be empty")]
    EmptyIdentifier {
        /// Which identifier was empty (e.g. `subject_id`, `sku`).
        field: &'static str,
    },

    /// An identifier contains the reserved token delimiter.
    #[error("{field} contains the reserved delimiter '{delimiter}': {value}")]
    ReservedDelimiter {
        /// Which identifier was rejected.
        field: &'static str,
        /// The rejected value.
        value: String,
        /// The reserved delimiter character.
        delimiter: char,
    },

    /// The settings are inconsistent or incomplete.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
