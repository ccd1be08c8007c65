//! User registry port

use async_trait::async_trait;
use mpauth_domain::{SubjectId, UserRow};

/// Errors raised by the user registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Any other backend failure.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Durable store of known subjects.
///
/// Rows are append-only from the workflows' point of view.
#[async_trait]
pub trait UserRegistry: Send + Sync {
    /// Returns every row registered for `subject_id`.
    ///
    /// More than one row is a fault upstream of the caller.
    async fn find_by_subject_id(&self, subject_id: &SubjectId)
    -> Result<Vec<UserRow>, RegistryError>;

    /// Appends a row.
    async fn insert(&self, row: &UserRow) -> Result<(), RegistryError>;
}
