//! In-memory user registry.

use std::sync::Arc;

use async_trait::async_trait;
use mpauth_application::ports::{RegistryError, UserRegistry};
use mpauth_domain::{SubjectId, UserRow};
use tokio::sync::RwLock;

/// Registry held in process memory.
///
/// Like the durable backends it enforces no uniqueness: inserting a subject
/// twice yields two rows. Clones share the same rows.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRegistry {
    rows: Arc<RwLock<Vec<UserRow>>>,
}

impl InMemoryUserRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-populated with `rows`.
    #[must_use]
    pub fn with_rows(rows: Vec<UserRow>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }

    /// Total number of rows.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Returns true if no row was ever inserted.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl UserRegistry for InMemoryUserRegistry {
    async fn find_by_subject_id(
        &self,
        subject_id: &SubjectId,
    ) -> Result<Vec<UserRow>, RegistryError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|row| &row.subject_id == subject_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, row: &UserRow) -> Result<(), RegistryError> {
        self.rows.write().await.push(row.clone());
        Ok(())
    }
}
