//! Session and registry records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::SubjectId;

/// Value stored in the session store under a token key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// When the session was minted.
    pub created_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Creates a record for a session minted at `created_at`.
    #[must_use]
    pub const fn new(created_at: DateTime<Utc>) -> Self {
        Self { created_at }
    }
}

/// A row of the durable user registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRow {
    /// The registered subject.
    pub subject_id: SubjectId,
    /// When the subject was first registered.
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    /// Creates a registry row.
    #[must_use]
    pub const fn new(subject_id: SubjectId, created_at: DateTime<Utc>) -> Self {
        Self {
            subject_id,
            created_at,
        }
    }
}
