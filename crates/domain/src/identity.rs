//! Subject identity types.
//!
//! A subject is identified by the provider's app-scoped "open id", or by its
//! cross-app "union id" whenever the provider supplies one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::token::DELIMITER;

/// Validated identifier of an end user.
///
/// Never empty and never contains the token delimiter, so it can be embedded
/// into a token without corrupting parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubjectId(String);

impl SubjectId {
    /// Validates and wraps a subject identifier.
    ///
    /// # Errors
    /// Returns an error if the value is empty or contains the token delimiter.
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        validate_identifier("subject_id", &value)?;
        Ok(Self(value))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SubjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SubjectId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SubjectId> for String {
    fn from(id: SubjectId) -> Self {
        id.0
    }
}

/// Identifiers reported for one user by either the identity exchange
/// (online) or the decrypted client payload (offline).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// App-scoped identifier.
    pub open_id: String,
    /// Cross-app identifier, when the provider links the app to an account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub union_id: Option<String>,
}

impl IdentityClaims {
    /// Creates claims carrying only an open id.
    #[must_use]
    pub fn open(open_id: impl Into<String>) -> Self {
        Self {
            open_id: open_id.into(),
            union_id: None,
        }
    }

    /// Attaches a union id.
    #[must_use]
    pub fn with_union_id(mut self, union_id: impl Into<String>) -> Self {
        self.union_id = Some(union_id.into());
        self
    }

    /// Returns the preferred raw identifier: union id if present and
    /// non-empty, open id otherwise.
    #[must_use]
    pub fn preferred_id(&self) -> &str {
        self.union_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.open_id)
    }

    /// Resolves the preferred identifier into a validated [`SubjectId`].
    ///
    /// # Errors
    /// Returns an error if the preferred identifier is empty or contains the
    /// token delimiter.
    pub fn subject_id(&self) -> DomainResult<SubjectId> {
        SubjectId::new(self.preferred_id())
    }
}

pub(crate) fn validate_identifier(field: &'static str, value: &str) -> DomainResult<()> {
    if value.is_empty() {
        return Err(DomainError::EmptyIdentifier { field });
    }
    if value.contains(DELIMITER) {
        return Err(DomainError::ReservedDelimiter {
            field,
            value: value.to_string(),
            delimiter: DELIMITER,
        });
    }
    Ok(())
}
