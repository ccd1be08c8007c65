//! Stable error kinds, status codes and the response envelope.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status code reported for a successful operation.
pub const SUCCESS_STATUS_CODE: u32 = 1;

/// Stable classification of every failure surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required input was absent.
    MissingParameter,
    /// The identity exchange call failed.
    UpstreamIdentityError,
    /// The client payload could not be decrypted.
    DecryptionError,
    /// Online and offline identities disagree.
    IdentityMismatch,
    /// The user registry failed.
    RegistryError,
    /// The session store failed.
    SessionStoreError,
    /// Refresh was requested for an unregistered subject.
    UserNotFound,
    /// The registry holds an unexpected number of rows for one subject.
    InternalConsistency,
    /// An identifier is empty or contains the reserved delimiter.
    MalformedIdentifier,
    /// Another authorization for the same subject holds the reservation.
    Conflict,
    /// Unclassified failure.
    Unknown,
}

impl ErrorKind {
    /// Numeric status code reported alongside the kind.
    #[must_use]
    pub const fn status_code(self) -> u32 {
        match self {
            Self::RegistryError => 6000,
            Self::MissingParameter => 6001,
            Self::UpstreamIdentityError => 6008,
            Self::IdentityMismatch => 6009,
            Self::SessionStoreError => 6010,
            Self::DecryptionError => 6011,
            Self::UserNotFound => 6012,
            Self::InternalConsistency => 6013,
            Self::MalformedIdentifier => 6014,
            Self::Conflict => 6015,
            Self::Unknown => 9999,
        }
    }

    /// Snake-case name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingParameter => "missing_parameter",
            Self::UpstreamIdentityError => "upstream_identity_error",
            Self::DecryptionError => "decryption_error",
            Self::IdentityMismatch => "identity_mismatch",
            Self::RegistryError => "registry_error",
            Self::SessionStoreError => "session_store_error",
            Self::UserNotFound => "user_not_found",
            Self::InternalConsistency => "internal_consistency",
            Self::MalformedIdentifier => "malformed_identifier",
            Self::Conflict => "conflict",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON envelope returned to callers of the public operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    /// `1` on success, the kind's status code otherwise.
    pub status_code: u32,
    /// `"OK"` on success, the failure message otherwise.
    pub status_message: String,
    /// Payload on success.
    pub response: Option<T>,
}

impl<T> ResponseEnvelope<T> {
    /// Wraps a successful result.
    #[must_use]
    pub fn success(response: T) -> Self {
        Self {
            status_code: SUCCESS_STATUS_CODE,
            status_message: "OK".to_string(),
            response: Some(response),
        }
    }

    /// Wraps a failure.
    #[must_use]
    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            status_code: kind.status_code(),
            status_message: message.into(),
            response: None,
        }
    }

    /// Returns true for a success envelope.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status_code == SUCCESS_STATUS_CODE
    }
}
