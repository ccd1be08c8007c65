//! Application error types

use mpauth_domain::{DomainError, ErrorKind};
use thiserror::Error;

use crate::ports::{DecryptError, IdentityError, RegistryError, SessionStoreError};

/// Failure of a public session operation.
///
/// Every variant maps to exactly one stable [`ErrorKind`]; a failure keeps the
/// kind of the step that produced it.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required input was absent.
    #[error("missing {0} parameter")]
    MissingParameter(&'static str),

    /// The identity exchange failed.
    #[error("identity exchange failed: {0}")]
    UpstreamIdentity(#[from] IdentityError),

    /// The client payload could not be decrypted.
    #[error("failed to decrypt credentials: {0}")]
    Decryption(#[from] DecryptError),

    /// Online and offline identities disagree.
    #[error("identity mismatch between code exchange and decrypted credentials")]
    IdentityMismatch,

    /// The user registry failed.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// The session store failed.
    #[error("session store error: {0}")]
    SessionStore(#[from] SessionStoreError),

    /// Refresh was requested for an unregistered subject.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// The registry returned an unexpected number of rows.
    #[error("internal consistency error: {0}")]
    InternalConsistency(String),

    /// An identifier cannot be embedded into a token.
    #[error("malformed identifier: {0}")]
    MalformedIdentifier(#[from] DomainError),

    /// Another authorization for the same subject is in flight.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Unclassified failure raised outside the workflows, such as a request
    /// body the transport could not read. The workflows never return it.
    #[error("unknown error: {0}")]
    Unknown(String),
}

impl AuthError {
    /// Returns the stable kind of this failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingParameter(_) => ErrorKind::MissingParameter,
            Self::UpstreamIdentity(_) => ErrorKind::UpstreamIdentityError,
            Self::Decryption(_) => ErrorKind::DecryptionError,
            Self::IdentityMismatch => ErrorKind::IdentityMismatch,
            Self::Registry(_) => ErrorKind::RegistryError,
            Self::SessionStore(_) => ErrorKind::SessionStoreError,
            Self::UserNotFound(_) => ErrorKind::UserNotFound,
            Self::InternalConsistency(_) => ErrorKind::InternalConsistency,
            Self::MalformedIdentifier(_) => ErrorKind::MalformedIdentifier,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// Numeric status code of this failure.
    #[must_use]
    pub const fn status_code(&self) -> u32 {
        self.kind().status_code()
    }
}

/// Result type alias for session operations.
pub type AuthResult<T> = Result<T, AuthError>;
