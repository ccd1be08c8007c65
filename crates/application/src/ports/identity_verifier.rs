//! Identity exchange port
//!
//! Trades a one-time login code for a session secret and the online identity
//! of the user who produced it.

use std::fmt;

use async_trait::async_trait;
use mpauth_domain::IdentityClaims;

/// Errors reported by the identity exchange.
///
/// Transport adapters classify failures before they reach the workflows so
/// connectivity problems can be told apart from rejected requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// The provider could not be reached.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The request timed out.
    #[error("request timed out")]
    Timeout,

    /// The provider answered with a non-200 status.
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// The provider answered with an empty body.
    #[error("empty response body")]
    EmptyResponse,

    /// The body was not the expected JSON document.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The provider rejected the code.
    #[error("provider error {code}: {message}")]
    Provider {
        /// Provider error code.
        code: i64,
        /// Provider error message.
        message: String,
    },

    /// Any other request failure.
    #[error("request failed: {0}")]
    Request(String),
}

/// Session secret issued by the provider for one login.
///
/// The value never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionSecret(String);

impl SessionSecret {
    /// Wraps a raw secret.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Exposes the raw secret to the decryptor.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionSecret(<redacted>)")
    }
}

/// Result of a successful code exchange.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    /// Secret used to decrypt the client payload.
    pub session_secret: SessionSecret,
    /// Identity as reported by the provider.
    pub claims: IdentityClaims,
}

/// Port for the external identity exchange.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Exchanges a one-time `code` for a session secret and online identity.
    ///
    /// # Errors
    /// Returns an error if the exchange fails for any reason.
    async fn exchange(&self, code: &str) -> Result<VerifiedIdentity, IdentityError>;
}
