//! Session token format.
//!
//! A token is `subject_id|sku|session_part`, where `session_part` is the hex
//! SHA-256 digest of a millisecond timestamp followed by a short random nonce.
//! The token string doubles as the session-store key.

use std::fmt;

use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{DomainError, DomainResult};
use crate::identity::{SubjectId, validate_identifier};

/// Reserved field delimiter inside a token.
pub const DELIMITER: char = '|';

/// Length of the random nonce mixed into the session part.
pub const NONCE_LEN: usize = 6;

/// Length of the hex-encoded session part.
pub const SESSION_PART_LEN: usize = 64;

/// Operator-assigned tag for a deployment variant (e.g. `app-v1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sku(String);

impl Sku {
    /// Validates and wraps a sku tag.
    ///
    /// # Errors
    /// Returns an error if the tag is empty or contains the token delimiter.
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        validate_identifier("sku", &value)?;
        Ok(Self(value))
    }

    /// Returns the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Sku {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Sku> for String {
    fn from(sku: Sku) -> Self {
        sku.0
    }
}

/// Opaque session token handed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Wraps a token string as returned by a session store.
    #[must_use]
    pub fn from_raw(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the token, returning the underlying string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns a log-safe preview (first 8 chars + `...`).
    #[must_use]
    pub fn preview(&self) -> String {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) if self.0.len() > 12 => format!("{}...", &self.0[..idx]),
            _ => self.0.clone(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Encodes and decodes the token string format.
pub struct TokenCodec;

impl TokenCodec {
    /// Mints a token for `subject` under `sku`, mixing a fresh random nonce
    /// into the session part.
    #[must_use]
    pub fn encode(subject: &SubjectId, sku: &Sku, timestamp_ms: i64) -> Token {
        let nonce: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(NONCE_LEN)
            .map(char::from)
            .collect();
        Self::encode_with_nonce(subject, sku, timestamp_ms, &nonce)
    }

    /// Deterministic variant of [`TokenCodec::encode`] with a caller-supplied nonce.
    #[must_use]
    pub fn encode_with_nonce(subject: &SubjectId, sku: &Sku, timestamp_ms: i64, nonce: &str) -> Token {
        let session_part = Self::session_part(timestamp_ms, nonce);
        Token(format!(
            "{}{DELIMITER}{}{DELIMITER}{session_part}",
            subject.as_str(),
            sku.as_str()
        ))
    }

    /// Hex digest of `timestamp ++ nonce`.
    #[must_use]
    pub fn session_part(timestamp_ms: i64, nonce: &str) -> String {
        let digest = Sha256::digest(format!("{timestamp_ms}{nonce}").as_bytes());
        hex::encode(digest)
    }

    /// Returns the substring preceding the first delimiter, or an empty
    /// string when the token has no delimiter.
    #[must_use]
    pub fn extract_subject_id(token: &str) -> &str {
        token.split_once(DELIMITER).map_or("", |(subject, _)| subject)
    }

    /// Returns the sku field, or `None` unless the token splits into exactly
    /// three fields.
    #[must_use]
    pub fn extract_sku(token: &str) -> Option<&str> {
        let mut parts = token.split(DELIMITER);
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(sku), Some(_), None) => Some(sku),
            _ => None,
        }
    }

    /// Key prefix shared by every session of `subject` under `sku`.
    #[must_use]
    pub fn session_prefix(subject: &SubjectId, sku: &Sku) -> String {
        format!("{}{DELIMITER}{}{DELIMITER}", subject.as_str(), sku.as_str())
    }

    /// Reservation key guarding concurrent minting for `subject` under `sku`.
    #[must_use]
    pub fn claim_key(subject: &SubjectId, sku: &Sku) -> String {
        format!("claim:{}{DELIMITER}{}", subject.as_str(), sku.as_str())
    }
}
