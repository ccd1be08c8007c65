//! Credential decryption port

use async_trait::async_trait;
use mpauth_domain::IdentityClaims;

use super::SessionSecret;

/// Errors that can occur while decrypting a client payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecryptError {
    /// An input was not valid for the cipher (encoding, key or iv length).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Decryption or unpadding failed.
    #[error("cipher failure: {0}")]
    Cipher(String),

    /// The plaintext was not the expected document.
    #[error("invalid plaintext: {0}")]
    InvalidPlaintext(String),

    /// The plaintext was issued for another application.
    #[error("illegal buffer: watermark app id {0} does not match")]
    WatermarkMismatch(String),
}

/// Port recovering the offline identity from a client-held encrypted payload.
#[async_trait]
pub trait CredentialDecryptor: Send + Sync {
    /// Decrypts `payload` with the session secret and `iv`.
    ///
    /// # Errors
    /// Returns an error if the payload cannot be decrypted or parsed.
    async fn decrypt(
        &self,
        secret: &SessionSecret,
        payload: &str,
        iv: &str,
    ) -> Result<IdentityClaims, DecryptError>;
}
