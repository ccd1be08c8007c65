//! Authorize use case.
//!
//! Trades a one-time code plus client-held encrypted credentials for a session
//! token. The workflow runs linearly through named steps:
//!
//! `ExchangeIdentity -> Decrypt -> CompareIdentities -> LookupSession ->
//! LookupOrRegisterSubject -> MintToken`
//!
//! An already live session for the subject is reused instead of minting a new
//! one. Without a reservation (see [`AuthSettings::claim_ttl_secs`]) two
//! concurrent calls for the same subject may both mint.

use std::fmt;
use std::sync::Arc;

use mpauth_domain::{AuthSettings, IdentityClaims, SubjectId, Token, TokenCodec, UserRow};
use tracing::{debug, info, warn};

use crate::error::{AuthError, AuthResult};
use crate::ports::{CredentialDecryptor, IdentityVerifier, UserRegistry, VerifiedIdentity};
use crate::use_cases::MintSession;

/// Named steps of the authorization workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizeStep {
    /// Trade the code for a session secret and online identity.
    ExchangeIdentity,
    /// Recover the offline identity from the client payload.
    Decrypt,
    /// Check both identities name the same subject.
    CompareIdentities,
    /// Look for a live session to reuse.
    LookupSession,
    /// Find the subject in the registry, registering it when absent.
    LookupOrRegisterSubject,
    /// Mint and persist a new token.
    MintToken,
}

impl fmt::Display for AuthorizeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ExchangeIdentity => "exchange_identity",
            Self::Decrypt => "decrypt",
            Self::CompareIdentities => "compare_identities",
            Self::LookupSession => "lookup_session",
            Self::LookupOrRegisterSubject => "lookup_or_register_subject",
            Self::MintToken => "mint_token",
        };
        f.write_str(name)
    }
}

/// Input for authorizing a user.
#[derive(Debug, Clone, Default)]
pub struct AuthorizeInput {
    /// One-time login code.
    pub code: Option<String>,
    /// Client-held encrypted user data.
    pub encrypted_data: Option<String>,
    /// Initialisation vector of `encrypted_data`.
    pub iv: Option<String>,
}

impl AuthorizeInput {
    /// Creates an input with every parameter present.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        encrypted_data: impl Into<String>,
        iv: impl Into<String>,
    ) -> Self {
        Self {
            code: Some(code.into()),
            encrypted_data: Some(encrypted_data.into()),
            iv: Some(iv.into()),
        }
    }

    fn require(&self) -> AuthResult<(&str, &str, &str)> {
        let code = required(self.code.as_deref(), "code")?;
        let encrypted_data = required(self.encrypted_data.as_deref(), "encryptedData")?;
        let iv = required(self.iv.as_deref(), "iv")?;
        Ok((code, encrypted_data, iv))
    }
}

pub(crate) fn required<'a>(value: Option<&'a str>, name: &'static str) -> AuthResult<&'a str> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(AuthError::MissingParameter(name))
}

/// How the returned token was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// An already live session was returned.
    Reused,
    /// A new session was minted.
    Minted {
        /// Whether the subject was registered by this call.
        registered: bool,
    },
}

/// Output from authorizing a user.
#[derive(Debug, Clone)]
pub struct AuthorizeOutput {
    /// The session token.
    pub token: Token,
    /// The subject the token belongs to.
    pub subject: SubjectId,
    /// Whether the session was reused or minted.
    pub outcome: SessionOutcome,
}

/// Use case coordinating identity verification and session issuance.
#[derive(Clone)]
pub struct AuthorizeUser {
    verifier: Arc<dyn IdentityVerifier>,
    decryptor: Arc<dyn CredentialDecryptor>,
    registry: Arc<dyn UserRegistry>,
    minter: MintSession,
}

impl AuthorizeUser {
    /// Creates a new `AuthorizeUser` use case.
    #[must_use]
    pub fn new(
        verifier: Arc<dyn IdentityVerifier>,
        decryptor: Arc<dyn CredentialDecryptor>,
        registry: Arc<dyn UserRegistry>,
        minter: MintSession,
    ) -> Self {
        Self {
            verifier,
            decryptor,
            registry,
            minter,
        }
    }

    fn settings(&self) -> &AuthSettings {
        self.minter.settings()
    }

    /// Runs the workflow.
    ///
    /// # Errors
    /// - `MissingParameter` if any input is absent; nothing is called
    /// - `UpstreamIdentity` if the code exchange fails
    /// - `Decryption` if the payload cannot be decrypted
    /// - `IdentityMismatch` if online and offline identities differ
    /// - `MalformedIdentifier` if the subject cannot be embedded in a token
    /// - `Conflict` if another call holds the subject's reservation
    /// - `Registry`, `SessionStore` or `InternalConsistency` on storage faults
    #[tracing::instrument(name = "authorize", skip_all)]
    pub async fn execute(&self, input: AuthorizeInput) -> AuthResult<AuthorizeOutput> {
        let (code, encrypted_data, iv) = input.require()?;

        let verified = self.exchange_identity(code).await?;
        let offline = self.decrypt(&verified, encrypted_data, iv).await?;
        let subject = Self::compare_identities(&verified.claims, &offline)?;

        let claim_key = self.reserve(&subject).await?;
        let result = self.resolve_session(subject).await;
        if let Some(key) = claim_key {
            self.release(&key).await;
        }
        result
    }

    async fn exchange_identity(&self, code: &str) -> AuthResult<VerifiedIdentity> {
        debug!(step = %AuthorizeStep::ExchangeIdentity);
        Ok(self.verifier.exchange(code).await?)
    }

    async fn decrypt(
        &self,
        verified: &VerifiedIdentity,
        encrypted_data: &str,
        iv: &str,
    ) -> AuthResult<IdentityClaims> {
        debug!(step = %AuthorizeStep::Decrypt);
        Ok(self
            .decryptor
            .decrypt(&verified.session_secret, encrypted_data, iv)
            .await?)
    }

    fn compare_identities(
        online: &IdentityClaims,
        offline: &IdentityClaims,
    ) -> AuthResult<SubjectId> {
        debug!(step = %AuthorizeStep::CompareIdentities);
        if online.preferred_id() != offline.preferred_id() {
            warn!("online and offline identities differ");
            return Err(AuthError::IdentityMismatch);
        }
        Ok(offline.subject_id()?)
    }

    async fn reserve(&self, subject: &SubjectId) -> AuthResult<Option<String>> {
        let Some(ttl) = self.settings().claim_ttl_secs() else {
            return Ok(None);
        };
        let key = TokenCodec::claim_key(subject, self.settings().sku());
        if !self.minter.store().claim(&key, ttl).await? {
            warn!(%subject, "authorization already in progress");
            return Err(AuthError::Conflict(format!(
                "authorization already in progress for {subject}"
            )));
        }
        Ok(Some(key))
    }

    async fn release(&self, key: &str) {
        // The claim expires on its own if release fails.
        if let Err(e) = self.minter.store().release(key).await {
            warn!(error = %e, "failed to release reservation");
        }
    }

    async fn resolve_session(&self, subject: SubjectId) -> AuthResult<AuthorizeOutput> {
        debug!(step = %AuthorizeStep::LookupSession, %subject);
        if let Some(existing) = self.minter.live_sessions(&subject).await?.into_iter().next() {
            let token = Token::from_raw(existing);
            info!(%subject, token = %token.preview(), "reusing live session");
            return Ok(AuthorizeOutput {
                token,
                subject,
                outcome: SessionOutcome::Reused,
            });
        }

        let registered = self.lookup_or_register(&subject).await?;

        debug!(step = %AuthorizeStep::MintToken, %subject);
        let token = self.minter.mint(&subject).await?;
        Ok(AuthorizeOutput {
            token,
            subject,
            outcome: SessionOutcome::Minted { registered },
        })
    }

    async fn lookup_or_register(&self, subject: &SubjectId) -> AuthResult<bool> {
        debug!(step = %AuthorizeStep::LookupOrRegisterSubject, %subject);
        let rows = self.registry.find_by_subject_id(subject).await?;
        match rows.len() {
            0 => {
                let row = UserRow::new(subject.clone(), self.minter.clock().now());
                self.registry.insert(&row).await?;
                info!(%subject, "registered new subject");
                Ok(true)
            }
            1 => Ok(false),
            n => {
                warn!(%subject, rows = n, "registry holds duplicate rows");
                Err(AuthError::InternalConsistency(format!(
                    "expected at most one registry row for {subject}, found {n}"
                )))
            }
        }
    }
}
