//! Session service facade.
//!
//! Wires the three public operations to a single set of collaborators created
//! once at startup and shared by every request.

use std::sync::Arc;

use mpauth_domain::{AuthSettings, Token};

use crate::error::AuthResult;
use crate::ports::{Clock, CredentialDecryptor, IdentityVerifier, SessionStore, UserRegistry};
use crate::use_cases::{
    AuthorizeInput, AuthorizeUser, MintSession, RefreshSession, ValidateToken,
};

/// External collaborators of the session workflows.
#[derive(Clone)]
pub struct Collaborators {
    /// Identity exchange.
    pub identity_verifier: Arc<dyn IdentityVerifier>,
    /// Client payload decryption.
    pub credential_decryptor: Arc<dyn CredentialDecryptor>,
    /// Durable user registry.
    pub user_registry: Arc<dyn UserRegistry>,
    /// Ephemeral session store.
    pub session_store: Arc<dyn SessionStore>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
}

/// Entry point for `authorize`, `refresh` and `is_token_valid`.
#[derive(Clone)]
pub struct AuthService {
    settings: Arc<AuthSettings>,
    authorize: AuthorizeUser,
    refresh: RefreshSession,
    validate: ValidateToken,
}

impl AuthService {
    /// Creates the service from immutable settings and its collaborators.
    #[must_use]
    pub fn new(settings: Arc<AuthSettings>, collaborators: Collaborators) -> Self {
        let minter = MintSession::new(
            Arc::clone(&collaborators.session_store),
            collaborators.clock,
            Arc::clone(&settings),
        );
        Self {
            authorize: AuthorizeUser::new(
                collaborators.identity_verifier,
                collaborators.credential_decryptor,
                Arc::clone(&collaborators.user_registry),
                minter.clone(),
            ),
            refresh: RefreshSession::new(collaborators.user_registry, minter),
            validate: ValidateToken::new(collaborators.session_store),
            settings,
        }
    }

    /// Settings the service was built with.
    #[must_use]
    pub fn settings(&self) -> &AuthSettings {
        &self.settings
    }

    /// Authorizes a user from a one-time code and encrypted credentials.
    ///
    /// # Errors
    /// See [`AuthorizeUser::execute`].
    pub async fn authorize(
        &self,
        code: Option<&str>,
        encrypted_data: Option<&str>,
        iv: Option<&str>,
    ) -> AuthResult<Token> {
        let input = AuthorizeInput {
            code: code.map(str::to_string),
            encrypted_data: encrypted_data.map(str::to_string),
            iv: iv.map(str::to_string),
        };
        self.authorize.execute(input).await.map(|output| output.token)
    }

    /// Invalidates the live sessions of a registered subject and issues a new one.
    ///
    /// # Errors
    /// See [`RefreshSession::execute`].
    pub async fn refresh(&self, subject_id: Option<&str>) -> AuthResult<Token> {
        self.refresh.execute(subject_id).await.map(|output| output.token)
    }

    /// Returns true if `token` maps to a live session.
    pub async fn is_token_valid(&self, token: Option<&str>) -> bool {
        self.validate.execute(token).await
    }
}
