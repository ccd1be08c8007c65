//! Refresh session use case.
//!
//! Invalidates every live session of a registered subject, then issues a new
//! one. Unlike authorization, refresh never registers a subject.

use std::sync::Arc;

use mpauth_domain::{SubjectId, Token};
use tracing::info;

use crate::error::{AuthError, AuthResult};
use crate::ports::UserRegistry;
use crate::use_cases::MintSession;
use crate::use_cases::authorize::required;

/// Output from refreshing a session.
#[derive(Debug, Clone)]
pub struct RefreshSessionOutput {
    /// The newly minted token.
    pub token: Token,
    /// Number of sessions invalidated before minting.
    pub invalidated: usize,
}

/// Use case reissuing the session of a known subject.
#[derive(Clone)]
pub struct RefreshSession {
    registry: Arc<dyn UserRegistry>,
    minter: MintSession,
}

impl RefreshSession {
    /// Creates a new `RefreshSession` use case.
    #[must_use]
    pub fn new(registry: Arc<dyn UserRegistry>, minter: MintSession) -> Self {
        Self { registry, minter }
    }

    /// Executes the use case.
    ///
    /// On success every token previously live for the subject and configured
    /// sku is gone and exactly one new token is live.
    ///
    /// # Errors
    /// - `MissingParameter` if `subject_id` is absent
    /// - `MalformedIdentifier` if it cannot be embedded in a token
    /// - `UserNotFound` if the subject is not registered; nothing is written
    /// - `InternalConsistency` if the registry holds duplicate rows
    /// - `Registry` or `SessionStore` on storage faults
    #[tracing::instrument(name = "refresh", skip_all)]
    pub async fn execute(&self, subject_id: Option<&str>) -> AuthResult<RefreshSessionOutput> {
        let subject = SubjectId::new(required(subject_id, "subject_id")?)?;

        let rows = self.registry.find_by_subject_id(&subject).await?;
        match rows.len() {
            0 => return Err(AuthError::UserNotFound(subject.to_string())),
            1 => {}
            n => {
                return Err(AuthError::InternalConsistency(format!(
                    "expected at most one registry row for {subject}, found {n}"
                )));
            }
        }

        let stale = self.minter.live_sessions(&subject).await?;
        if !stale.is_empty() {
            self.minter.store().delete_many(&stale).await?;
            info!(%subject, invalidated = stale.len(), "invalidated live sessions");
        }

        let token = self.minter.mint(&subject).await?;
        Ok(RefreshSessionOutput {
            token,
            invalidated: stale.len(),
        })
    }
}
