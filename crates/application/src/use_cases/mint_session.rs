//! Shared session minting step.

use std::sync::Arc;

use mpauth_domain::{AuthSettings, SessionRecord, SubjectId, Token, TokenCodec};
use tracing::{debug, info};

use crate::error::AuthResult;
use crate::ports::{Clock, SessionStore};

/// Mints tokens and looks up the live sessions of a subject.
///
/// Both workflows end here: the token is encoded from the subject, the
/// configured sku and the current time, then persisted with the configured TTL.
#[derive(Clone)]
pub struct MintSession {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    settings: Arc<AuthSettings>,
}

impl MintSession {
    /// Creates the minting step.
    #[must_use]
    pub fn new(
        store: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
        settings: Arc<AuthSettings>,
    ) -> Self {
        Self {
            store,
            clock,
            settings,
        }
    }

    /// Settings shared by every workflow.
    #[must_use]
    pub fn settings(&self) -> &AuthSettings {
        &self.settings
    }

    /// Session store handle.
    #[must_use]
    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    /// Clock handle.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Lists live session keys of `subject` under the configured sku.
    ///
    /// # Errors
    /// Returns an error if the session store fails.
    pub async fn live_sessions(&self, subject: &SubjectId) -> AuthResult<Vec<String>> {
        let prefix = TokenCodec::session_prefix(subject, self.settings.sku());
        let keys = self.store.keys_by_prefix(&prefix).await?;
        debug!(%subject, live = keys.len(), "looked up live sessions");
        Ok(keys)
    }

    /// Mints a new token for `subject` and persists its session record.
    ///
    /// # Errors
    /// Returns an error if the session store rejects the write.
    pub async fn mint(&self, subject: &SubjectId) -> AuthResult<Token> {
        let created_at = self.clock.now();
        let token = TokenCodec::encode(subject, self.settings.sku(), created_at.timestamp_millis());

        self.store
            .set_with_ttl(
                token.as_str(),
                SessionRecord::new(created_at),
                self.settings.token_ttl_secs(),
            )
            .await?;

        info!(
            %subject,
            token = %token.preview(),
            ttl_secs = self.settings.token_ttl_secs(),
            "minted session"
        );
        Ok(token)
    }
}
