//! Process-wide authorization settings.
//!
//! Built once at startup and shared read-only (usually behind an `Arc`) by
//! every workflow.

use std::fmt;

use serde::Deserialize;

use crate::error::{DomainError, DomainResult};
use crate::token::Sku;

/// Default token lifetime: three days.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 259_200;

/// Immutable settings read by the authorization workflows.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawAuthSettings")]
pub struct AuthSettings {
    app_id: String,
    app_secret: String,
    sku: Sku,
    token_ttl_secs: u64,
    claim_ttl_secs: Option<u64>,
}

impl AuthSettings {
    /// Returns a builder for constructing settings.
    #[must_use]
    pub fn builder() -> AuthSettingsBuilder {
        AuthSettingsBuilder::default()
    }

    /// Provider app id.
    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Provider app secret.
    #[must_use]
    pub fn app_secret(&self) -> &str {
        &self.app_secret
    }

    /// Deployment variant tag embedded in every token.
    #[must_use]
    pub const fn sku(&self) -> &Sku {
        &self.sku
    }

    /// Lifetime of a minted session, in seconds.
    #[must_use]
    pub const fn token_ttl_secs(&self) -> u64 {
        self.token_ttl_secs
    }

    /// Lifetime of a per-subject reservation, when reservations are enabled.
    #[must_use]
    pub const fn claim_ttl_secs(&self) -> Option<u64> {
        self.claim_ttl_secs
    }
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .field("sku", &self.sku)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("claim_ttl_secs", &self.claim_ttl_secs)
            .finish()
    }
}

/// Builder for [`AuthSettings`].
#[derive(Debug, Default, Clone)]
pub struct AuthSettingsBuilder {
    app_id: Option<String>,
    app_secret: Option<String>,
    sku: Option<String>,
    token_ttl_secs: Option<u64>,
    claim_ttl_secs: Option<u64>,
}

impl AuthSettingsBuilder {
    /// Sets the provider app id.
    #[must_use]
    pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// Sets the provider app secret.
    #[must_use]
    pub fn app_secret(mut self, app_secret: impl Into<String>) -> Self {
        self.app_secret = Some(app_secret.into());
        self
    }

    /// Sets the sku tag.
    #[must_use]
    pub fn sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    /// Sets the token lifetime in seconds.
    #[must_use]
    pub const fn token_ttl_secs(mut self, ttl: u64) -> Self {
        self.token_ttl_secs = Some(ttl);
        self
    }

    /// Enables per-subject reservations held for at most `ttl` seconds.
    #[must_use]
    pub const fn claim_ttl_secs(mut self, ttl: u64) -> Self {
        self.claim_ttl_secs = Some(ttl);
        self
    }

    /// Validates and builds the settings.
    ///
    /// # Errors
    /// Returns an error if the app id, app secret or sku is missing, the sku is
    /// not a valid token field, or a TTL is zero.
    pub fn build(self) -> DomainResult<AuthSettings> {
        let app_id = self
            .app_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| DomainError::InvalidSettings("app_id is required".to_string()))?;
        let app_secret = self
            .app_secret
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| DomainError::InvalidSettings("app_secret is required".to_string()))?;
        let sku = self
            .sku
            .ok_or_else(|| DomainError::InvalidSettings("sku is required".to_string()))
            .and_then(Sku::new)?;

        let token_ttl_secs = self.token_ttl_secs.unwrap_or(DEFAULT_TOKEN_TTL_SECS);
        if token_ttl_secs == 0 {
            return Err(DomainError::InvalidSettings(
                "token_ttl_secs must be positive".to_string(),
            ));
        }
        if self.claim_ttl_secs == Some(0) {
            return Err(DomainError::InvalidSettings(
                "claim_ttl_secs must be positive".to_string(),
            ));
        }

        Ok(AuthSettings {
            app_id,
            app_secret,
            sku,
            token_ttl_secs,
            claim_ttl_secs: self.claim_ttl_secs,
        })
    }
}

#[derive(Deserialize)]
struct RawAuthSettings {
    app_id: String,
    app_secret: String,
    sku: String,
    #[serde(default)]
    token_ttl_secs: Option<u64>,
    #[serde(default)]
    claim_ttl_secs: Option<u64>,
}

impl TryFrom<RawAuthSettings> for AuthSettings {
    type Error = DomainError;

    fn try_from(raw: RawAuthSettings) -> Result<Self, Self::Error> {
        let mut builder = Self::builder()
            .app_id(raw.app_id)
            .app_secret(raw.app_secret)
            .sku(raw.sku);
        if let Some(ttl) = raw.token_ttl_secs {
            builder = builder.token_ttl_secs(ttl);
        }
        if let Some(ttl) = raw.claim_ttl_secs {
            builder = builder.claim_ttl_secs(ttl);
        }
        builder.build()
    }
}
