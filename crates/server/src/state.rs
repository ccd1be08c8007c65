//! Shared router state and service wiring.

use std::sync::Arc;

use anyhow::Context as _;
use mpauth_application::ports::{Clock, UserRegistry};
use mpauth_application::{AuthService, Collaborators};
use mpauth_infrastructure::{
    InMemorySessionStore, InMemoryUserRegistry, JsonFileUserRegistry, SystemClock,
    WeChatDataDecryptor, WeChatIdentityVerifier,
};
use tracing::info;

use crate::config::ServerConfig;

/// State shared by every route.
#[derive(Clone)]
pub struct AppState {
    /// Session workflows.
    pub service: AuthService,
}

impl AppState {
    /// Wraps an already wired service.
    #[must_use]
    pub const fn new(service: AuthService) -> Self {
        Self { service }
    }

    /// Wires the production adapters described by `config`.
    ///
    /// # Errors
    /// Returns an error if the identity client cannot be built.
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let settings = Arc::new(config.auth.clone());

        let mut verifier = WeChatIdentityVerifier::new(&settings, config.request_timeout())
            .context("failed to build identity client")?;
        if let Some(endpoint) = &config.identity_endpoint {
            verifier = verifier.with_endpoint(endpoint.clone());
        }

        let user_registry: Arc<dyn UserRegistry> = match &config.registry_path {
            Some(path) => {
                info!(path = %path.display(), "using file user registry");
                Arc::new(JsonFileUserRegistry::new(path))
            }
            None => {
                info!("using in-memory user registry");
                Arc::new(InMemoryUserRegistry::new())
            }
        };

        let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
        let collaborators = Collaborators {
            identity_verifier: Arc::new(verifier),
            credential_decryptor: Arc::new(WeChatDataDecryptor::new(settings.app_id())),
            user_registry,
            session_store: Arc::new(InMemorySessionStore::with_clock(Arc::clone(&clock))),
            clock,
        };

        Ok(Self::new(AuthService::new(settings, collaborators)))
    }
}
