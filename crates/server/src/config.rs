//! Server configuration.
//!
//! Values are layered from an optional `mpauth.{toml,yaml,json}` file and
//! environment variables prefixed `MPAUTH__`, with nested keys separated by
//! `__` (for example `MPAUTH__AUTH__APP_ID`).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use mpauth_domain::AuthSettings;
use serde::Deserialize;
use url::Url;

/// Base name of the optional configuration file.
pub const CONFIG_FILE: &str = "mpauth";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "MPAUTH";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// `host:port` does not form a socket address.
    #[error("invalid listen address '{0}'")]
    InvalidAddress(String),
}

/// Complete server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// JSON file backing the user registry; in-memory when absent.
    #[serde(default)]
    pub registry_path: Option<PathBuf>,

    /// Code exchange endpoint; the WeChat production endpoint when absent.
    #[serde(default)]
    pub identity_endpoint: Option<Url>,

    /// Timeout of one code exchange request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Session settings.
    pub auth: AuthSettings,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

const fn default_request_timeout_secs() -> u64 {
    mpauth_infrastructure::DEFAULT_REQUEST_TIMEOUT.as_secs()
}

impl ServerConfig {
    /// Loads configuration from `mpauth.*` in the working directory and the
    /// environment.
    ///
    /// # Errors
    /// Returns an error if a source is malformed or a required key is missing.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Loads configuration from the file named `base` (any supported
    /// extension, optional) and the environment.
    ///
    /// # Errors
    /// Returns an error if a source is malformed or a required key is missing.
    pub fn load_from(base: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(base).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Socket address to listen on.
    ///
    /// # Errors
    /// Returns an error if `host` and `port` do not form an address.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }

    /// Timeout of one code exchange request.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
