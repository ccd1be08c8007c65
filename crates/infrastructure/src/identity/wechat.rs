//! WeChat `jscode2session` identity exchange.
//!
//! Trades a mini-program login code for the user's session key and open id
//! (plus union id when the mini-program is bound to an open-platform account).

use std::time::Duration;

use async_trait::async_trait;
use mpauth_application::ports::{IdentityError, IdentityVerifier, SessionSecret, VerifiedIdentity};
use mpauth_domain::{AuthSettings, IdentityClaims};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Production endpoint of the code exchange.
pub const DEFAULT_CODE2SESSION_URL: &str = "https://api.weixin.qq.com/sns/jscode2session";

/// Default timeout of one exchange request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Response body of `jscode2session`.
///
/// On failure the provider still answers 200 with a non-zero `errcode`.
#[derive(Debug, Deserialize)]
struct Code2SessionResponse {
    #[serde(default)]
    openid: Option<String>,
    #[serde(default)]
    session_key: Option<String>,
    #[serde(default)]
    unionid: Option<String>,
    #[serde(default)]
    errcode: Option<i64>,
    #[serde(default)]
    errmsg: Option<String>,
}

/// Identity verifier backed by the WeChat code exchange.
pub struct WeChatIdentityVerifier {
    http_client: Client,
    endpoint: Url,
    app_id: String,
    app_secret: String,
}

impl WeChatIdentityVerifier {
    /// Creates a verifier for the app described by `settings`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(settings: &AuthSettings, timeout: Duration) -> Result<Self, IdentityError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| IdentityError::Request(e.to_string()))?;
        let endpoint = Url::parse(DEFAULT_CODE2SESSION_URL)
            .map_err(|e| IdentityError::Request(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint,
            app_id: settings.app_id().to_string(),
            app_secret: settings.app_secret().to_string(),
        })
    }

    /// Points the verifier at another endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Builds the exchange URL for `code`.
    fn request_url(&self, code: &str) -> Result<Url, IdentityError> {
        let params = [
            ("appid", self.app_id.as_str()),
            ("secret", self.app_secret.as_str()),
            ("js_code", code),
            ("grant_type", "authorization_code"),
        ];
        let query = serde_urlencoded::to_string(params)
            .map_err(|e| IdentityError::Request(format!("failed to encode query: {e}")))?;

        let mut url = self.endpoint.clone();
        url.set_query(Some(&query));
        Ok(url)
    }

    /// Classifies reqwest failures.
    fn map_error(error: &reqwest::Error) -> IdentityError {
        if error.is_timeout() {
            IdentityError::Timeout
        } else if error.is_connect() {
            IdentityError::Connection(error.to_string())
        } else {
            IdentityError::Request(error.to_string())
        }
    }

    fn parse_body(body: &str) -> Result<VerifiedIdentity, IdentityError> {
        if body.trim().is_empty() {
            return Err(IdentityError::EmptyResponse);
        }

        let response: Code2SessionResponse = serde_json::from_str(body)
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))?;

        if let Some(code) = response.errcode.filter(|code| *code != 0) {
            return Err(IdentityError::Provider {
                code,
                message: response.errmsg.unwrap_or_default(),
            });
        }

        let session_key = response
            .session_key
            .filter(|key| !key.is_empty())
            .ok_or_else(|| IdentityError::InvalidResponse("missing session_key".to_string()))?;
        let open_id = response
            .openid
            .filter(|id| !id.is_empty())
            .ok_or_else(|| IdentityError::InvalidResponse("missing openid".to_string()))?;

        let mut claims = IdentityClaims::open(open_id);
        claims.union_id = response.unionid.filter(|id| !id.is_empty());

        Ok(VerifiedIdentity {
            session_secret: SessionSecret::new(session_key),
            claims,
        })
    }
}

#[async_trait]
impl IdentityVerifier for WeChatIdentityVerifier {
    async fn exchange(&self, code: &str) -> Result<VerifiedIdentity, IdentityError> {
        let url = self.request_url(code)?;
        debug!(endpoint = %self.endpoint, "exchanging login code");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::map_error(&e))?;

        if response.status() != StatusCode::OK {
            return Err(IdentityError::HttpStatus(response.status().as_u16()));
        }

        let body = response.text().await.map_err(|e| Self::map_error(&e))?;
        Self::parse_body(&body)
    }
}
