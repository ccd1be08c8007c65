//! Router tests driving the HTTP surface with stubbed identity ports.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tower::ServiceExt;

use mpauth_application::ports::{
    Clock, CredentialDecryptor, DecryptError, IdentityError, IdentityVerifier, SessionSecret,
    VerifiedIdentity,
};
use mpauth_application::{AuthService, Collaborators};
use mpauth_domain::{AuthSettings, IdentityClaims};
use mpauth_infrastructure::{InMemorySessionStore, InMemoryUserRegistry, SystemClock};
use mpauth_server::{AppState, router};

struct StubVerifier(Result<IdentityClaims, IdentityError>);

#[async_trait]
impl IdentityVerifier for StubVerifier {
    async fn exchange(&self, _code: &str) -> Result<VerifiedIdentity, IdentityError> {
        self.0.clone().map(|claims| VerifiedIdentity {
            session_secret: SessionSecret::new("key"),
            claims,
        })
    }
}

struct StubDecryptor(Result<IdentityClaims, DecryptError>);

#[async_trait]
impl CredentialDecryptor for StubDecryptor {
    async fn decrypt(
        &self,
        _secret: &SessionSecret,
        _payload: &str,
        _iv: &str,
    ) -> Result<IdentityClaims, DecryptError> {
        self.0.clone()
    }
}

fn state(
    online: Result<IdentityClaims, IdentityError>,
    offline: Result<IdentityClaims, DecryptError>,
) -> AppState {
    let settings = AuthSettings::builder()
        .app_id("wx-app")
        .app_secret("secret")
        .sku("app-v1")
        .build()
        .unwrap();
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    AppState::new(AuthService::new(
        Arc::new(settings),
        Collaborators {
            identity_verifier: Arc::new(StubVerifier(online)),
            credential_decryptor: Arc::new(StubDecryptor(offline)),
            user_registry: Arc::new(InMemoryUserRegistry::new()),
            session_store: Arc::new(InMemorySessionStore::with_clock(Arc::clone(&clock))),
            clock,
        },
    ))
}

fn happy_state() -> AppState {
    state(
        Ok(IdentityClaims::open("u123")),
        Ok(IdentityClaims::open("u123")),
    )
}

async fn post(state: &AppState, uri: &str, body: Value) -> (StatusCode, Value) {
    post_raw(state, uri, Some("application/json"), body.to_string()).await
}

async fn post_raw(
    state: &AppState,
    uri: &str,
    content_type: Option<&str>,
    body: impl Into<Body>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method("POST").uri(uri);
    if let Some(content_type) = content_type {
        request = request.header(header::CONTENT_TYPE, content_type);
    }
    let request = request.body(body.into()).unwrap();

    let response = router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn authorize(state: &AppState) -> String {
    let (status, body) = post(
        state,
        "/authorize",
        json!({"code": "c", "encrypted_data": "d", "iv": "i"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["response"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let response = router(happy_state())
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok");
}

#[tokio::test]
async fn test_authorize_success_envelope() {
    let state = happy_state();

    let (status, body) = post(
        &state,
        "/authorize",
        json!({"code": "c", "encryptedData": "d", "iv": "i"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status_code"], 1);
    assert_eq!(body["status_message"], "OK");
    assert!(body["response"].as_str().unwrap().starts_with("u123|app-v1|"));
}

#[tokio::test]
async fn test_authorize_missing_code() {
    let (status, body) = post(
        &happy_state(),
        "/authorize",
        json!({"encrypted_data": "d", "iv": "i"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status_code"], 6001);
    assert_eq!(body["status_message"], "missing code parameter");
    assert_eq!(body["response"], Value::Null);
}

#[tokio::test]
async fn test_authorize_identity_mismatch() {
    let state = state(
        Ok(IdentityClaims::open("u123")),
        Ok(IdentityClaims::open("u999")),
    );

    let (status, body) = post(
        &state,
        "/authorize",
        json!({"code": "c", "encrypted_data": "d", "iv": "i"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status_code"], 6009);
}

#[tokio::test]
async fn test_authorize_upstream_failure() {
    let state = state(
        Err(IdentityError::Timeout),
        Ok(IdentityClaims::open("u123")),
    );

    let (status, body) = post(
        &state,
        "/authorize",
        json!({"code": "c", "encrypted_data": "d", "iv": "i"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["status_code"], 6008);
}

#[tokio::test]
async fn test_refresh_then_validate() {
    let state = happy_state();
    let first = authorize(&state).await;

    let (status, body) = post(&state, "/refresh", json!({"subject_id": "u123"})).await;
    assert_eq!(status, StatusCode::OK);
    let refreshed = body["response"].as_str().unwrap().to_string();
    assert_ne!(refreshed, first);

    let (_, old) = post(&state, "/validate", json!({"token": first})).await;
    let (_, new) = post(&state, "/validate", json!({"token": refreshed})).await;
    assert_eq!(old["response"], json!({"valid": false}));
    assert_eq!(new["response"], json!({"valid": true}));
}

#[tokio::test]
async fn test_refresh_unknown_and_malformed_subjects() {
    let state = happy_state();

    let (status, body) = post(&state, "/refresh", json!({"subjectId": "ghost"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status_code"], 6012);

    let (status, body) = post(&state, "/refresh", json!({"subject_id": "a|b"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status_code"], 6014);

    let (status, body) = post(&state, "/refresh", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status_code"], 6001);
}

#[tokio::test]
async fn test_validate_without_token_is_false() {
    let (status, body) = post(&happy_state(), "/validate", json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status_code"], 1);
    assert_eq!(body["response"]["valid"], false);
}

#[tokio::test]
async fn test_malformed_json_is_a_missing_body() {
    let state = happy_state();

    for uri in ["/authorize", "/refresh", "/validate"] {
        let (status, body) = post_raw(&state, uri, Some("application/json"), "{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["status_code"], 6001, "{uri}");
        assert_eq!(body["status_message"], "missing body parameter", "{uri}");
        assert_eq!(body["response"], Value::Null, "{uri}");
    }
}

#[tokio::test]
async fn test_wrong_field_type_is_a_missing_body() {
    let (status, body) = post(&happy_state(), "/authorize", json!({"code": 5})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status_code"], 6001);
}

#[tokio::test]
async fn test_missing_content_type_is_a_missing_body() {
    let (status, body) = post_raw(
        &happy_state(),
        "/refresh",
        None,
        json!({"subject_id": "u123"}).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status_code"], 6001);
    assert_eq!(body["status_message"], "missing body parameter");
}

#[tokio::test]
async fn test_oversized_body_is_an_unknown_error() {
    let oversized = format!(r#"{{"token":"{}"}}"#, "a".repeat(3 * 1024 * 1024));

    let (status, body) = post_raw(
        &happy_state(),
        "/validate",
        Some("application/json"),
        oversized,
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status_code"], 9999);
    assert!(
        body["status_message"]
            .as_str()
            .unwrap()
            .starts_with("unknown error: ")
    );
}
