//! Route handlers.
//!
//! Every operation answers with a [`ResponseEnvelope`]. Absent JSON fields
//! reach the workflows as `None` and are reported as missing parameters; a
//! body that is not a JSON object is reported as a missing `body`.

use axum::Json;
use axum::extract::State;
use mpauth_domain::ResponseEnvelope;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::AppState;

/// Body of `POST /authorize`.
#[derive(Debug, Default, Deserialize)]
pub struct AuthorizeRequest {
    /// One-time login code.
    #[serde(default)]
    pub code: Option<String>,
    /// Base64 encrypted profile.
    #[serde(default, alias = "encryptedData")]
    pub encrypted_data: Option<String>,
    /// Base64 initialisation vector.
    #[serde(default)]
    pub iv: Option<String>,
}

/// Body of `POST /refresh`.
#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    /// Subject whose sessions are replaced.
    #[serde(default, alias = "subjectId")]
    pub subject_id: Option<String>,
}

/// Body of `POST /validate`.
#[derive(Debug, Default, Deserialize)]
pub struct ValidateRequest {
    /// Token to check.
    #[serde(default)]
    pub token: Option<String>,
}

/// Payload of a `POST /validate` answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validity {
    /// Whether the token maps to a live session.
    pub valid: bool,
}

/// Liveness check.
pub async fn health() -> &'static str {
    "ok"
}

/// Authorizes a user from a login code and encrypted profile.
#[instrument(skip_all)]
pub async fn authorize(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<AuthorizeRequest>,
) -> Result<Json<ResponseEnvelope<String>>, ApiError> {
    let token = state
        .service
        .authorize(
            body.code.as_deref(),
            body.encrypted_data.as_deref(),
            body.iv.as_deref(),
        )
        .await?;
    Ok(Json(ResponseEnvelope::success(token.into_inner())))
}

/// Replaces every live session of a registered subject.
#[instrument(skip_all)]
pub async fn refresh(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RefreshRequest>,
) -> Result<Json<ResponseEnvelope<String>>, ApiError> {
    let token = state.service.refresh(body.subject_id.as_deref()).await?;
    Ok(Json(ResponseEnvelope::success(token.into_inner())))
}

/// Reports whether a token is live. Never fails.
#[instrument(skip_all)]
pub async fn validate(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ValidateRequest>,
) -> Json<ResponseEnvelope<Validity>> {
    let valid = state.service.is_token_valid(body.token.as_deref()).await;
    Json(ResponseEnvelope::success(Validity { valid }))
}
