//! Mapping of workflow failures onto HTTP responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mpauth_application::AuthError;
use mpauth_domain::{ErrorKind, ResponseEnvelope};
use serde_json::Value;
use tracing::{debug, error, warn};

/// Failure returned by a route.
///
/// Rendered as a failure envelope carrying the kind's status code and the
/// error message.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub AuthError);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(rejection = %rejection.body_text(), "request body rejected");
        let error = match rejection {
            JsonRejection::JsonDataError(_)
            | JsonRejection::JsonSyntaxError(_)
            | JsonRejection::MissingJsonContentType(_) => AuthError::MissingParameter("body"),
            other => AuthError::Unknown(other.body_text()),
        };
        Self(error)
    }
}

/// HTTP status reported for each failure kind.
#[must_use]
pub const fn http_status(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::MissingParameter | ErrorKind::MalformedIdentifier => StatusCode::BAD_REQUEST,
        ErrorKind::IdentityMismatch | ErrorKind::DecryptionError => StatusCode::UNAUTHORIZED,
        ErrorKind::UserNotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::UpstreamIdentityError => StatusCode::BAD_GATEWAY,
        ErrorKind::RegistryError
        | ErrorKind::SessionStoreError
        | ErrorKind::InternalConsistency
        | ErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = http_status(kind);
        if status.is_server_error() {
            error!(kind = kind.as_str(), error = %self.0, "request failed");
        } else {
            warn!(kind = kind.as_str(), error = %self.0, "request rejected");
        }

        let envelope = ResponseEnvelope::<Value>::failure(kind, self.0.to_string());
        (status, Json(envelope)).into_response()
    }
}
