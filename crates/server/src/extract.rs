//! Request extractors answering rejections with the failure envelope.

use axum::extract::{FromRequest, Request};

use crate::error::ApiError;

/// JSON body extractor.
///
/// Behaves like [`axum::Json`] but rejects with an [`ApiError`], so a
/// malformed body or a missing `Content-Type` is answered with the same
/// envelope as any other failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    axum::Json<T>: FromRequest<S, Rejection = axum::extract::rejection::JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
