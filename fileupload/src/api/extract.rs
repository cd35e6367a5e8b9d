//! Request extractors with the API's own rejections.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};

use crate::errors::Error;

/// JSON body extractor whose rejections render as [`Error`].
///
/// axum answers a body that parses but does not fit the target type (a string id, content
/// that is not base64) with 422. Clients here get 400 for any unusable body, except an
/// oversized one, which stays 413.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejection.into()),
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Error::PayloadTooLarge {
                message: rejection.body_text(),
            }
        } else {
            Error::BadRequest {
                message: rejection.body_text(),
            }
        }
    }
}
