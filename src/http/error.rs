//! HTTP error handling.
//!
//! Failures are rendered with the same envelope as successes. Storage
//! internals never reach the wire: validation and constraint failures carry
//! their caller-correctable messages, everything else becomes a generic 500
//! with the detail kept in the server log.

use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use super::dto::Envelope;
use crate::db::repository::RepositoryError;

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Structural validation failed; carries the individual violations.
    Validation(Vec<String>),
    /// Invalid request (malformed parameter, empty payload).
    BadRequest(String),
    /// Resource not found.
    NotFound(String),
    /// Internal server error; the message is logged, not sent.
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, envelope) = match self {
            AppError::Validation(violations) => (
                StatusCode::BAD_REQUEST,
                Envelope::<()>::fail(format!("Invalid set data: {}", violations.join(", ")))
                    .with_errors(violations),
            ),
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Envelope::<()>::fail(message))
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, Envelope::<()>::fail(message)),
            AppError::Internal(message) => {
                tracing::error!("internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Envelope::<()>::fail("Internal server error"),
                )
            }
        };

        (status, Json(envelope)).into_response()
    }
}

/// JSON body extractor whose rejection is rendered with the envelope.
///
/// axum's stock `Json` answers an undeserializable body (unknown
/// `set_type`, malformed JSON) with a plain-text 422; every response on
/// this API is enveloped, so the rejection is remapped to a 400 here.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ValidationError { violations, .. } => AppError::Validation(violations),
            // Constraint messages are written for callers (unknown user or
            // exercise, duplicate record) and safe to expose.
            RepositoryError::ConstraintError { message, .. } => AppError::BadRequest(message),
            RepositoryError::NotFound { message, .. } => AppError::NotFound(message),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
