use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use silo_core::ContentError;
use silo_sign::SignError;

/// Wraps any error the HTTP layer needs to turn into a response. Mirrors
/// `dog_axum::DogAxumError`: a single newtype around `anyhow::Error` that
/// downcasts back to the domain error to recover its status code, falling
/// back to 500 for anything else.
#[derive(Debug)]
pub struct HttpError(pub anyhow::Error);

impl<E> From<E> for HttpError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        if let Some(err) = self.0.downcast_ref::<ContentError>() {
            let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return (
                status,
                Json(json!({ "error": { "code": err.kind_name(), "message": err.to_string() } })),
            )
                .into_response();
        }

        if let Some(err) = self.0.downcast_ref::<SignError>() {
            let status = match err {
                SignError::MissingSignature => StatusCode::UNAUTHORIZED,
                SignError::SignatureExpired | SignError::InvalidSignature => StatusCode::FORBIDDEN,
                SignError::MissingExpiration | SignError::InvalidExpiration => StatusCode::BAD_REQUEST,
            };
            return (status, Json(json!({ "error": err.to_string() }))).into_response();
        }

        tracing::error!(error = %self.0, "unhandled error in silo-http");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

pub type HttpResult<T> = Result<T, HttpError>;
