use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use silo_core::ContentError;

use crate::error::HttpError;

/// `Json<T>` that maps a malformed body to the error envelope shape
/// (`{"error": {...}}`) instead of axum's plain-text default rejection.
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| HttpError::from(ContentError::invalid_input(rejection.to_string())))?;
        Ok(ValidJson(value))
    }
}
