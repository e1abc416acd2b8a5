use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::AppError;

/// A `Json<T>` wrapper that reports body rejections (bad syntax, wrong field
/// types, missing content type) as `AppError::Validation`, so clients get the
/// same structured 400 as for a missing field.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                debug!(status = %rejection.status(), "Rejected JSON body");
                AppError::Validation(rejection.body_text())
            })?;
        Ok(AppJson(value))
    }
}
