//! Request Extractors

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};

use crate::utils::AppError;

/// JSON body extractor whose rejection carries the API error envelope.
///
/// Axum's stock [`Json`] rejection answers with plain text (422 for a
/// mistyped body); this wrapper turns any body problem into
/// [`AppError::Validation`] so clients always get the
/// `{"status": "fail", "message": ...}` shape with a 400.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(AppError::validation(rejection.body_text())),
        }
    }
}
