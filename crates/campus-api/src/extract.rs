//! Request-body extraction.
//!
//! [`Json`] wraps [`axum::Json`] so every body-parse failure (missing
//! content type, malformed JSON, schema mismatch) surfaces as a 400 with
//! the usual `{"error": …}` envelope instead of axum's stock 415/422.

use axum::{
  extract::{FromRequest, Request, rejection::JsonRejection},
  response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::ApiError;

pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
  axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, ApiError> {
    match axum::Json::<T>::from_request(req, state).await {
      Ok(axum::Json(value)) => Ok(Json(value)),
      Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
    }
  }
}

impl<T: Serialize> IntoResponse for Json<T> {
  fn into_response(self) -> Response {
    axum::Json(self.0).into_response()
  }
}
