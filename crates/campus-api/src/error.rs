//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};
use campus_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("authentication required")]
  Unauthorized,

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("internal error: {0}")]
  Internal(String),
}

impl From<CoreError> for ApiError {
  fn from(e: CoreError) -> Self {
    match e {
      CoreError::UserNotFound(_)
      | CoreError::QuestionNotFound(_)
      | CoreError::AnswerNotFound(_)
      | CoreError::CommentNotFound(_)
      | CoreError::DiplomaNotFound(_) => ApiError::NotFound(e.to_string()),
      CoreError::NotQuestionAuthor => ApiError::Forbidden(e.to_string()),
      CoreError::UsernameTaken(_)
      | CoreError::StudentIdTaken(_)
      | CoreError::SerialTaken(_) => ApiError::Conflict(e.to_string()),
      CoreError::InvalidVoteValue(_) => ApiError::BadRequest(e.to_string()),
      CoreError::Serialization(_) | CoreError::Storage(_) => {
        ApiError::Internal(e.to_string())
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
      ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
      tracing::error!("internal error: {self}");
    }
    let body = Json(json!({ "error": self.to_string() }));
    if status == StatusCode::UNAUTHORIZED {
      (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
    } else {
      (status, body).into_response()
    }
  }
}
