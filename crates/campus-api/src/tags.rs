//! Handlers for `/tags` endpoints.

use axum::{extract::State, http::StatusCode};
use campus_core::{content::Tag, store::PlatformStore};
use serde::Deserialize;

use crate::{AppState, auth::Identity, error::ApiError, extract::Json};

/// `GET /tags`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Tag>>, ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  Ok(Json(state.store.list_tags().await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name: String,
}

/// `POST /tags` — get-or-create by name, so re-posting an existing tag
/// returns it rather than conflicting.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  _identity: Identity,
  Json(body): Json<CreateBody>,
) -> Result<(StatusCode, Json<Tag>), ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("tag name must not be empty".into()));
  }
  let tag = state.store.get_or_create_tag(body.name).await?;
  Ok((StatusCode::CREATED, Json(tag)))
}
