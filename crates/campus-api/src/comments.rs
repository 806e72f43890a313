//! Handlers for `/comments` endpoints.
//!
//! Comments address their target with the same tagged form everywhere:
//! `{"kind":"question"|"answer","id":<uuid>}`.

use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
};
use campus_core::{
  content::{Comment, NewComment},
  store::PlatformStore,
  target::Target,
  user::Role,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::Identity, error::ApiError, extract::Json};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub kind: String,
  pub id:   Uuid,
}

/// `GET /comments?kind=question|answer&id=<uuid>`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Comment>>, ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  let target = match params.kind.as_str() {
    "question" => Target::Question(params.id),
    "answer" => Target::Answer(params.id),
    other => {
      return Err(ApiError::BadRequest(format!(
        "unknown target kind: {other:?} (expected question or answer)"
      )));
    }
  };
  Ok(Json(state.store.list_comments(target).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  #[serde(flatten)]
  pub target: Target,
  pub body:   String,
}

/// `POST /comments` — body: `{"kind":…,"id":…,"body":…}`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Json(body): Json<CreateBody>,
) -> Result<(StatusCode, Json<Comment>), ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  if body.body.trim().is_empty() {
    return Err(ApiError::BadRequest("body must not be empty".into()));
  }
  let comment = state
    .store
    .create_comment(NewComment {
      author_id: identity.0.user_id,
      target:    body.target,
      body:      body.body,
    })
    .await?;
  Ok((StatusCode::CREATED, Json(comment)))
}

/// `DELETE /comments/{id}` — author or admin.
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  let comment = state
    .store
    .get_comment(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("comment {id} not found")))?;
  if comment.author_id != identity.0.user_id
    && identity.0.role != Role::Admin
  {
    return Err(ApiError::Forbidden(
      "only the author or an admin may delete a comment".into(),
    ));
  }
  state.store.delete_comment(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
