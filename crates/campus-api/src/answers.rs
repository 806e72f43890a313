//! Handlers for `/answers` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/answers` | Public; `?question_id=` filter |
//! | `POST`   | `/answers` | Body: `{"question_id":…,"body":…}` |
//! | `GET`    | `/answers/{id}` | 404 if not found |
//! | `PATCH`  | `/answers/{id}` | Author or admin |
//! | `DELETE` | `/answers/{id}` | Author or admin |
//! | `POST`   | `/answers/{id}/vote` | Body `{"value":1\|-1}` |
//! | `POST`   | `/answers/{id}/mark_best` | Question author only |

use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
};
use campus_core::{
  content::{Answer, AnswerUpdate, NewAnswer},
  store::PlatformStore,
  target::Target,
  user::Role,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
  AppState,
  auth::Identity,
  error::ApiError,
  extract::Json,
  votes::{VoteBody, VoteTotal},
};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub question_id: Option<Uuid>,
}

/// `GET /answers` — optionally filtered to one question.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Answer>>, ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  Ok(Json(state.store.list_answers(params.question_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub question_id: Uuid,
  pub body:        String,
}

/// `POST /answers`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Json(body): Json<CreateBody>,
) -> Result<(StatusCode, Json<Answer>), ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  if body.body.trim().is_empty() {
    return Err(ApiError::BadRequest("body must not be empty".into()));
  }
  let answer = state
    .store
    .create_answer(NewAnswer {
      question_id: body.question_id,
      author_id:   identity.0.user_id,
      body:        body.body,
    })
    .await?;
  Ok((StatusCode::CREATED, Json(answer)))
}

/// `GET /answers/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Answer>, ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  let answer = state
    .store
    .get_answer(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("answer {id} not found")))?;
  Ok(Json(answer))
}

/// `PATCH /answers/{id}` — author or admin.
pub async fn patch<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Path(id): Path<Uuid>,
  Json(update): Json<AnswerUpdate>,
) -> Result<Json<Answer>, ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  let answer = state
    .store
    .get_answer(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("answer {id} not found")))?;
  if answer.author_id != identity.0.user_id && identity.0.role != Role::Admin
  {
    return Err(ApiError::Forbidden(
      "only the author or an admin may edit an answer".into(),
    ));
  }
  if let Some(body) = &update.body {
    if body.trim().is_empty() {
      return Err(ApiError::BadRequest("body must not be empty".into()));
    }
  }
  Ok(Json(state.store.update_answer(id, update).await?))
}

/// `DELETE /answers/{id}` — author or admin.
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  let answer = state
    .store
    .get_answer(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("answer {id} not found")))?;
  if answer.author_id != identity.0.user_id && identity.0.role != Role::Admin
  {
    return Err(ApiError::Forbidden(
      "only the author or an admin may delete an answer".into(),
    ));
  }
  state.store.delete_answer(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /answers/{id}/vote` — body `{"value":1|-1}`.
pub async fn vote<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Path(id): Path<Uuid>,
  Json(body): Json<VoteBody>,
) -> Result<Json<VoteTotal>, ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  let total =
    crate::votes::cast(&*state.store, &identity.0, Target::Answer(id), body)
      .await?;
  Ok(Json(total))
}

/// `POST /answers/{id}/mark_best` — only the question's author; clears any
/// previous best answer in the same transaction.
pub async fn mark_best<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  state.store.mark_best(id, identity.0.user_id).await?;
  Ok(Json(json!({ "status": "marked as best" })))
}
