//! Handlers for `/questions` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/questions` | `?search=&ordering=&limit=&offset=` |
//! | `POST`   | `/questions` | Tags attached by name (get-or-create) |
//! | `GET`    | `/questions/{id}` | Detail: answers + comments |
//! | `PATCH`  | `/questions/{id}` | Author or admin |
//! | `DELETE` | `/questions/{id}` | Author or admin |
//! | `POST`   | `/questions/{id}/vote` | Body `{"value":1\|-1}` |

use axum::{
  extract::{Path, Query, State},
  http::StatusCode,
};
use campus_core::{
  content::{NewQuestion, Question, QuestionDetail, QuestionUpdate},
  store::{PlatformStore, QuestionOrder, QuestionQuery},
  target::Target,
  user::Role,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState,
  auth::Identity,
  error::ApiError,
  extract::Json,
  votes::{VoteBody, VoteTotal},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub search:   Option<String>,
  pub ordering: Option<String>,
  pub limit:    Option<usize>,
  pub offset:   Option<usize>,
}

/// `GET /questions[?search=…&ordering=created_at|votes&limit=…&offset=…]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Question>>, ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  let order = match params.ordering.as_deref() {
    None | Some("created_at") => QuestionOrder::CreatedAt,
    Some("votes") => QuestionOrder::Votes,
    Some(other) => {
      return Err(ApiError::BadRequest(format!(
        "unknown ordering: {other:?} (expected created_at or votes)"
      )));
    }
  };
  let query = QuestionQuery {
    search: params.search,
    order,
    limit: params.limit,
    offset: params.offset,
  };
  Ok(Json(state.store.list_questions(&query).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub title: String,
  pub body:  String,
  #[serde(default)]
  pub tags:  Vec<String>,
}

/// `POST /questions`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Json(body): Json<CreateBody>,
) -> Result<(StatusCode, Json<Question>), ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  if body.title.trim().is_empty() {
    return Err(ApiError::BadRequest("title must not be empty".into()));
  }
  if body.body.trim().is_empty() {
    return Err(ApiError::BadRequest("body must not be empty".into()));
  }
  let question = state
    .store
    .create_question(NewQuestion {
      author_id: identity.0.user_id,
      title:     body.title,
      body:      body.body,
      tags:      body.tags,
    })
    .await?;
  Ok((StatusCode::CREATED, Json(question)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /questions/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<QuestionDetail>, ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  let detail = state
    .store
    .get_question(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("question {id} not found")))?;
  Ok(Json(detail))
}

// ─── Patch / delete ──────────────────────────────────────────────────────────

async fn require_author_or_admin<S>(
  state: &AppState<S>,
  identity: &Identity,
  id: Uuid,
) -> Result<(), ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  let detail = state
    .store
    .get_question(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("question {id} not found")))?;
  if detail.question.author_id != identity.0.user_id
    && identity.0.role != Role::Admin
  {
    return Err(ApiError::Forbidden(
      "only the author or an admin may modify a question".into(),
    ));
  }
  Ok(())
}

/// `PATCH /questions/{id}` — author or admin.
pub async fn patch<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Path(id): Path<Uuid>,
  Json(update): Json<QuestionUpdate>,
) -> Result<Json<Question>, ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  require_author_or_admin(&state, &identity, id).await?;
  Ok(Json(state.store.update_question(id, update).await?))
}

/// `DELETE /questions/{id}` — author or admin.
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  require_author_or_admin(&state, &identity, id).await?;
  state.store.delete_question(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Vote ─────────────────────────────────────────────────────────────────────

/// `POST /questions/{id}/vote` — body `{"value":1|-1}`, returns the new
/// counter.
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
    crate::votes::cast(&*state.store, &identity.0, Target::Question(id), body)
      .await?;
  Ok(Json(total))
}
