//! Handlers for `/users` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/users` | Public |
//! | `GET`    | `/users/me` | Authenticated |
//! | `GET`    | `/users/{id}` | 404 if not found |
//! | `PATCH`  | `/users/{id}` | Self or admin; `role` admin-only |
//! | `DELETE` | `/users/{id}` | Admin only |

use axum::{
  extract::{Path, State},
  http::StatusCode,
};
use campus_core::{
  store::PlatformStore,
  user::{ProfileUpdate, Role, User},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::Identity, error::ApiError, extract::Json};

/// `GET /users`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<User>>, ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  Ok(Json(state.store.list_users().await?))
}

/// `GET /users/me`
pub async fn me<S>(identity: Identity) -> Json<User>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  Json(identity.0)
}

/// `GET /users/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  let user = state
    .store
    .get_user(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))?;
  Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct UserPatch {
  #[serde(flatten)]
  pub profile: ProfileUpdate,
  /// Admin-only; rejected with 403 for everyone else.
  pub role:    Option<Role>,
}

/// `PATCH /users/{id}` — profile fields for the account owner or an admin;
/// the `role` field only for an admin.
pub async fn patch<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Path(id): Path<Uuid>,
  Json(body): Json<UserPatch>,
) -> Result<Json<User>, ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  let acting = identity.0;
  let is_admin = acting.role == Role::Admin;
  if acting.user_id != id && !is_admin {
    return Err(ApiError::Forbidden(
      "only the account owner or an admin may edit a profile".into(),
    ));
  }
  if body.role.is_some() && !is_admin {
    return Err(ApiError::Forbidden("only an admin may change roles".into()));
  }

  let mut user = state.store.update_profile(id, body.profile).await?;
  if let Some(role) = body.role {
    user = state.store.set_role(id, role).await?;
  }
  Ok(Json(user))
}

/// `DELETE /users/{id}` — admin only; cascades to everything authored.
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  if identity.0.role != Role::Admin {
    return Err(ApiError::Forbidden("only an admin may delete users".into()));
  }
  state.store.delete_user(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
