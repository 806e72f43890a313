//! JSON REST API for the Campus platform.
//!
//! Exposes an axum [`Router`] backed by any
//! [`campus_core::store::PlatformStore`]. Reads are public; writes require a
//! Bearer token (see [`auth`]). TLS and transport concerns are the caller's
//! responsibility.

pub mod answers;
pub mod auth;
pub mod comments;
pub mod diplomas;
pub mod error;
pub mod extract;
pub mod questions;
pub mod tags;
pub mod users;
pub mod votes;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, post},
};
use campus_core::store::PlatformStore;

pub use auth::TokenKeys;
pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// The slice of server configuration the handlers need.
#[derive(Clone)]
pub struct ApiConfig {
  /// External base URL, embedded in diploma QR codes.
  pub base_url:       String,
  /// Directory where QR artifacts are written.
  pub artifact_dir:   PathBuf,
  /// Secret for diploma signature digests. Blank disables signing.
  pub signing_secret: String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: PlatformStore> {
  pub store:  Arc<S>,
  pub config: Arc<ApiConfig>,
  pub tokens: Arc<TokenKeys>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised [`Router`] for the platform.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Auth
    .route("/auth/register", post(auth::register::<S>))
    .route("/auth/token", post(auth::token::<S>))
    .route("/auth/token/refresh", post(auth::refresh::<S>))
    // Users
    .route("/users", get(users::list::<S>))
    .route("/users/me", get(users::me::<S>))
    .route(
      "/users/{id}",
      get(users::get_one::<S>)
        .patch(users::patch::<S>)
        .delete(users::remove::<S>),
    )
    // Tags
    .route("/tags", get(tags::list::<S>).post(tags::create::<S>))
    // Questions
    .route(
      "/questions",
      get(questions::list::<S>).post(questions::create::<S>),
    )
    .route(
      "/questions/{id}",
      get(questions::get_one::<S>)
        .patch(questions::patch::<S>)
        .delete(questions::remove::<S>),
    )
    .route("/questions/{id}/vote", post(questions::vote::<S>))
    // Answers
    .route("/answers", get(answers::list::<S>).post(answers::create::<S>))
    .route(
      "/answers/{id}",
      get(answers::get_one::<S>)
        .patch(answers::patch::<S>)
        .delete(answers::remove::<S>),
    )
    .route("/answers/{id}/vote", post(answers::vote::<S>))
    .route("/answers/{id}/mark_best", post(answers::mark_best::<S>))
    // Comments
    .route(
      "/comments",
      get(comments::list::<S>).post(comments::create::<S>),
    )
    .route("/comments/{id}", delete(comments::remove::<S>))
    // Diplomas
    .route(
      "/diplomas",
      get(diplomas::list::<S>).post(diplomas::create::<S>),
    )
    .route(
      "/diplomas/{id}",
      get(diplomas::get_one::<S>).delete(diplomas::remove::<S>),
    )
    .route("/diplomas/{id}/sign", post(diplomas::sign::<S>))
    .route("/diplomas/{id}/verify", get(diplomas::verify::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use campus_core::user::Role;
  use campus_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let artifact_dir =
      std::env::temp_dir().join(format!("campus-api-test-{}", Uuid::new_v4()));
    AppState {
      store:  Arc::new(store),
      config: Arc::new(ApiConfig {
        base_url: "http://localhost:8000".to_string(),
        artifact_dir,
        signing_secret: "test-signing-secret".to_string(),
      }),
      tokens: Arc::new(TokenKeys::new(b"test-jwt-secret", 60, 24 * 60)),
    }
  }

  async fn send(
    state: AppState<SqliteStore>,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
      builder =
        builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    router(state).oneshot(req).await.unwrap()
  }

  async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  /// Register a user and log them in; returns (user_id, access token).
  async fn signup(
    state: &AppState<SqliteStore>,
    username: &str,
  ) -> (Uuid, String) {
    let resp = send(
      state.clone(),
      "POST",
      "/auth/register",
      None,
      Some(json!({
        "username": username,
        "email": format!("{username}@example.sn"),
        "password": "hunter2",
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let user = json_body(resp).await;
    let user_id = Uuid::parse_str(user["user_id"].as_str().unwrap()).unwrap();

    let resp = send(
      state.clone(),
      "POST",
      "/auth/token",
      None,
      Some(json!({ "username": username, "password": "hunter2" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let tokens = json_body(resp).await;
    (user_id, tokens["access"].as_str().unwrap().to_string())
  }

  /// An admin account, promoted directly through the store.
  async fn admin(state: &AppState<SqliteStore>) -> String {
    use campus_core::store::PlatformStore as _;
    let (user_id, _) = signup(state, "registrar").await;
    state.store.set_role(user_id, Role::Admin).await.unwrap();
    // New token so the test exercises the re-read on extraction too.
    let resp = send(
      state.clone(),
      "POST",
      "/auth/token",
      None,
      Some(json!({ "username": "registrar", "password": "hunter2" })),
    )
    .await;
    json_body(resp).await["access"].as_str().unwrap().to_string()
  }

  async fn make_question(
    state: &AppState<SqliteStore>,
    token: &str,
    title: &str,
  ) -> Uuid {
    let resp = send(
      state.clone(),
      "POST",
      "/questions",
      Some(token),
      Some(json!({ "title": title, "body": "body", "tags": ["rust"] })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let q = json_body(resp).await;
    Uuid::parse_str(q["question_id"].as_str().unwrap()).unwrap()
  }

  // ── Auth ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn register_returns_user_without_password() {
    let state = make_state().await;
    let resp = send(
      state,
      "POST",
      "/auth/register",
      None,
      Some(json!({
        "username": "alice",
        "email": "alice@example.sn",
        "password": "hunter2",
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let user = json_body(resp).await;
    assert_eq!(user["username"], "alice");
    assert_eq!(user["role"], "STUDENT");
    assert!(user.get("password").is_none());
    assert!(user.get("password_hash").is_none());
  }

  #[tokio::test]
  async fn register_duplicate_username_is_409() {
    let state = make_state().await;
    signup(&state, "alice").await;
    let resp = send(
      state,
      "POST",
      "/auth/register",
      None,
      Some(json!({
        "username": "alice",
        "email": "other@example.sn",
        "password": "hunter2",
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
  }

  #[tokio::test]
  async fn register_cannot_claim_registrar_role() {
    let state = make_state().await;
    let resp = send(
      state,
      "POST",
      "/auth/register",
      None,
      Some(json!({
        "username": "mallory",
        "email": "mallory@example.sn",
        "password": "hunter2",
        "role": "ADMIN",
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  }

  #[tokio::test]
  async fn token_rejects_wrong_password() {
    let state = make_state().await;
    signup(&state, "alice").await;
    let resp = send(
      state,
      "POST",
      "/auth/token",
      None,
      Some(json!({ "username": "alice", "password": "wrong" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn me_returns_the_authenticated_user() {
    let state = make_state().await;
    let (user_id, token) = signup(&state, "alice").await;
    let resp = send(state, "GET", "/users/me", Some(&token), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let user = json_body(resp).await;
    assert_eq!(user["user_id"], user_id.to_string());
  }

  #[tokio::test]
  async fn refresh_exchanges_refresh_for_access() {
    let state = make_state().await;
    signup(&state, "alice").await;
    let resp = send(
      state.clone(),
      "POST",
      "/auth/token",
      None,
      Some(json!({ "username": "alice", "password": "hunter2" })),
    )
    .await;
    let tokens = json_body(resp).await;
    let access = tokens["access"].as_str().unwrap().to_string();
    let refresh = tokens["refresh"].as_str().unwrap().to_string();

    // An access token is not accepted at the refresh endpoint.
    let resp = send(
      state.clone(),
      "POST",
      "/auth/token/refresh",
      None,
      Some(json!({ "refresh": access })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = send(
      state.clone(),
      "POST",
      "/auth/token/refresh",
      None,
      Some(json!({ "refresh": refresh })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fresh = json_body(resp).await["access"]
      .as_str()
      .unwrap()
      .to_string();

    let resp = send(state, "GET", "/users/me", Some(&fresh), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn refresh_token_cannot_authenticate_requests() {
    let state = make_state().await;
    signup(&state, "alice").await;
    let resp = send(
      state.clone(),
      "POST",
      "/auth/token",
      None,
      Some(json!({ "username": "alice", "password": "hunter2" })),
    )
    .await;
    let refresh = json_body(resp).await["refresh"]
      .as_str()
      .unwrap()
      .to_string();

    let resp = send(state, "GET", "/users/me", Some(&refresh), None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn writes_require_a_token() {
    let state = make_state().await;
    let resp = send(
      state,
      "POST",
      "/questions",
      None,
      Some(json!({ "title": "t", "body": "b" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
  }

  // ── Users ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn role_is_not_self_editable() {
    let state = make_state().await;
    let (user_id, token) = signup(&state, "alice").await;
    let resp = send(
      state,
      "PATCH",
      &format!("/users/{user_id}"),
      Some(&token),
      Some(json!({ "role": "ADMIN" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  }

  #[tokio::test]
  async fn admin_can_change_roles() {
    let state = make_state().await;
    let (user_id, _) = signup(&state, "alice").await;
    let admin_token = admin(&state).await;
    let resp = send(
      state,
      "PATCH",
      &format!("/users/{user_id}"),
      Some(&admin_token),
      Some(json!({ "role": "TEACHER" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["role"], "TEACHER");
  }

  #[tokio::test]
  async fn profile_patch_by_stranger_is_403() {
    let state = make_state().await;
    let (user_id, _) = signup(&state, "alice").await;
    let (_, bob_token) = signup(&state, "bob").await;
    let resp = send(
      state,
      "PATCH",
      &format!("/users/{user_id}"),
      Some(&bob_token),
      Some(json!({ "bio": "hijacked" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  }

  // ── Questions & votes ────────────────────────────────────────────────────

  #[tokio::test]
  async fn question_detail_includes_tags() {
    let state = make_state().await;
    let (_, token) = signup(&state, "alice").await;
    let qid = make_question(&state, &token, "Lifetimes?").await;

    let resp =
      send(state, "GET", &format!("/questions/{qid}"), None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let detail = json_body(resp).await;
    assert_eq!(detail["title"], "Lifetimes?");
    assert_eq!(detail["tags"][0]["name"], "rust");
    assert_eq!(detail["answers"], json!([]));
  }

  #[tokio::test]
  async fn vote_toggles_off_when_recast() {
    let state = make_state().await;
    let (_, token) = signup(&state, "alice").await;
    let (_, voter) = signup(&state, "bob").await;
    let qid = make_question(&state, &token, "Q").await;
    let uri = format!("/questions/{qid}/vote");

    let resp = send(
      state.clone(),
      "POST",
      &uri,
      Some(&voter),
      Some(json!({ "value": 1 })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["votes"], 1);

    let resp = send(
      state.clone(),
      "POST",
      &uri,
      Some(&voter),
      Some(json!({ "value": 1 })),
    )
    .await;
    assert_eq!(json_body(resp).await["votes"], 0);
  }

  #[tokio::test]
  async fn vote_with_invalid_value_is_400() {
    let state = make_state().await;
    let (_, token) = signup(&state, "alice").await;
    let qid = make_question(&state, &token, "Q").await;

    let resp = send(
      state,
      "POST",
      &format!("/questions/{qid}/vote"),
      Some(&token),
      Some(json!({ "value": 5 })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn question_delete_is_author_or_admin_only() {
    let state = make_state().await;
    let (_, author) = signup(&state, "alice").await;
    let (_, stranger) = signup(&state, "bob").await;
    let qid = make_question(&state, &author, "Q").await;
    let uri = format!("/questions/{qid}");

    let resp = send(state.clone(), "DELETE", &uri, Some(&stranger), None).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = send(state.clone(), "DELETE", &uri, Some(&author), None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(state, "GET", &uri, None, None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  // ── Answers ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn mark_best_is_question_author_only() {
    let state = make_state().await;
    let (_, asker) = signup(&state, "alice").await;
    let (_, answerer) = signup(&state, "bob").await;
    let qid = make_question(&state, &asker, "Q").await;

    let resp = send(
      state.clone(),
      "POST",
      "/answers",
      Some(&answerer),
      Some(json!({ "question_id": qid, "body": "try this" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let aid = json_body(resp).await["answer_id"]
      .as_str()
      .unwrap()
      .to_string();
    let uri = format!("/answers/{aid}/mark_best");

    let resp = send(state.clone(), "POST", &uri, Some(&answerer), None).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = send(state.clone(), "POST", &uri, Some(&asker), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["status"], "marked as best");

    let resp =
      send(state, "GET", &format!("/answers/{aid}"), None, None).await;
    assert_eq!(json_body(resp).await["is_best_answer"], true);
  }

  #[tokio::test]
  async fn answer_patch_is_author_or_admin_only() {
    let state = make_state().await;
    let (_, asker) = signup(&state, "alice").await;
    let (_, answerer) = signup(&state, "bob").await;
    let qid = make_question(&state, &asker, "Q").await;

    let resp = send(
      state.clone(),
      "POST",
      "/answers",
      Some(&answerer),
      Some(json!({ "question_id": qid, "body": "first draft" })),
    )
    .await;
    let aid = json_body(resp).await["answer_id"]
      .as_str()
      .unwrap()
      .to_string();
    let uri = format!("/answers/{aid}");

    let resp = send(
      state.clone(),
      "PATCH",
      &uri,
      Some(&asker),
      Some(json!({ "body": "hijacked" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = send(
      state.clone(),
      "PATCH",
      &uri,
      Some(&answerer),
      Some(json!({ "body": "second draft" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["body"], "second draft");

    let resp = send(
      state,
      "GET",
      &format!("/answers?question_id={qid}"),
      None,
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let answers = json_body(resp).await;
    assert_eq!(answers.as_array().unwrap().len(), 1);
    assert_eq!(answers[0]["body"], "second draft");
  }

  // ── Request bodies ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn malformed_body_is_400() {
    let state = make_state().await;
    let (_, token) = signup(&state, "alice").await;

    // Schema mismatch: required field missing.
    let resp = send(
      state.clone(),
      "POST",
      "/questions",
      Some(&token),
      Some(json!({ "title": "no body field" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // No body, no content type.
    let resp = send(state, "POST", "/questions", Some(&token), None).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Comments ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn comment_create_and_list_by_target() {
    let state = make_state().await;
    let (_, token) = signup(&state, "alice").await;
    let qid = make_question(&state, &token, "Q").await;

    let resp = send(
      state.clone(),
      "POST",
      "/comments",
      Some(&token),
      Some(json!({ "kind": "question", "id": qid, "body": "nice one" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = send(
      state,
      "GET",
      &format!("/comments?kind=question&id={qid}"),
      None,
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let comments = json_body(resp).await;
    assert_eq!(comments.as_array().unwrap().len(), 1);
    assert_eq!(comments[0]["body"], "nice one");
    assert_eq!(comments[0]["kind"], "question");
  }

  // ── Diplomas ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn diploma_issue_requires_registrar() {
    let state = make_state().await;
    let (_, student) = signup(&state, "alice").await;
    let resp = send(
      state,
      "POST",
      "/diplomas",
      Some(&student),
      Some(json!({
        "student_name": "Awa Diop",
        "student_id": "2019-0042",
        "degree_name": "Licence Informatique",
        "major": "Génie Logiciel",
        "graduation_date": "2024-07-15",
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
  }

  #[tokio::test]
  async fn diploma_issue_sign_and_verify() {
    let state = make_state().await;
    let admin_token = admin(&state).await;

    let resp = send(
      state.clone(),
      "POST",
      "/diplomas",
      Some(&admin_token),
      Some(json!({
        "student_name": "Awa Diop",
        "student_id": "2019-0042",
        "degree_name": "Licence Informatique",
        "major": "Génie Logiciel",
        "graduation_date": "2024-07-15",
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let diploma = json_body(resp).await;
    let serial = diploma["serial_number"].as_str().unwrap().to_string();
    let id = diploma["diploma_id"].as_str().unwrap().to_string();
    assert!(serial.starts_with("DIP-"));
    assert_eq!(diploma["is_signed"], false);

    // The QR artifact landed on disk.
    let qr_path = state
      .config
      .artifact_dir
      .join(diploma["qr_path"].as_str().unwrap());
    let svg = tokio::fs::read_to_string(&qr_path).await.unwrap();
    assert!(svg.contains("<svg"), "not an svg: {qr_path:?}");

    // Unsigned diplomas do not verify.
    let resp = send(
      state.clone(),
      "GET",
      &format!("/diplomas/{serial}/verify"),
      None,
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["valid"], false);

    let resp = send(
      state.clone(),
      "POST",
      &format!("/diplomas/{id}/sign"),
      Some(&admin_token),
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let signed = json_body(resp).await;
    assert_eq!(signed["is_signed"], true);
    let signature = signed["signature_data"].as_str().unwrap().to_string();
    assert_eq!(signature.len(), 64);

    // Signing again is a no-op.
    let resp = send(
      state.clone(),
      "POST",
      &format!("/diplomas/{id}/sign"),
      Some(&admin_token),
      None,
    )
    .await;
    assert_eq!(
      json_body(resp).await["signature_data"].as_str().unwrap(),
      signature
    );

    // Public verification, no token.
    let resp = send(
      state,
      "GET",
      &format!("/diplomas/{serial}/verify"),
      None,
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let verification = json_body(resp).await;
    assert_eq!(verification["valid"], true);
    assert_eq!(verification["student_id"], "2019-0042");
  }

  #[tokio::test]
  async fn failed_artifact_write_persists_nothing() {
    let state = make_state().await;
    let admin_token = admin(&state).await;

    // Occupy the artifact path with a regular file so the QR write fails.
    tokio::fs::write(&state.config.artifact_dir, b"in the way")
      .await
      .unwrap();

    let resp = send(
      state.clone(),
      "POST",
      "/diplomas",
      Some(&admin_token),
      Some(json!({
        "student_name": "Awa Diop",
        "student_id": "2019-0042",
        "degree_name": "Licence Informatique",
        "major": "Génie Logiciel",
        "graduation_date": "2024-07-15",
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // A failed issuance leaves no diploma behind.
    let resp = send(state, "GET", "/diplomas", None, None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!([]));
  }

  #[tokio::test]
  async fn verify_unknown_serial_is_404() {
    let state = make_state().await;
    let resp = send(
      state,
      "GET",
      "/diplomas/DIP-00000000/verify",
      None,
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn duplicate_student_id_is_409() {
    let state = make_state().await;
    let admin_token = admin(&state).await;
    let body = json!({
      "student_name": "Awa Diop",
      "student_id": "2019-0042",
      "degree_name": "Licence Informatique",
      "major": "Génie Logiciel",
      "graduation_date": "2024-07-15",
    });

    let resp = send(
      state.clone(),
      "POST",
      "/diplomas",
      Some(&admin_token),
      Some(body.clone()),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp =
      send(state, "POST", "/diplomas", Some(&admin_token), Some(body)).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
  }
}
