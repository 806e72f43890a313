//! Bearer-token authentication: registration, token issuance and the
//! [`Identity`] extractor.
//!
//! Tokens are HS256 JWTs. An access token authenticates requests; a refresh
//! token (marked with a `kind` claim) can only be exchanged for a fresh
//! access token at `/auth/token/refresh`.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  extract::{FromRequestParts, State},
  http::{HeaderMap, StatusCode, header, request::Parts},
};
use campus_core::{
  store::PlatformStore,
  user::{NewUser, Role, User},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{
  DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError, extract::Json};

// ─── Claims ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
  Access,
  Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  /// User UUID.
  pub sub:      String,
  pub username: String,
  pub kind:     TokenKind,
  pub iat:      i64,
  pub exp:      i64,
}

// ─── Token keys ──────────────────────────────────────────────────────────────

/// Signing and verification keys plus token lifetimes, derived once from the
/// configured secret.
pub struct TokenKeys {
  encoding:    EncodingKey,
  decoding:    DecodingKey,
  access_ttl:  Duration,
  refresh_ttl: Duration,
}

impl TokenKeys {
  pub fn new(
    secret: &[u8],
    access_ttl_minutes: i64,
    refresh_ttl_minutes: i64,
  ) -> Self {
    Self {
      encoding:    EncodingKey::from_secret(secret),
      decoding:    DecodingKey::from_secret(secret),
      access_ttl:  Duration::minutes(access_ttl_minutes),
      refresh_ttl: Duration::minutes(refresh_ttl_minutes),
    }
  }

  pub fn mint(&self, user: &User, kind: TokenKind) -> Result<String, ApiError> {
    let ttl = match kind {
      TokenKind::Access => self.access_ttl,
      TokenKind::Refresh => self.refresh_ttl,
    };
    let now = Utc::now();
    let claims = Claims {
      sub:      user.user_id.to_string(),
      username: user.username.clone(),
      kind,
      iat:      now.timestamp(),
      exp:      (now + ttl).timestamp(),
    };
    encode(&Header::default(), &claims, &self.encoding)
      .map_err(|e| ApiError::Internal(format!("token encoding failed: {e}")))
  }

  /// Decode and validate a token. Expiry and signature failures all collapse
  /// into `Unauthorized`.
  pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(token, &self.decoding, &Validation::default())
      .map(|data| data.claims)
      .map_err(|_| ApiError::Unauthorized)
  }
}

// ─── Identity extractor ──────────────────────────────────────────────────────

/// The authenticated user, resolved from the `Authorization: Bearer` header.
///
/// The account is re-read from the store on every request, so revoked users
/// and role changes take effect without waiting for token expiry.
pub struct Identity(pub User);

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
}

impl<S> FromRequestParts<AppState<S>> for Identity
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers).ok_or(ApiError::Unauthorized)?;
    let claims = state.tokens.verify(token)?;
    if claims.kind != TokenKind::Access {
      return Err(ApiError::Unauthorized);
    }
    let user_id =
      Uuid::parse_str(&claims.sub).map_err(|_| ApiError::Unauthorized)?;
    let user = state
      .store
      .get_user(user_id)
      .await?
      .ok_or(ApiError::Unauthorized)?;
    Ok(Identity(user))
  }
}

// ─── Password hashing ────────────────────────────────────────────────────────

/// Hash a cleartext password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Internal(format!("argon2 error: {e}")))
}

fn verify_password(password: &str, phc: &str) -> Result<(), ApiError> {
  let parsed = PasswordHash::new(phc).map_err(|_| ApiError::Unauthorized)?;
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .map_err(|_| ApiError::Unauthorized)
}

// ─── Handlers ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub username: String,
  pub email:    String,
  pub password: String,
  #[serde(default)]
  pub role:     Option<Role>,
}

/// `POST /auth/register`
///
/// Self-registration is limited to the student and teacher roles; registrar
/// accounts are promoted by an administrator afterwards.
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<User>), ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  if body.username.trim().is_empty() {
    return Err(ApiError::BadRequest("username must not be empty".into()));
  }
  if body.password.is_empty() {
    return Err(ApiError::BadRequest("password must not be empty".into()));
  }
  let role = body.role.unwrap_or(Role::Student);
  if role.is_registrar() {
    return Err(ApiError::Forbidden(
      "registrar roles cannot be self-assigned".into(),
    ));
  }

  let password_hash = hash_password(&body.password)?;
  let user = state
    .store
    .create_user(NewUser {
      username: body.username,
      email: body.email,
      password_hash,
      role,
    })
    .await?;
  Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Debug, Deserialize)]
pub struct TokenBody {
  pub username: String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenPair {
  pub access:  String,
  pub refresh: String,
}

/// `POST /auth/token` — body: `{"username":…,"password":…}`
pub async fn token<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<TokenBody>,
) -> Result<Json<TokenPair>, ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  let (user, phc) = state
    .store
    .credentials(body.username)
    .await?
    .ok_or(ApiError::Unauthorized)?;
  verify_password(&body.password, &phc)?;

  Ok(Json(TokenPair {
    access:  state.tokens.mint(&user, TokenKind::Access)?,
    refresh: state.tokens.mint(&user, TokenKind::Refresh)?,
  }))
}

#[derive(Debug, Deserialize)]
pub struct RefreshBody {
  pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct AccessToken {
  pub access: String,
}

/// `POST /auth/token/refresh` — exchange a refresh token for a new access
/// token. Access tokens are rejected here.
pub async fn refresh<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RefreshBody>,
) -> Result<Json<AccessToken>, ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  let claims = state.tokens.verify(&body.refresh)?;
  if claims.kind != TokenKind::Refresh {
    return Err(ApiError::Unauthorized);
  }
  let user_id =
    Uuid::parse_str(&claims.sub).map_err(|_| ApiError::Unauthorized)?;
  let user = state
    .store
    .get_user(user_id)
    .await?
    .ok_or(ApiError::Unauthorized)?;

  Ok(Json(AccessToken {
    access: state.tokens.mint(&user, TokenKind::Access)?,
  }))
}
