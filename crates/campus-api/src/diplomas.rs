//! Handlers for `/diplomas` endpoints.
//!
//! Issuance mints a serial number, renders a QR code pointing at the public
//! verification URL, and persists the record. Signing computes the keyed
//! digest at most once; the store's guarded update makes a second sign
//! request a no-op.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/diplomas` | Public |
//! | `POST`   | `/diplomas` | Registrar (admin/staff) only |
//! | `GET`    | `/diplomas/{id}` | 404 if not found |
//! | `DELETE` | `/diplomas/{id}` | Registrar only |
//! | `POST`   | `/diplomas/{id}/sign` | Registrar only; idempotent |
//! | `GET`    | `/diplomas/{serial}/verify` | Public, by serial |

use axum::{
  extract::{Path, State},
  http::StatusCode,
};
use campus_core::{
  Error as CoreError,
  diploma::{Diploma, NewDiploma, mint_serial, signature_digest},
  store::PlatformStore,
};
use chrono::NaiveDate;
use qrcode::{QrCode, render::svg};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, auth::Identity, error::ApiError, extract::Json};

/// Serial minting retries on the (unlikely) unique-constraint collision.
const MINT_ATTEMPTS: u32 = 4;

fn require_registrar(identity: &Identity) -> Result<(), ApiError> {
  if !identity.0.role.is_registrar() {
    return Err(ApiError::Forbidden(
      "only admin or staff may manage diplomas".into(),
    ));
  }
  Ok(())
}

// ─── List / get ──────────────────────────────────────────────────────────────

/// `GET /diplomas`
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<Diploma>>, ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  Ok(Json(state.store.list_diplomas().await?))
}

/// `GET /diplomas/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Diploma>, ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  let diploma = state
    .store
    .get_diploma(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("diploma {id} not found")))?;
  Ok(Json(diploma))
}

// ─── Issue ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct IssueBody {
  pub student_name:    String,
  pub student_id:      String,
  pub degree_name:     String,
  pub major:           String,
  pub graduation_date: NaiveDate,
}

fn render_qr_svg(url: &str) -> Result<String, ApiError> {
  let code = QrCode::new(url.as_bytes())
    .map_err(|e| ApiError::Internal(format!("qr encoding failed: {e}")))?;
  Ok(
    code
      .render::<svg::Color>()
      .min_dimensions(256, 256)
      .build(),
  )
}

/// `POST /diplomas` — registrar only.
///
/// A serial collision retries with a fresh suffix; a duplicate student id is
/// a hard conflict and is never retried.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Json(body): Json<IssueBody>,
) -> Result<(StatusCode, Json<Diploma>), ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  require_registrar(&identity)?;
  if body.student_name.trim().is_empty() {
    return Err(ApiError::BadRequest("student name must not be empty".into()));
  }
  if body.student_id.trim().is_empty() {
    return Err(ApiError::BadRequest("student id must not be empty".into()));
  }

  let mut last_serial = String::new();
  for _ in 0..MINT_ATTEMPTS {
    let serial = mint_serial();
    let verify_url =
      format!("{}/diplomas/{serial}/verify", state.config.base_url);
    let svg_body = render_qr_svg(&verify_url)?;
    let qr_file = format!("{serial}.svg");
    let qr_disk_path = state.config.artifact_dir.join(&qr_file);

    // The QR file must exist before the row referencing it is committed;
    // a write failure aborts issuance with nothing persisted.
    tokio::fs::create_dir_all(&state.config.artifact_dir)
      .await
      .map_err(|e| ApiError::Internal(format!("artifact dir error: {e}")))?;
    tokio::fs::write(&qr_disk_path, svg_body)
      .await
      .map_err(|e| ApiError::Internal(format!("qr write error: {e}")))?;

    let result = state
      .store
      .create_diploma(NewDiploma {
        student_name:    body.student_name.clone(),
        student_id:      body.student_id.clone(),
        degree_name:     body.degree_name.clone(),
        major:           body.major.clone(),
        graduation_date: body.graduation_date,
        serial_number:   serial.clone(),
        qr_path:         Some(qr_file.clone()),
      })
      .await;

    match result {
      Ok(diploma) => {
        tracing::info!(serial = %diploma.serial_number, "issued diploma");
        return Ok((StatusCode::CREATED, Json(diploma)));
      }
      Err(CoreError::SerialTaken(s)) => {
        let _ = tokio::fs::remove_file(&qr_disk_path).await;
        last_serial = s;
        continue;
      }
      Err(e) => {
        let _ = tokio::fs::remove_file(&qr_disk_path).await;
        return Err(e.into());
      }
    }
  }
  Err(ApiError::Conflict(format!(
    "could not mint a unique serial number (last tried {last_serial:?})"
  )))
}

/// `DELETE /diplomas/{id}` — registrar only.
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  require_registrar(&identity)?;
  state.store.delete_diploma(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Sign ────────────────────────────────────────────────────────────────────

/// `POST /diplomas/{id}/sign` — registrar only.
///
/// Computes the keyed digest over serial, student id and graduation date.
/// Already-signed diplomas come back unchanged.
pub async fn sign<S>(
  State(state): State<AppState<S>>,
  identity: Identity,
  Path(id): Path<Uuid>,
) -> Result<Json<Diploma>, ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  require_registrar(&identity)?;
  if state.config.signing_secret.is_empty() {
    return Err(ApiError::Internal("signing secret is not configured".into()));
  }
  let diploma = state
    .store
    .get_diploma(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("diploma {id} not found")))?;

  let digest = signature_digest(
    &diploma.serial_number,
    &diploma.student_id,
    diploma.graduation_date,
    &state.config.signing_secret,
  );
  let signed = state.store.sign_diploma(id, digest).await?;
  Ok(Json(signed))
}

// ─── Verify ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Verification {
  /// True when the record is signed and its stored signature matches a
  /// fresh digest over the stored fields.
  pub valid:   bool,
  #[serde(flatten)]
  pub diploma: Diploma,
}

/// `GET /diplomas/{serial}/verify` — public lookup by serial number.
pub async fn verify<S>(
  State(state): State<AppState<S>>,
  Path(serial): Path<String>,
) -> Result<Json<Verification>, ApiError>
where
  S: PlatformStore + Clone + Send + Sync + 'static,
{
  let diploma = state
    .store
    .get_diploma_by_serial(serial.clone())
    .await?
    .ok_or_else(|| {
      ApiError::NotFound(format!("no diploma with serial {serial:?}"))
    })?;

  let valid = !state.config.signing_secret.is_empty()
    && diploma.is_signed
    && diploma.signature_data.as_deref()
      == Some(
        signature_digest(
          &diploma.serial_number,
          &diploma.student_id,
          diploma.graduation_date,
          &state.config.signing_secret,
        )
        .as_str(),
      );

  Ok(Json(Verification { valid, diploma }))
}
