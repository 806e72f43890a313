//! Diploma records and the issuance primitives.
//!
//! A diploma is created once by a registrar. Its serial number and QR
//! artifact are generated at issuance; its signature is computed at most
//! once and never recomputed afterwards.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Prefix for every minted serial number.
pub const SERIAL_PREFIX: &str = "DIP-";

/// A diploma record with its verification artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diploma {
  pub diploma_id:      Uuid,
  pub student_name:    String,
  /// Institutional student identifier; unique across all diplomas.
  pub student_id:      String,
  pub degree_name:     String,
  pub major:           String,
  pub graduation_date: NaiveDate,
  /// Set by the store at creation.
  pub issue_date:      NaiveDate,
  pub serial_number:   String,
  /// Path of the rendered QR artifact, relative to the artifact directory.
  pub qr_path:         Option<String>,
  pub is_signed:       bool,
  /// Keyed SHA-256 digest, hex-encoded. Populated at most once.
  pub signature_data:  Option<String>,
}

/// Input for persisting a new diploma. `serial_number` and `qr_path` are
/// produced by the issuance routine, not by the caller.
#[derive(Debug, Clone)]
pub struct NewDiploma {
  pub student_name:    String,
  pub student_id:      String,
  pub degree_name:     String,
  pub major:           String,
  pub graduation_date: NaiveDate,
  pub serial_number:   String,
  pub qr_path:         Option<String>,
}

/// Mint a fresh serial number: `DIP-` plus eight uppercase hex characters
/// drawn from a v4 UUID. Collisions are improbable but possible; the
/// issuance routine retries on a unique-constraint violation.
pub fn mint_serial() -> String {
  let hex = Uuid::new_v4().simple().to_string();
  format!("{SERIAL_PREFIX}{}", hex[..8].to_uppercase())
}

/// Compute the tamper-evident signature for a diploma.
///
/// This is a keyed digest over `"{serial}|{student_id}|{graduation_date}"`
/// concatenated with the server secret — it proves possession of the secret,
/// not third-party-verifiable authenticity.
pub fn signature_digest(
  serial_number:   &str,
  student_id:      &str,
  graduation_date: NaiveDate,
  secret:          &str,
) -> String {
  let payload =
    format!("{serial_number}|{student_id}|{graduation_date}{secret}");
  hex::encode(Sha256::digest(payload.as_bytes()))
}
