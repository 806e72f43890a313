//! User accounts and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The role a user holds on the platform.
///
/// Wire format matches the upstream API contract: `"ADMIN"`, `"STUDENT"`,
/// `"TEACHER"`, `"STAFF"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
  Admin,
  Student,
  Teacher,
  Staff,
}

impl Role {
  /// Whether this role may administer diploma records.
  pub fn is_registrar(self) -> bool {
    matches!(self, Role::Admin | Role::Staff)
  }
}

/// A user account. The password hash is stored separately and never leaves
/// the store except through [`PlatformStore::credentials`].
///
/// [`PlatformStore::credentials`]: crate::store::PlatformStore::credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:    Uuid,
  pub username:   String,
  pub email:      String,
  pub role:       Role,
  pub bio:        String,
  pub avatar_url: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Input for creating a user. `password_hash` is an argon2 PHC string; the
/// core crate never sees the cleartext password.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub username:      String,
  pub email:         String,
  pub password_hash: String,
  pub role:          Role,
}

/// Self-service profile update. Role is deliberately absent: role changes
/// are a separate, admin-only operation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
  pub email:      Option<String>,
  pub bio:        Option<String>,
  pub avatar_url: Option<String>,
}
