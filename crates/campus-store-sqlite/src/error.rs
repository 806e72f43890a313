//! Error type for `campus-store-sqlite`.
//!
//! Backend-internal failures only. At the [`PlatformStore`] boundary they
//! collapse into [`campus_core::Error::Storage`]; domain failures
//! (not-found, forbidden, conflict) are raised directly as
//! [`campus_core::Error`] variants by the store methods.
//!
//! [`PlatformStore`]: campus_core::store::PlatformStore

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("row decode error: {0}")]
  Decode(String),
}

impl From<Error> for campus_core::Error {
  fn from(e: Error) -> Self {
    campus_core::Error::Storage(e.to_string())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
