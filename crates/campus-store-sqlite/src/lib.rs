//! SQLite backend for the Campus platform store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. The single-connection design
//! also serializes all writers, which is what gives the vote engine its
//! no-lost-updates guarantee.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::Error;
pub use store::SqliteStore;
