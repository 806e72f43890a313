//! Core types and trait definitions for the Campus platform.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod content;
pub mod diploma;
pub mod error;
pub mod store;
pub mod target;
pub mod user;
pub mod vote;

pub use error::{Error, Result};
