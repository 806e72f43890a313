//! [`Target`] — the entity a vote or comment applies to.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A reference to either a question or an answer.
///
/// Replaces the nullable dual-foreign-key convention of the storage layer:
/// "both set" and "both null" are unrepresentable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Target {
  Question(Uuid),
  Answer(Uuid),
}

impl Target {
  pub fn id(self) -> Uuid {
    match self {
      Target::Question(id) | Target::Answer(id) => id,
    }
  }
}
