//! Error types for `campus-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("question not found: {0}")]
  QuestionNotFound(Uuid),

  #[error("answer not found: {0}")]
  AnswerNotFound(Uuid),

  #[error("comment not found: {0}")]
  CommentNotFound(Uuid),

  #[error("diploma not found: {0}")]
  DiplomaNotFound(Uuid),

  #[error("only the question author can mark a best answer")]
  NotQuestionAuthor,

  #[error("username already taken: {0:?}")]
  UsernameTaken(String),

  #[error("a diploma already exists for student id {0:?}")]
  StudentIdTaken(String),

  #[error("serial number already taken: {0:?}")]
  SerialTaken(String),

  #[error("invalid vote value: {0} (expected 1 or -1)")]
  InvalidVoteValue(i64),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  /// A backend failure (I/O, SQL, decode). Carries no domain meaning;
  /// transports surface it as an internal error.
  #[error("storage error: {0}")]
  Storage(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
