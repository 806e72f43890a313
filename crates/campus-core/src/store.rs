//! The `PlatformStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `campus-store-sqlite`).
//! Higher layers (`campus-api`, `campus-server`) depend on this abstraction,
//! not on any concrete backend.
//!
//! All methods fail with [`crate::Error`] so transports can map domain
//! failures (not-found, forbidden, conflict) to protocol status codes
//! without knowing the backend; backend-internal failures arrive as
//! [`crate::Error::Storage`].

use std::future::Future;

use uuid::Uuid;

use crate::{
  Result,
  content::{
    Answer, AnswerUpdate, Comment, NewAnswer, NewComment, NewQuestion,
    Question, QuestionDetail, QuestionUpdate, Tag,
  },
  diploma::{Diploma, NewDiploma},
  target::Target,
  user::{NewUser, ProfileUpdate, Role, User},
  vote::VoteValue,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Sort order for [`PlatformStore::list_questions`]. Both orders are
/// descending (newest / most-voted first).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuestionOrder {
  #[default]
  CreatedAt,
  Votes,
}

/// Parameters for [`PlatformStore::list_questions`].
#[derive(Debug, Clone, Default)]
pub struct QuestionQuery {
  /// Free-text filter over title, body and tag names.
  pub search: Option<String>,
  pub order:  QuestionOrder,
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Campus storage backend.
///
/// The denormalized vote counters on questions and answers are mutated
/// exclusively by [`cast_vote`](PlatformStore::cast_vote); the best-answer
/// flag exclusively by [`mark_best`](PlatformStore::mark_best). Both run as
/// single all-or-nothing transactions.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait PlatformStore: Send + Sync {
  // ── Users ─────────────────────────────────────────────────────────────

  /// Create and persist a user. Fails with
  /// [`crate::Error::UsernameTaken`] if the username is in use.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User>> + Send + '_;

  /// Retrieve a user by UUID. Returns `None` if not found.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>>> + Send + '_;

  /// Look up a user and their password hash by username — the login path.
  fn credentials(
    &self,
    username: String,
  ) -> impl Future<Output = Result<Option<(User, String)>>> + Send + '_;

  fn list_users(&self) -> impl Future<Output = Result<Vec<User>>> + Send + '_;

  /// Update profile fields. Role is untouchable here; see
  /// [`set_role`](PlatformStore::set_role).
  fn update_profile(
    &self,
    id: Uuid,
    update: ProfileUpdate,
  ) -> impl Future<Output = Result<User>> + Send + '_;

  /// Change a user's role. Callers must gate this on the acting user being
  /// an administrator.
  fn set_role(
    &self,
    id: Uuid,
    role: Role,
  ) -> impl Future<Output = Result<User>> + Send + '_;

  /// Delete a user and, via cascade, everything they authored.
  fn delete_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  // ── Tags ──────────────────────────────────────────────────────────────

  /// Find a tag by name or create it (slug derived from the name).
  fn get_or_create_tag(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Tag>> + Send + '_;

  fn list_tags(&self) -> impl Future<Output = Result<Vec<Tag>>> + Send + '_;

  // ── Questions ─────────────────────────────────────────────────────────

  /// Create a question; tag names are resolved with get-or-create.
  fn create_question(
    &self,
    input: NewQuestion,
  ) -> impl Future<Output = Result<Question>> + Send + '_;

  /// Detail view: the question plus its answers (with comments) and its
  /// own comments. Returns `None` if not found.
  fn get_question(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<QuestionDetail>>> + Send + '_;

  fn list_questions<'a>(
    &'a self,
    query: &'a QuestionQuery,
  ) -> impl Future<Output = Result<Vec<Question>>> + Send + 'a;

  fn update_question(
    &self,
    id: Uuid,
    update: QuestionUpdate,
  ) -> impl Future<Output = Result<Question>> + Send + '_;

  fn delete_question(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  // ── Answers ───────────────────────────────────────────────────────────

  fn create_answer(
    &self,
    input: NewAnswer,
  ) -> impl Future<Output = Result<Answer>> + Send + '_;

  fn get_answer(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Answer>>> + Send + '_;

  /// All answers, optionally restricted to one question, oldest first.
  fn list_answers(
    &self,
    question_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<Answer>>> + Send + '_;

  fn update_answer(
    &self,
    id: Uuid,
    update: AnswerUpdate,
  ) -> impl Future<Output = Result<Answer>> + Send + '_;

  fn delete_answer(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Mark `answer_id` as the best answer of its question, clearing the
  /// flag on every sibling in the same transaction. Fails with
  /// [`crate::Error::NotQuestionAuthor`] unless `acting_user` authored the
  /// question. Idempotent.
  fn mark_best(
    &self,
    answer_id: Uuid,
    acting_user: Uuid,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  // ── Comments ──────────────────────────────────────────────────────────

  fn create_comment(
    &self,
    input: NewComment,
  ) -> impl Future<Output = Result<Comment>> + Send + '_;

  fn get_comment(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Comment>>> + Send + '_;

  fn list_comments(
    &self,
    target: Target,
  ) -> impl Future<Output = Result<Vec<Comment>>> + Send + '_;

  fn delete_comment(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  // ── Votes ─────────────────────────────────────────────────────────────

  /// Apply one user's vote on one target and return the post-transaction
  /// counter value.
  ///
  /// State machine, executed as a single transaction against the vote row
  /// and the target's counter:
  /// - no existing vote → insert, counter += value;
  /// - existing vote with the same value → delete (toggle off),
  ///   counter -= value;
  /// - existing vote with the opposite value → update in place (switch),
  ///   counter += new - old.
  fn cast_vote(
    &self,
    user_id: Uuid,
    target: Target,
    value: VoteValue,
  ) -> impl Future<Output = Result<i64>> + Send + '_;

  // ── Diplomas ──────────────────────────────────────────────────────────

  /// Persist a new diploma. The store assigns the UUID and today's issue
  /// date. Fails with [`crate::Error::StudentIdTaken`] or
  /// [`crate::Error::SerialTaken`] on a unique-constraint violation.
  fn create_diploma(
    &self,
    input: NewDiploma,
  ) -> impl Future<Output = Result<Diploma>> + Send + '_;

  fn get_diploma(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Diploma>>> + Send + '_;

  /// Public verification lookup by serial number.
  fn get_diploma_by_serial(
    &self,
    serial: String,
  ) -> impl Future<Output = Result<Option<Diploma>>> + Send + '_;

  fn list_diplomas(
    &self,
  ) -> impl Future<Output = Result<Vec<Diploma>>> + Send + '_;

  /// Store a signature, setting `is_signed`, only if none is present yet.
  /// Returns the record as persisted — if the diploma was already signed
  /// the existing signature is returned untouched.
  fn sign_diploma(
    &self,
    id: Uuid,
    signature: String,
  ) -> impl Future<Output = Result<Diploma>> + Send + '_;

  fn delete_diploma(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<()>> + Send + '_;
}
