//! Questions, answers, comments and tags.
//!
//! These are read models: the store populates denormalized display fields
//! (`author_name`, tag lists, comment lists) with joins so the API layer
//! never issues follow-up queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::target::Target;

// ─── Tags ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
  pub tag_id: Uuid,
  pub name:   String,
  pub slug:   String,
}

/// Derive a URL slug from a tag name: lowercase alphanumerics, runs of
/// anything else collapsed to a single `-`.
pub fn slugify(name: &str) -> String {
  let mut slug = String::with_capacity(name.len());
  let mut pending_dash = false;
  for c in name.chars() {
    if c.is_alphanumeric() {
      if pending_dash && !slug.is_empty() {
        slug.push('-');
      }
      pending_dash = false;
      slug.extend(c.to_lowercase());
    } else {
      pending_dash = true;
    }
  }
  slug
}

// ─── Questions ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
  pub question_id:  Uuid,
  pub author_id:    Uuid,
  pub author_name:  String,
  pub title:        String,
  /// Markdown content.
  pub body:         String,
  pub tags:         Vec<Tag>,
  /// Denormalized vote counter, maintained only by the vote engine.
  pub votes:        i64,
  pub answer_count: i64,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
  pub author_id: Uuid,
  pub title:     String,
  pub body:      String,
  /// Tag names; each is looked up or created by the store.
  pub tags:      Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionUpdate {
  pub title: Option<String>,
  pub body:  Option<String>,
  /// Replaces the full tag set when present.
  pub tags:  Option<Vec<String>>,
}

/// A question with its answers and top-level comments — the detail view.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionDetail {
  #[serde(flatten)]
  pub question: Question,
  pub answers:  Vec<Answer>,
  pub comments: Vec<Comment>,
}

// ─── Answers ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
  pub answer_id:      Uuid,
  pub question_id:    Uuid,
  pub author_id:      Uuid,
  pub author_name:    String,
  pub body:           String,
  pub votes:          i64,
  pub is_best_answer: bool,
  pub comments:       Vec<Comment>,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAnswer {
  pub question_id: Uuid,
  pub author_id:   Uuid,
  pub body:        String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnswerUpdate {
  pub body: Option<String>,
}

// ─── Comments ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
  pub comment_id:  Uuid,
  pub author_id:   Uuid,
  pub author_name: String,
  #[serde(flatten)]
  pub target:      Target,
  pub body:        String,
  pub created_at:  DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
  pub author_id: Uuid,
  pub target:    Target,
  pub body:      String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn slugify_basics() {
    assert_eq!(slugify("Rust"), "rust");
    assert_eq!(slugify("linear algebra"), "linear-algebra");
    assert_eq!(slugify("C++ / FFI"), "c-ffi");
    assert_eq!(slugify("  trimmed  "), "trimmed");
  }

  #[test]
  fn slugify_collapses_runs() {
    assert_eq!(slugify("a --- b"), "a-b");
    assert_eq!(slugify("déjà vu"), "déjà-vu");
  }
}
