//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as `%Y-%m-%d`,
//! UUIDs as hyphenated lowercase strings, roles as their uppercase wire
//! names.

use campus_core::{
  content::{Answer, Comment, Question, Tag},
  diploma::Diploma,
  target::Target,
  user::{Role, User},
};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Role ─────────────────────────────────────────────────────────────────────

pub fn encode_role(r: Role) -> &'static str {
  match r {
    Role::Admin => "ADMIN",
    Role::Student => "STUDENT",
    Role::Teacher => "TEACHER",
    Role::Staff => "STAFF",
  }
}

pub fn decode_role(s: &str) -> Result<Role> {
  match s {
    "ADMIN" => Ok(Role::Admin),
    "STUDENT" => Ok(Role::Student),
    "TEACHER" => Ok(Role::Teacher),
    "STAFF" => Ok(Role::Staff),
    other => Err(Error::Decode(format!("unknown role: {other:?}"))),
  }
}

// ─── Raw row types ───────────────────────────────────────────────────────────

pub struct RawUser {
  pub user_id:    String,
  pub username:   String,
  pub email:      String,
  pub role:       String,
  pub bio:        String,
  pub avatar_url: Option<String>,
  pub created_at: String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    decode_uuid(&self.user_id)?,
      username:   self.username,
      email:      self.email,
      role:       decode_role(&self.role)?,
      bio:        self.bio,
      avatar_url: self.avatar_url,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawTag {
  pub tag_id: String,
  pub name:   String,
  pub slug:   String,
}

impl RawTag {
  pub fn into_tag(self) -> Result<Tag> {
    Ok(Tag {
      tag_id: decode_uuid(&self.tag_id)?,
      name:   self.name,
      slug:   self.slug,
    })
  }
}

pub struct RawQuestion {
  pub question_id:  String,
  pub author_id:    String,
  pub author_name:  String,
  pub title:        String,
  pub body:         String,
  pub votes:        i64,
  pub answer_count: i64,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawQuestion {
  pub fn into_question(self, tags: Vec<Tag>) -> Result<Question> {
    Ok(Question {
      question_id:  decode_uuid(&self.question_id)?,
      author_id:    decode_uuid(&self.author_id)?,
      author_name:  self.author_name,
      title:        self.title,
      body:         self.body,
      tags,
      votes:        self.votes,
      answer_count: self.answer_count,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}

pub struct RawAnswer {
  pub answer_id:   String,
  pub question_id: String,
  pub author_id:   String,
  pub author_name: String,
  pub body:        String,
  pub votes:       i64,
  pub is_best:     bool,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawAnswer {
  pub fn into_answer(self, comments: Vec<Comment>) -> Result<Answer> {
    Ok(Answer {
      answer_id:      decode_uuid(&self.answer_id)?,
      question_id:    decode_uuid(&self.question_id)?,
      author_id:      decode_uuid(&self.author_id)?,
      author_name:    self.author_name,
      body:           self.body,
      votes:          self.votes,
      is_best_answer: self.is_best,
      comments,
      created_at:     decode_dt(&self.created_at)?,
      updated_at:     decode_dt(&self.updated_at)?,
    })
  }
}

pub struct RawComment {
  pub comment_id:  String,
  pub author_id:   String,
  pub author_name: String,
  pub question_id: Option<String>,
  pub answer_id:   Option<String>,
  pub body:        String,
  pub created_at:  String,
}

impl RawComment {
  pub fn into_comment(self) -> Result<Comment> {
    // The CHECK constraint guarantees exactly one column is set; a row
    // violating that is corrupt and refuses to decode.
    let target = match (&self.question_id, &self.answer_id) {
      (Some(q), None) => Target::Question(decode_uuid(q)?),
      (None, Some(a)) => Target::Answer(decode_uuid(a)?),
      _ => {
        return Err(Error::Decode(format!(
          "comment {} has an invalid target",
          self.comment_id
        )));
      }
    };
    Ok(Comment {
      comment_id:  decode_uuid(&self.comment_id)?,
      author_id:   decode_uuid(&self.author_id)?,
      author_name: self.author_name,
      target,
      body:        self.body,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawDiploma {
  pub diploma_id:      String,
  pub student_name:    String,
  pub student_id:      String,
  pub degree_name:     String,
  pub major:           String,
  pub graduation_date: String,
  pub issue_date:      String,
  pub serial_number:   String,
  pub qr_path:         Option<String>,
  pub is_signed:       bool,
  pub signature_data:  Option<String>,
}

impl RawDiploma {
  pub fn into_diploma(self) -> Result<Diploma> {
    Ok(Diploma {
      diploma_id:      decode_uuid(&self.diploma_id)?,
      student_name:    self.student_name,
      student_id:      self.student_id,
      degree_name:     self.degree_name,
      major:           self.major,
      graduation_date: decode_date(&self.graduation_date)?,
      issue_date:      decode_date(&self.issue_date)?,
      serial_number:   self.serial_number,
      qr_path:         self.qr_path,
      is_signed:       self.is_signed,
      signature_data:  self.signature_data,
    })
  }
}
