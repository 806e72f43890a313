//! [`SqliteStore`] — the SQLite implementation of [`PlatformStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use campus_core::{
  Error as CoreError, Result as CoreResult,
  content::{
    Answer, AnswerUpdate, Comment, NewAnswer, NewComment, NewQuestion,
    Question, QuestionDetail, QuestionUpdate, Tag, slugify,
  },
  diploma::{Diploma, NewDiploma},
  store::{PlatformStore, QuestionOrder, QuestionQuery},
  target::Target,
  user::{NewUser, ProfileUpdate, Role, User},
  vote::VoteValue,
};

use crate::{
  Error,
  encode::{
    RawAnswer, RawComment, RawDiploma, RawQuestion, RawTag, RawUser,
    encode_date, encode_dt, encode_role, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Row mapping ─────────────────────────────────────────────────────────────

const USER_COLS: &str =
  "user_id, username, email, role, bio, avatar_url, created_at";

const QUESTION_COLS: &str = "q.question_id, q.author_id, u.username, q.title, \
   q.body, q.votes, \
   (SELECT COUNT(*) FROM answers a WHERE a.question_id = q.question_id) \
     AS answer_count, \
   q.created_at, q.updated_at";

const ANSWER_COLS: &str = "a.answer_id, a.question_id, a.author_id, \
   u.username, a.body, a.votes, a.is_best, a.created_at, a.updated_at";

const COMMENT_COLS: &str = "c.comment_id, c.author_id, u.username, \
   c.question_id, c.answer_id, c.body, c.created_at";

const DIPLOMA_COLS: &str = "diploma_id, student_name, student_id, \
   degree_name, major, graduation_date, issue_date, serial_number, qr_path, \
   is_signed, signature_data";

fn map_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    user_id:    row.get(0)?,
    username:   row.get(1)?,
    email:      row.get(2)?,
    role:       row.get(3)?,
    bio:        row.get(4)?,
    avatar_url: row.get(5)?,
    created_at: row.get(6)?,
  })
}

fn map_tag(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawTag> {
  Ok(RawTag { tag_id: row.get(0)?, name: row.get(1)?, slug: row.get(2)? })
}

fn map_question(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawQuestion> {
  Ok(RawQuestion {
    question_id:  row.get(0)?,
    author_id:    row.get(1)?,
    author_name:  row.get(2)?,
    title:        row.get(3)?,
    body:         row.get(4)?,
    votes:        row.get(5)?,
    answer_count: row.get(6)?,
    created_at:   row.get(7)?,
    updated_at:   row.get(8)?,
  })
}

fn map_answer(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawAnswer> {
  Ok(RawAnswer {
    answer_id:   row.get(0)?,
    question_id: row.get(1)?,
    author_id:   row.get(2)?,
    author_name: row.get(3)?,
    body:        row.get(4)?,
    votes:       row.get(5)?,
    is_best:     row.get(6)?,
    created_at:  row.get(7)?,
    updated_at:  row.get(8)?,
  })
}

fn map_comment(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawComment> {
  Ok(RawComment {
    comment_id:  row.get(0)?,
    author_id:   row.get(1)?,
    author_name: row.get(2)?,
    question_id: row.get(3)?,
    answer_id:   row.get(4)?,
    body:        row.get(5)?,
    created_at:  row.get(6)?,
  })
}

fn map_diploma(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawDiploma> {
  Ok(RawDiploma {
    diploma_id:      row.get(0)?,
    student_name:    row.get(1)?,
    student_id:      row.get(2)?,
    degree_name:     row.get(3)?,
    major:           row.get(4)?,
    graduation_date: row.get(5)?,
    issue_date:      row.get(6)?,
    serial_number:   row.get(7)?,
    qr_path:         row.get(8)?,
    is_signed:       row.get(9)?,
    signature_data:  row.get(10)?,
  })
}

// ─── Synchronous fetch helpers (used inside `conn.call` closures) ────────────

fn question_row(
  conn: &rusqlite::Connection,
  id: &str,
) -> rusqlite::Result<Option<RawQuestion>> {
  conn
    .query_row(
      &format!(
        "SELECT {QUESTION_COLS} FROM questions q \
         JOIN users u ON u.user_id = q.author_id \
         WHERE q.question_id = ?1"
      ),
      rusqlite::params![id],
      map_question,
    )
    .optional()
}

fn tags_for_question(
  conn: &rusqlite::Connection,
  question_id: &str,
) -> rusqlite::Result<Vec<RawTag>> {
  let mut stmt = conn.prepare(
    "SELECT t.tag_id, t.name, t.slug FROM tags t \
     JOIN question_tags qt ON qt.tag_id = t.tag_id \
     WHERE qt.question_id = ?1 ORDER BY t.name",
  )?;
  let rows = stmt
    .query_map(rusqlite::params![question_id], map_tag)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn answer_row(
  conn: &rusqlite::Connection,
  id: &str,
) -> rusqlite::Result<Option<RawAnswer>> {
  conn
    .query_row(
      &format!(
        "SELECT {ANSWER_COLS} FROM answers a \
         JOIN users u ON u.user_id = a.author_id \
         WHERE a.answer_id = ?1"
      ),
      rusqlite::params![id],
      map_answer,
    )
    .optional()
}

fn answers_for_question(
  conn: &rusqlite::Connection,
  question_id: &str,
) -> rusqlite::Result<Vec<RawAnswer>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {ANSWER_COLS} FROM answers a \
     JOIN users u ON u.user_id = a.author_id \
     WHERE a.question_id = ?1 ORDER BY a.created_at"
  ))?;
  let rows = stmt
    .query_map(rusqlite::params![question_id], map_answer)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn comment_row(
  conn: &rusqlite::Connection,
  id: &str,
) -> rusqlite::Result<Option<RawComment>> {
  conn
    .query_row(
      &format!(
        "SELECT {COMMENT_COLS} FROM comments c \
         JOIN users u ON u.user_id = c.author_id \
         WHERE c.comment_id = ?1"
      ),
      rusqlite::params![id],
      map_comment,
    )
    .optional()
}

/// `column` is one of the two internal FK column names, never user input.
fn comments_where(
  conn: &rusqlite::Connection,
  column: &str,
  id: &str,
) -> rusqlite::Result<Vec<RawComment>> {
  let mut stmt = conn.prepare(&format!(
    "SELECT {COMMENT_COLS} FROM comments c \
     JOIN users u ON u.user_id = c.author_id \
     WHERE c.{column} = ?1 ORDER BY c.created_at"
  ))?;
  let rows = stmt
    .query_map(rusqlite::params![id], map_comment)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn diploma_where(
  conn: &rusqlite::Connection,
  column: &str,
  key: &str,
) -> rusqlite::Result<Option<RawDiploma>> {
  conn
    .query_row(
      &format!("SELECT {DIPLOMA_COLS} FROM diplomas WHERE {column} = ?1"),
      rusqlite::params![key],
      map_diploma,
    )
    .optional()
}

fn get_or_create_tag_row(
  conn: &rusqlite::Connection,
  name: &str,
) -> rusqlite::Result<RawTag> {
  let existing = conn
    .query_row(
      "SELECT tag_id, name, slug FROM tags WHERE name = ?1",
      rusqlite::params![name],
      map_tag,
    )
    .optional()?;
  if let Some(tag) = existing {
    return Ok(tag);
  }
  let tag = RawTag {
    tag_id: encode_uuid(Uuid::new_v4()),
    name:   name.to_owned(),
    slug:   slugify(name),
  };
  conn.execute(
    "INSERT INTO tags (tag_id, name, slug) VALUES (?1, ?2, ?3)",
    rusqlite::params![tag.tag_id, tag.name, tag.slug],
  )?;
  Ok(tag)
}

/// Resolve tag names (trimmed, empties skipped) and link them to a question.
fn attach_tags(
  conn: &rusqlite::Connection,
  question_id: &str,
  names: &[String],
) -> rusqlite::Result<()> {
  for name in names {
    let name = name.trim();
    if name.is_empty() {
      continue;
    }
    let tag = get_or_create_tag_row(conn, name)?;
    conn.execute(
      "INSERT OR IGNORE INTO question_tags (question_id, tag_id) \
       VALUES (?1, ?2)",
      rusqlite::params![question_id, tag.tag_id],
    )?;
  }
  Ok(())
}

// ─── Constraint inspection ───────────────────────────────────────────────────

/// If `err` is a SQLite unique/constraint violation, return its message
/// (which names the violated index, e.g. `UNIQUE constraint failed:
/// diplomas.serial_number`).
fn constraint_violation(err: &tokio_rusqlite::Error) -> Option<&str> {
  if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
    e,
    Some(msg),
  )) = err
    && e.code == rusqlite::ErrorCode::ConstraintViolation
  {
    return Some(msg.as_str());
  }
  None
}

// ─── Closure outcome types ───────────────────────────────────────────────────

// Domain failures discovered mid-transaction are carried out of the
// `conn.call` closure as plain values, then mapped to `campus_core::Error`
// on the async side. The transaction rolls back on drop in every
// non-committed branch.

enum VoteOutcome {
  Applied(i64),
  TargetMissing,
}

enum MarkBestOutcome {
  Marked,
  AnswerMissing,
  NotAuthor,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Campus store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All access
/// funnels through one connection on a dedicated thread, so transactions on
/// the same target serialize and counter updates cannot be lost.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(Error::Database)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> CoreResult<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(Error::Database)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> CoreResult<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(Error::Database)?;
    Ok(())
  }
}

// ─── PlatformStore impl ──────────────────────────────────────────────────────

impl PlatformStore for SqliteStore {
  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> CoreResult<User> {
    let user = User {
      user_id:    Uuid::new_v4(),
      username:   input.username.clone(),
      email:      input.email,
      role:       input.role,
      bio:        String::new(),
      avatar_url: None,
      created_at: Utc::now(),
    };

    let id_str   = encode_uuid(user.user_id);
    let username = user.username.clone();
    let email    = user.email.clone();
    let hash     = input.password_hash;
    let role_str = encode_role(user.role).to_owned();
    let at_str   = encode_dt(user.created_at);

    let result = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users \
             (user_id, username, email, password_hash, role, created_at) \
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, username, email, hash, role_str, at_str],
        )?;
        Ok(())
      })
      .await;

    match result {
      Ok(()) => Ok(user),
      Err(e) => {
        if let Some(msg) = constraint_violation(&e)
          && msg.contains("users.username")
        {
          return Err(CoreError::UsernameTaken(input.username));
        }
        Err(Error::Database(e).into())
      }
    }
  }

  async fn get_user(&self, id: Uuid) -> CoreResult<Option<User>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {USER_COLS} FROM users WHERE user_id = ?1"),
              rusqlite::params![id_str],
              map_user,
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::Database)?;

    Ok(raw.map(RawUser::into_user).transpose()?)
  }

  async fn credentials(
    &self,
    username: String,
  ) -> CoreResult<Option<(User, String)>> {
    let raw: Option<(RawUser, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {USER_COLS}, password_hash FROM users \
                 WHERE username = ?1"
              ),
              rusqlite::params![username],
              |row| Ok((map_user(row)?, row.get(7)?)),
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::Database)?;

    match raw {
      Some((raw_user, hash)) => Ok(Some((raw_user.into_user()?, hash))),
      None => Ok(None),
    }
  }

  async fn list_users(&self) -> CoreResult<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {USER_COLS} FROM users ORDER BY username"
        ))?;
        let rows = stmt
          .query_map([], map_user)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    Ok(
      raws
        .into_iter()
        .map(RawUser::into_user)
        .collect::<Result<_, _>>()?,
    )
  }

  async fn update_profile(
    &self,
    id: Uuid,
    update: ProfileUpdate,
  ) -> CoreResult<User> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE users SET \
             email      = COALESCE(?2, email), \
             bio        = COALESCE(?3, bio), \
             avatar_url = COALESCE(?4, avatar_url) \
           WHERE user_id = ?1",
          rusqlite::params![id_str, update.email, update.bio, update.avatar_url],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        conn
          .query_row(
            &format!("SELECT {USER_COLS} FROM users WHERE user_id = ?1"),
            rusqlite::params![id_str],
            map_user,
          )
          .optional()
          .map_err(Into::into)
      })
      .await
      .map_err(Error::Database)?;

    match raw {
      Some(raw) => Ok(raw.into_user()?),
      None => Err(CoreError::UserNotFound(id)),
    }
  }

  async fn set_role(&self, id: Uuid, role: Role) -> CoreResult<User> {
    let id_str   = encode_uuid(id);
    let role_str = encode_role(role).to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE users SET role = ?2 WHERE user_id = ?1",
          rusqlite::params![id_str, role_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        conn
          .query_row(
            &format!("SELECT {USER_COLS} FROM users WHERE user_id = ?1"),
            rusqlite::params![id_str],
            map_user,
          )
          .optional()
          .map_err(Into::into)
      })
      .await
      .map_err(Error::Database)?;

    match raw {
      Some(raw) => Ok(raw.into_user()?),
      None => Err(CoreError::UserNotFound(id)),
    }
  }

  async fn delete_user(&self, id: Uuid) -> CoreResult<()> {
    let id_str = encode_uuid(id);
    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM users WHERE user_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await
      .map_err(Error::Database)?;

    if deleted == 0 {
      return Err(CoreError::UserNotFound(id));
    }
    Ok(())
  }

  // ── Tags ──────────────────────────────────────────────────────────────────

  async fn get_or_create_tag(&self, name: String) -> CoreResult<Tag> {
    let raw: RawTag = self
      .conn
      .call(move |conn| Ok(get_or_create_tag_row(conn, name.trim())?))
      .await
      .map_err(Error::Database)?;
    Ok(raw.into_tag()?)
  }

  async fn list_tags(&self) -> CoreResult<Vec<Tag>> {
    let raws: Vec<RawTag> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT tag_id, name, slug FROM tags ORDER BY name")?;
        let rows = stmt
          .query_map([], map_tag)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    Ok(
      raws
        .into_iter()
        .map(RawTag::into_tag)
        .collect::<Result<_, _>>()?,
    )
  }

  // ── Questions ─────────────────────────────────────────────────────────────

  async fn create_question(&self, input: NewQuestion) -> CoreResult<Question> {
    let question_id = Uuid::new_v4();
    let id_str      = encode_uuid(question_id);
    let author_str  = encode_uuid(input.author_id);
    let now_str     = encode_dt(Utc::now());
    let author_id   = input.author_id;

    let raw: Option<(RawQuestion, Vec<RawTag>)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let author_exists: bool = tx
          .query_row(
            "SELECT 1 FROM users WHERE user_id = ?1",
            rusqlite::params![author_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !author_exists {
          return Ok(None);
        }

        tx.execute(
          "INSERT INTO questions \
             (question_id, author_id, title, body, created_at, updated_at) \
           VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
          rusqlite::params![id_str, author_str, input.title, input.body, now_str],
        )?;
        attach_tags(&tx, &id_str, &input.tags)?;

        let question = question_row(&tx, &id_str)?;
        let tags     = tags_for_question(&tx, &id_str)?;
        tx.commit()?;
        Ok(question.map(|q| (q, tags)))
      })
      .await
      .map_err(Error::Database)?;

    match raw {
      Some((raw_q, raw_tags)) => {
        let tags = raw_tags
          .into_iter()
          .map(RawTag::into_tag)
          .collect::<Result<_, _>>()?;
        Ok(raw_q.into_question(tags)?)
      }
      None => Err(CoreError::UserNotFound(author_id)),
    }
  }

  async fn get_question(&self, id: Uuid) -> CoreResult<Option<QuestionDetail>> {
    let id_str = encode_uuid(id);

    type RawDetail =
      (RawQuestion, Vec<RawTag>, Vec<(RawAnswer, Vec<RawComment>)>, Vec<RawComment>);

    let raw: Option<RawDetail> = self
      .conn
      .call(move |conn| {
        let Some(question) = question_row(conn, &id_str)? else {
          return Ok(None);
        };
        let tags = tags_for_question(conn, &id_str)?;

        let mut answers = Vec::new();
        for answer in answers_for_question(conn, &id_str)? {
          let comments = comments_where(conn, "answer_id", &answer.answer_id)?;
          answers.push((answer, comments));
        }

        let comments = comments_where(conn, "question_id", &id_str)?;
        Ok(Some((question, tags, answers, comments)))
      })
      .await
      .map_err(Error::Database)?;

    let Some((raw_q, raw_tags, raw_answers, raw_comments)) = raw else {
      return Ok(None);
    };

    let tags = raw_tags
      .into_iter()
      .map(RawTag::into_tag)
      .collect::<Result<_, _>>()?;

    let mut answers = Vec::with_capacity(raw_answers.len());
    for (raw_a, raw_cs) in raw_answers {
      let comments = raw_cs
        .into_iter()
        .map(RawComment::into_comment)
        .collect::<Result<_, _>>()?;
      answers.push(raw_a.into_answer(comments)?);
    }

    let comments = raw_comments
      .into_iter()
      .map(RawComment::into_comment)
      .collect::<Result<_, _>>()?;

    Ok(Some(QuestionDetail {
      question: raw_q.into_question(tags)?,
      answers,
      comments,
    }))
  }

  async fn list_questions(
    &self,
    query: &QuestionQuery,
  ) -> CoreResult<Vec<Question>> {
    let pattern = query.search.as_deref().map(|s| format!("%{s}%"));
    let order = match query.order {
      QuestionOrder::CreatedAt => "q.created_at DESC",
      QuestionOrder::Votes => "q.votes DESC",
    };
    let limit  = query.limit.unwrap_or(100) as i64;
    let offset = query.offset.unwrap_or(0) as i64;

    let raws: Vec<(RawQuestion, Vec<RawTag>)> = self
      .conn
      .call(move |conn| {
        let questions: Vec<RawQuestion> = if let Some(pattern) = pattern {
          let sql = format!(
            "SELECT DISTINCT {QUESTION_COLS} FROM questions q \
             JOIN users u ON u.user_id = q.author_id \
             LEFT JOIN question_tags qt ON qt.question_id = q.question_id \
             LEFT JOIN tags t ON t.tag_id = qt.tag_id \
             WHERE q.title LIKE ?1 OR q.body LIKE ?1 OR t.name LIKE ?1 \
             ORDER BY {order} LIMIT ?2 OFFSET ?3"
          );
          let mut stmt = conn.prepare(&sql)?;
          stmt
            .query_map(rusqlite::params![pattern, limit, offset], map_question)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let sql = format!(
            "SELECT {QUESTION_COLS} FROM questions q \
             JOIN users u ON u.user_id = q.author_id \
             ORDER BY {order} LIMIT ?1 OFFSET ?2"
          );
          let mut stmt = conn.prepare(&sql)?;
          stmt
            .query_map(rusqlite::params![limit, offset], map_question)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        let mut out = Vec::with_capacity(questions.len());
        for q in questions {
          let tags = tags_for_question(conn, &q.question_id)?;
          out.push((q, tags));
        }
        Ok(out)
      })
      .await
      .map_err(Error::Database)?;

    let mut questions = Vec::with_capacity(raws.len());
    for (raw_q, raw_tags) in raws {
      let tags = raw_tags
        .into_iter()
        .map(RawTag::into_tag)
        .collect::<Result<_, _>>()?;
      questions.push(raw_q.into_question(tags)?);
    }
    Ok(questions)
  }

  async fn update_question(
    &self,
    id: Uuid,
    update: QuestionUpdate,
  ) -> CoreResult<Question> {
    let id_str  = encode_uuid(id);
    let now_str = encode_dt(Utc::now());

    let raw: Option<(RawQuestion, Vec<RawTag>)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let changed = tx.execute(
          "UPDATE questions SET \
             title      = COALESCE(?2, title), \
             body       = COALESCE(?3, body), \
             updated_at = ?4 \
           WHERE question_id = ?1",
          rusqlite::params![id_str, update.title, update.body, now_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }

        if let Some(names) = &update.tags {
          tx.execute(
            "DELETE FROM question_tags WHERE question_id = ?1",
            rusqlite::params![id_str],
          )?;
          attach_tags(&tx, &id_str, names)?;
        }

        let question = question_row(&tx, &id_str)?;
        let tags     = tags_for_question(&tx, &id_str)?;
        tx.commit()?;
        Ok(question.map(|q| (q, tags)))
      })
      .await
      .map_err(Error::Database)?;

    match raw {
      Some((raw_q, raw_tags)) => {
        let tags = raw_tags
          .into_iter()
          .map(RawTag::into_tag)
          .collect::<Result<_, _>>()?;
        Ok(raw_q.into_question(tags)?)
      }
      None => Err(CoreError::QuestionNotFound(id)),
    }
  }

  async fn delete_question(&self, id: Uuid) -> CoreResult<()> {
    let id_str = encode_uuid(id);
    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM questions WHERE question_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await
      .map_err(Error::Database)?;

    if deleted == 0 {
      return Err(CoreError::QuestionNotFound(id));
    }
    Ok(())
  }

  // ── Answers ───────────────────────────────────────────────────────────────

  async fn create_answer(&self, input: NewAnswer) -> CoreResult<Answer> {
    let answer_id    = Uuid::new_v4();
    let id_str       = encode_uuid(answer_id);
    let question_str = encode_uuid(input.question_id);
    let author_str   = encode_uuid(input.author_id);
    let now_str      = encode_dt(Utc::now());
    let question_id  = input.question_id;

    let raw: Option<RawAnswer> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let question_exists: bool = tx
          .query_row(
            "SELECT 1 FROM questions WHERE question_id = ?1",
            rusqlite::params![question_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !question_exists {
          return Ok(None);
        }

        tx.execute(
          "INSERT INTO answers \
             (answer_id, question_id, author_id, body, created_at, updated_at) \
           VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
          rusqlite::params![id_str, question_str, author_str, input.body, now_str],
        )?;

        let answer = answer_row(&tx, &id_str)?;
        tx.commit()?;
        Ok(answer)
      })
      .await
      .map_err(Error::Database)?;

    match raw {
      Some(raw) => Ok(raw.into_answer(Vec::new())?),
      None => Err(CoreError::QuestionNotFound(question_id)),
    }
  }

  async fn get_answer(&self, id: Uuid) -> CoreResult<Option<Answer>> {
    let id_str = encode_uuid(id);

    let raw: Option<(RawAnswer, Vec<RawComment>)> = self
      .conn
      .call(move |conn| {
        let Some(answer) = answer_row(conn, &id_str)? else {
          return Ok(None);
        };
        let comments = comments_where(conn, "answer_id", &id_str)?;
        Ok(Some((answer, comments)))
      })
      .await
      .map_err(Error::Database)?;

    match raw {
      Some((raw_a, raw_cs)) => {
        let comments = raw_cs
          .into_iter()
          .map(RawComment::into_comment)
          .collect::<Result<_, _>>()?;
        Ok(Some(raw_a.into_answer(comments)?))
      }
      None => Ok(None),
    }
  }

  async fn list_answers(
    &self,
    question_id: Option<Uuid>,
  ) -> CoreResult<Vec<Answer>> {
    let question_str = question_id.map(encode_uuid);

    let raws: Vec<(RawAnswer, Vec<RawComment>)> = self
      .conn
      .call(move |conn| {
        let answers = match &question_str {
          Some(qid) => answers_for_question(conn, qid)?,
          None => {
            let mut stmt = conn.prepare(&format!(
              "SELECT {ANSWER_COLS} FROM answers a \
               JOIN users u ON u.user_id = a.author_id \
               ORDER BY a.created_at"
            ))?;
            stmt
              .query_map([], map_answer)?
              .collect::<rusqlite::Result<Vec<_>>>()?
          }
        };

        let mut out = Vec::with_capacity(answers.len());
        for answer in answers {
          let comments = comments_where(conn, "answer_id", &answer.answer_id)?;
          out.push((answer, comments));
        }
        Ok(out)
      })
      .await
      .map_err(Error::Database)?;

    let mut answers = Vec::with_capacity(raws.len());
    for (raw_a, raw_cs) in raws {
      let comments = raw_cs
        .into_iter()
        .map(RawComment::into_comment)
        .collect::<Result<_, _>>()?;
      answers.push(raw_a.into_answer(comments)?);
    }
    Ok(answers)
  }

  async fn update_answer(
    &self,
    id: Uuid,
    update: AnswerUpdate,
  ) -> CoreResult<Answer> {
    let id_str  = encode_uuid(id);
    let now_str = encode_dt(Utc::now());

    let raw: Option<(RawAnswer, Vec<RawComment>)> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE answers SET \
             body       = COALESCE(?2, body), \
             updated_at = ?3 \
           WHERE answer_id = ?1",
          rusqlite::params![id_str, update.body, now_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        let Some(answer) = answer_row(conn, &id_str)? else {
          return Ok(None);
        };
        let comments = comments_where(conn, "answer_id", &id_str)?;
        Ok(Some((answer, comments)))
      })
      .await
      .map_err(Error::Database)?;

    match raw {
      Some((raw_a, raw_cs)) => {
        let comments = raw_cs
          .into_iter()
          .map(RawComment::into_comment)
          .collect::<Result<_, _>>()?;
        Ok(raw_a.into_answer(comments)?)
      }
      None => Err(CoreError::AnswerNotFound(id)),
    }
  }

  async fn delete_answer(&self, id: Uuid) -> CoreResult<()> {
    let id_str = encode_uuid(id);
    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM answers WHERE answer_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await
      .map_err(Error::Database)?;

    if deleted == 0 {
      return Err(CoreError::AnswerNotFound(id));
    }
    Ok(())
  }

  async fn mark_best(
    &self,
    answer_id: Uuid,
    acting_user: Uuid,
  ) -> CoreResult<()> {
    let answer_str = encode_uuid(answer_id);
    let acting_str = encode_uuid(acting_user);

    let outcome: MarkBestOutcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let row: Option<(String, String)> = tx
          .query_row(
            "SELECT a.question_id, q.author_id FROM answers a \
             JOIN questions q ON q.question_id = a.question_id \
             WHERE a.answer_id = ?1",
            rusqlite::params![answer_str],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?;

        let Some((question_id, author_id)) = row else {
          return Ok(MarkBestOutcome::AnswerMissing);
        };
        if author_id != acting_str {
          return Ok(MarkBestOutcome::NotAuthor);
        }

        // Clear siblings and set the target in one transaction so no
        // reader ever observes zero or two best answers.
        tx.execute(
          "UPDATE answers SET is_best = 0 \
           WHERE question_id = ?1 AND answer_id != ?2",
          rusqlite::params![question_id, answer_str],
        )?;
        tx.execute(
          "UPDATE answers SET is_best = 1 WHERE answer_id = ?1",
          rusqlite::params![answer_str],
        )?;

        tx.commit()?;
        Ok(MarkBestOutcome::Marked)
      })
      .await
      .map_err(Error::Database)?;

    match outcome {
      MarkBestOutcome::Marked => Ok(()),
      MarkBestOutcome::AnswerMissing => Err(CoreError::AnswerNotFound(answer_id)),
      MarkBestOutcome::NotAuthor => Err(CoreError::NotQuestionAuthor),
    }
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  async fn create_comment(&self, input: NewComment) -> CoreResult<Comment> {
    let comment_id = Uuid::new_v4();
    let id_str     = encode_uuid(comment_id);
    let author_str = encode_uuid(input.author_id);
    let now_str    = encode_dt(Utc::now());
    let target     = input.target;
    let target_str = encode_uuid(target.id());

    let (table, question_col, answer_col) = match target {
      Target::Question(_) => ("questions", Some(target_str.clone()), None),
      Target::Answer(_) => ("answers", None, Some(target_str.clone())),
    };
    let id_col = match target {
      Target::Question(_) => "question_id",
      Target::Answer(_) => "answer_id",
    };

    let raw: Option<RawComment> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let target_exists: bool = tx
          .query_row(
            &format!("SELECT 1 FROM {table} WHERE {id_col} = ?1"),
            rusqlite::params![target_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !target_exists {
          return Ok(None);
        }

        tx.execute(
          "INSERT INTO comments \
             (comment_id, author_id, question_id, answer_id, body, created_at) \
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            id_str,
            author_str,
            question_col,
            answer_col,
            input.body,
            now_str,
          ],
        )?;

        let comment = comment_row(&tx, &id_str)?;
        tx.commit()?;
        Ok(comment)
      })
      .await
      .map_err(Error::Database)?;

    match raw {
      Some(raw) => Ok(raw.into_comment()?),
      None => Err(match target {
        Target::Question(id) => CoreError::QuestionNotFound(id),
        Target::Answer(id) => CoreError::AnswerNotFound(id),
      }),
    }
  }

  async fn get_comment(&self, id: Uuid) -> CoreResult<Option<Comment>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawComment> = self
      .conn
      .call(move |conn| Ok(comment_row(conn, &id_str)?))
      .await
      .map_err(Error::Database)?;

    match raw {
      Some(raw) => Ok(Some(raw.into_comment()?)),
      None => Ok(None),
    }
  }

  async fn list_comments(&self, target: Target) -> CoreResult<Vec<Comment>> {
    let column = match target {
      Target::Question(_) => "question_id",
      Target::Answer(_) => "answer_id",
    };
    let id_str = encode_uuid(target.id());

    let raws: Vec<RawComment> = self
      .conn
      .call(move |conn| Ok(comments_where(conn, column, &id_str)?))
      .await
      .map_err(Error::Database)?;

    Ok(
      raws
        .into_iter()
        .map(RawComment::into_comment)
        .collect::<Result<_, _>>()?,
    )
  }

  async fn delete_comment(&self, id: Uuid) -> CoreResult<()> {
    let id_str = encode_uuid(id);
    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM comments WHERE comment_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await
      .map_err(Error::Database)?;

    if deleted == 0 {
      return Err(CoreError::CommentNotFound(id));
    }
    Ok(())
  }

  // ── Votes ─────────────────────────────────────────────────────────────────

  async fn cast_vote(
    &self,
    user_id: Uuid,
    target: Target,
    value: VoteValue,
  ) -> CoreResult<i64> {
    let user_str   = encode_uuid(user_id);
    let target_str = encode_uuid(target.id());
    let new_value  = value.as_i64();

    // Internal table/column names, chosen by the tagged target variant.
    let (table, id_col) = match target {
      Target::Question(_) => ("questions", "question_id"),
      Target::Answer(_) => ("answers", "answer_id"),
    };

    let outcome: VoteOutcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let target_exists: bool = tx
          .query_row(
            &format!("SELECT 1 FROM {table} WHERE {id_col} = ?1"),
            rusqlite::params![target_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !target_exists {
          return Ok(VoteOutcome::TargetMissing);
        }

        let existing: Option<(String, i64)> = tx
          .query_row(
            &format!(
              "SELECT vote_id, value FROM votes \
               WHERE user_id = ?1 AND {id_col} = ?2"
            ),
            rusqlite::params![user_str, target_str],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?;

        let delta = match existing {
          // First vote on this target.
          None => {
            tx.execute(
              &format!(
                "INSERT INTO votes (vote_id, user_id, {id_col}, value) \
                 VALUES (?1, ?2, ?3, ?4)"
              ),
              rusqlite::params![
                encode_uuid(Uuid::new_v4()),
                user_str,
                target_str,
                new_value,
              ],
            )?;
            new_value
          }
          // Same value again: toggle off, undoing the prior contribution.
          Some((vote_id, old_value)) if old_value == new_value => {
            tx.execute(
              "DELETE FROM votes WHERE vote_id = ?1",
              rusqlite::params![vote_id],
            )?;
            -old_value
          }
          // Opposite value: switch in place.
          Some((vote_id, old_value)) => {
            tx.execute(
              "UPDATE votes SET value = ?2 WHERE vote_id = ?1",
              rusqlite::params![vote_id, new_value],
            )?;
            new_value - old_value
          }
        };

        // Atomic column expression — never a read-modify-write of a value
        // cached on the Rust side.
        tx.execute(
          &format!(
            "UPDATE {table} SET votes = votes + ?1 WHERE {id_col} = ?2"
          ),
          rusqlite::params![delta, target_str],
        )?;

        let total: i64 = tx.query_row(
          &format!("SELECT votes FROM {table} WHERE {id_col} = ?1"),
          rusqlite::params![target_str],
          |r| r.get(0),
        )?;

        tx.commit()?;
        Ok(VoteOutcome::Applied(total))
      })
      .await
      .map_err(Error::Database)?;

    match outcome {
      VoteOutcome::Applied(total) => Ok(total),
      VoteOutcome::TargetMissing => Err(match target {
        Target::Question(id) => CoreError::QuestionNotFound(id),
        Target::Answer(id) => CoreError::AnswerNotFound(id),
      }),
    }
  }

  // ── Diplomas ──────────────────────────────────────────────────────────────

  async fn create_diploma(&self, input: NewDiploma) -> CoreResult<Diploma> {
    let diploma = Diploma {
      diploma_id:      Uuid::new_v4(),
      student_name:    input.student_name,
      student_id:      input.student_id,
      degree_name:     input.degree_name,
      major:           input.major,
      graduation_date: input.graduation_date,
      issue_date:      Utc::now().date_naive(),
      serial_number:   input.serial_number,
      qr_path:         input.qr_path,
      is_signed:       false,
      signature_data:  None,
    };

    let id_str     = encode_uuid(diploma.diploma_id);
    let name       = diploma.student_name.clone();
    let student_id = diploma.student_id.clone();
    let degree     = diploma.degree_name.clone();
    let major      = diploma.major.clone();
    let grad_str   = encode_date(diploma.graduation_date);
    let issue_str  = encode_date(diploma.issue_date);
    let serial     = diploma.serial_number.clone();
    let qr_path    = diploma.qr_path.clone();

    let result = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO diplomas \
             (diploma_id, student_name, student_id, degree_name, major, \
              graduation_date, issue_date, serial_number, qr_path) \
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id_str, name, student_id, degree, major, grad_str, issue_str,
            serial, qr_path,
          ],
        )?;
        Ok(())
      })
      .await;

    match result {
      Ok(()) => Ok(diploma),
      Err(e) => {
        if let Some(msg) = constraint_violation(&e) {
          if msg.contains("diplomas.student_id") {
            return Err(CoreError::StudentIdTaken(diploma.student_id));
          }
          if msg.contains("diplomas.serial_number") {
            return Err(CoreError::SerialTaken(diploma.serial_number));
          }
        }
        Err(Error::Database(e).into())
      }
    }
  }

  async fn get_diploma(&self, id: Uuid) -> CoreResult<Option<Diploma>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawDiploma> = self
      .conn
      .call(move |conn| Ok(diploma_where(conn, "diploma_id", &id_str)?))
      .await
      .map_err(Error::Database)?;
    Ok(raw.map(RawDiploma::into_diploma).transpose()?)
  }

  async fn get_diploma_by_serial(
    &self,
    serial: String,
  ) -> CoreResult<Option<Diploma>> {
    let raw: Option<RawDiploma> = self
      .conn
      .call(move |conn| Ok(diploma_where(conn, "serial_number", &serial)?))
      .await
      .map_err(Error::Database)?;
    Ok(raw.map(RawDiploma::into_diploma).transpose()?)
  }

  async fn list_diplomas(&self) -> CoreResult<Vec<Diploma>> {
    let raws: Vec<RawDiploma> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {DIPLOMA_COLS} FROM diplomas ORDER BY issue_date DESC"
        ))?;
        let rows = stmt
          .query_map([], map_diploma)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    Ok(
      raws
        .into_iter()
        .map(RawDiploma::into_diploma)
        .collect::<Result<_, _>>()?,
    )
  }

  async fn sign_diploma(
    &self,
    id: Uuid,
    signature: String,
  ) -> CoreResult<Diploma> {
    let id_str = encode_uuid(id);

    let raw: Option<RawDiploma> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // The NULL guard makes signing idempotent: once signature_data is
        // set it is never overwritten, even by a racing second sign.
        tx.execute(
          "UPDATE diplomas SET signature_data = ?2, is_signed = 1 \
           WHERE diploma_id = ?1 AND signature_data IS NULL",
          rusqlite::params![id_str, signature],
        )?;

        let diploma = diploma_where(&tx, "diploma_id", &id_str)?;
        tx.commit()?;
        Ok(diploma)
      })
      .await
      .map_err(Error::Database)?;

    match raw {
      Some(raw) => Ok(raw.into_diploma()?),
      None => Err(CoreError::DiplomaNotFound(id)),
    }
  }

  async fn delete_diploma(&self, id: Uuid) -> CoreResult<()> {
    let id_str = encode_uuid(id);
    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM diplomas WHERE diploma_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await
      .map_err(Error::Database)?;

    if deleted == 0 {
      return Err(CoreError::DiplomaNotFound(id));
    }
    Ok(())
  }
}
