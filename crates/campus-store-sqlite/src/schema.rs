//! SQL schema for the Campus SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id       TEXT PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL,
    password_hash TEXT NOT NULL,   -- argon2 PHC string
    role          TEXT NOT NULL,   -- 'ADMIN' | 'STUDENT' | 'TEACHER' | 'STAFF'
    bio           TEXT NOT NULL DEFAULT '',
    avatar_url    TEXT,
    created_at    TEXT NOT NULL    -- ISO 8601 UTC
);

CREATE TABLE IF NOT EXISTS tags (
    tag_id TEXT PRIMARY KEY,
    name   TEXT NOT NULL UNIQUE,
    slug   TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS questions (
    question_id TEXT PRIMARY KEY,
    author_id   TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    title       TEXT NOT NULL,
    body        TEXT NOT NULL,
    -- Denormalized counter; written only by the vote engine transaction.
    votes       INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS question_tags (
    question_id TEXT NOT NULL REFERENCES questions(question_id) ON DELETE CASCADE,
    tag_id      TEXT NOT NULL REFERENCES tags(tag_id) ON DELETE CASCADE,
    PRIMARY KEY (question_id, tag_id)
);

CREATE TABLE IF NOT EXISTS answers (
    answer_id   TEXT PRIMARY KEY,
    question_id TEXT NOT NULL REFERENCES questions(question_id) ON DELETE CASCADE,
    author_id   TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    body        TEXT NOT NULL,
    votes       INTEGER NOT NULL DEFAULT 0,
    is_best     INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

-- Exactly one of question_id / answer_id is set.
CREATE TABLE IF NOT EXISTS comments (
    comment_id  TEXT PRIMARY KEY,
    author_id   TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    question_id TEXT REFERENCES questions(question_id) ON DELETE CASCADE,
    answer_id   TEXT REFERENCES answers(answer_id) ON DELETE CASCADE,
    body        TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    CHECK ((question_id IS NULL) != (answer_id IS NULL))
);

CREATE TABLE IF NOT EXISTS votes (
    vote_id     TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    question_id TEXT REFERENCES questions(question_id) ON DELETE CASCADE,
    answer_id   TEXT REFERENCES answers(answer_id) ON DELETE CASCADE,
    value       INTEGER NOT NULL CHECK (value IN (1, -1)),
    CHECK ((question_id IS NULL) != (answer_id IS NULL))
);

-- At most one vote per (user, question) and per (user, answer); partial
-- uniqueness conditioned on the sibling column being null.
CREATE UNIQUE INDEX IF NOT EXISTS votes_user_question_idx
    ON votes(user_id, question_id) WHERE answer_id IS NULL;
CREATE UNIQUE INDEX IF NOT EXISTS votes_user_answer_idx
    ON votes(user_id, answer_id) WHERE question_id IS NULL;

CREATE TABLE IF NOT EXISTS diplomas (
    diploma_id      TEXT PRIMARY KEY,
    student_name    TEXT NOT NULL,
    student_id      TEXT NOT NULL UNIQUE,
    degree_name     TEXT NOT NULL,
    major           TEXT NOT NULL,
    graduation_date TEXT NOT NULL,   -- ISO date
    issue_date      TEXT NOT NULL,   -- ISO date, set at creation
    serial_number   TEXT NOT NULL UNIQUE,
    qr_path         TEXT,
    is_signed       INTEGER NOT NULL DEFAULT 0,
    signature_data  TEXT             -- populated at most once
);

CREATE INDEX IF NOT EXISTS questions_author_idx   ON questions(author_id);
CREATE INDEX IF NOT EXISTS questions_created_idx  ON questions(created_at);
CREATE INDEX IF NOT EXISTS answers_question_idx   ON answers(question_id);
CREATE INDEX IF NOT EXISTS comments_question_idx  ON comments(question_id);
CREATE INDEX IF NOT EXISTS comments_answer_idx    ON comments(answer_id);

PRAGMA user_version = 1;
";
