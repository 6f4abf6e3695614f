//! SQL schema for the Reacher SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Written by the seeding tool only; read by every request.
CREATE TABLE IF NOT EXISTS cities (
    city_id     TEXT PRIMARY KEY,   -- city_<ULID>
    city        TEXT NOT NULL,
    country     TEXT NOT NULL,
    clues       TEXT NOT NULL,      -- JSON array of {value, difficulty}
    fun_facts   TEXT NOT NULL,      -- JSON array of strings
    trivia      TEXT NOT NULL,      -- JSON array of strings
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    UNIQUE (city, country)
);

CREATE TABLE IF NOT EXISTS sessions (
    session_id  TEXT PRIMARY KEY,   -- sess_<ULID>
    points      INTEGER NOT NULL CHECK (points >= 0),
    is_active   INTEGER NOT NULL DEFAULT 1,
    username    TEXT UNIQUE,        -- assigned once, on first invite
    image_link  TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

-- Invites are never updated or deleted.
CREATE TABLE IF NOT EXISTS invites (
    invite_id   TEXT PRIMARY KEY,   -- invi_<ULID>
    session_id  TEXT NOT NULL REFERENCES sessions(session_id),
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS invites_session_idx ON invites(session_id);

PRAGMA user_version = 1;
";
