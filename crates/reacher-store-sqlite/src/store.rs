//! [`SqliteStore`]: the SQLite implementation of [`GameStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, TransactionBehavior};

use reacher_core::{
  city::{City, CityOption, NewCity},
  id::{CityId, InviteId, SessionId},
  invite::{Invite, InviteOutcome, InviteView, Profile},
  session::Session,
  store::GameStore,
};

use crate::{
  encode::{encode_dt, EncodedCity, RawCity, RawInvite, RawSession, CITY_COLUMNS, SESSION_COLUMNS},
  schema::SCHEMA,
  Result,
};

/// What the invite transaction saw, before the session row is decoded.
enum RawInviteOutcome {
  Created(RawSession),
  SessionMissing,
  AlreadyNamed,
  UsernameTaken,
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Reacher game store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Administration ────────────────────────────────────────────────────────

  /// Upsert a batch of seed records in one transaction, keyed on
  /// `(city, country)`. Existing cities keep their id and creation time; their
  /// clues, fun facts and trivia are replaced. Returns the number of records
  /// written.
  ///
  /// Every record is validated before anything is written, so a bad record
  /// leaves the catalog untouched.
  pub async fn seed_cities(&self, cities: Vec<NewCity>) -> Result<usize> {
    let rows = cities
      .iter()
      .map(|city| {
        city.validate()?;
        EncodedCity::encode(city)
      })
      .collect::<Result<Vec<_>>>()?;
    let now_str = encode_dt(Utc::now());

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO cities
               (city_id, city, country, clues, fun_facts, trivia, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
             ON CONFLICT (city, country) DO UPDATE SET
               clues      = excluded.clues,
               fun_facts  = excluded.fun_facts,
               trivia     = excluded.trivia,
               updated_at = excluded.updated_at",
          )?;
          for row in &rows {
            stmt.execute(rusqlite::params![
              row.city_id,
              row.city,
              row.country,
              row.clues,
              row.fun_facts,
              row.trivia,
              now_str,
            ])?;
          }
        }
        tx.commit()?;
        Ok(rows.len())
      })
      .await?;

    Ok(written)
  }

  /// Activate or deactivate a session. Returns `false` if it does not exist.
  pub async fn set_session_active(&self, id: &SessionId, active: bool) -> Result<bool> {
    let id_str = id.to_string();
    let now_str = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE sessions SET is_active = ?2, updated_at = ?3 WHERE session_id = ?1",
          rusqlite::params![id_str, active, now_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }
}

// ─── GameStore impl ──────────────────────────────────────────────────────────

impl GameStore for SqliteStore {
  type Error = crate::Error;

  // ── City catalog ──────────────────────────────────────────────────────────

  async fn count_cities(&self) -> Result<usize> {
    let count: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM cities", [], |r| r.get(0))?))
      .await?;
    Ok(count as usize)
  }

  async fn city_at(&self, offset: usize) -> Result<Option<City>> {
    let offset = offset as i64;

    let raw: Option<RawCity> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {CITY_COLUMNS} FROM cities ORDER BY city_id LIMIT 1 OFFSET ?1"),
            rusqlite::params![offset],
            RawCity::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawCity::into_city).transpose()
  }

  async fn get_city(&self, id: CityId) -> Result<Option<City>> {
    let id_str = id.to_string();

    let raw: Option<RawCity> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {CITY_COLUMNS} FROM cities WHERE city_id = ?1"),
            rusqlite::params![id_str],
            RawCity::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawCity::into_city).transpose()
  }

  async fn cities_excluding(&self, id: CityId) -> Result<Vec<CityOption>> {
    let id_str = id.to_string();

    let options = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT city, country FROM cities WHERE city_id != ?1 ORDER BY city_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok(CityOption {
              city:    row.get(0)?,
              country: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(options)
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn create_session(&self, initial_points: i64) -> Result<Session> {
    let now = Utc::now();
    let session = Session {
      session_id: SessionId::generate(),
      points:     initial_points,
      is_active:  true,
      username:   None,
      image_link: None,
      created_at: now,
      updated_at: now,
    };

    let id_str = session.session_id.to_string();
    let at_str = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (session_id, points, is_active, created_at, updated_at)
           VALUES (?1, ?2, 1, ?3, ?3)",
          rusqlite::params![id_str, initial_points, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(session)
  }

  async fn get_session(&self, id: SessionId) -> Result<Option<Session>> {
    let id_str = id.to_string();

    let raw: Option<RawSession> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE session_id = ?1"),
            rusqlite::params![id_str],
            RawSession::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSession::into_session).transpose()
  }

  async fn adjust_points(&self, id: SessionId, delta: i64, floor: i64) -> Result<Option<i64>> {
    let id_str = id.to_string();
    let now_str = encode_dt(Utc::now());

    // A single statement, so SQLite applies the read-modify-write atomically.
    let points: Option<i64> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "UPDATE sessions
                SET points = MAX(?3, points + ?2), updated_at = ?4
              WHERE session_id = ?1
             RETURNING points",
            rusqlite::params![id_str, delta, floor, now_str],
            |r| r.get(0),
          )
          .optional()?)
      })
      .await?;

    Ok(points)
  }

  // ── Invites ───────────────────────────────────────────────────────────────

  async fn create_invite(&self, session_id: SessionId, profile: Profile) -> Result<InviteOutcome> {
    let invite = Invite {
      invite_id: InviteId::generate(),
      session_id,
      created_at: Utc::now(),
    };

    let invite_id_str = invite.invite_id.to_string();
    let session_id_str = invite.session_id.to_string();
    let at_str = encode_dt(invite.created_at);
    let Profile { username, image_link } = profile;

    let raw = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current: Option<Option<String>> = tx
          .query_row(
            "SELECT username FROM sessions WHERE session_id = ?1",
            rusqlite::params![session_id_str],
            |r| r.get(0),
          )
          .optional()?;

        let outcome = match current {
          None => RawInviteOutcome::SessionMissing,
          Some(Some(_)) => RawInviteOutcome::AlreadyNamed,
          Some(None) => {
            let taken = tx
              .query_row(
                "SELECT 1 FROM sessions WHERE username = ?1",
                rusqlite::params![username],
                |_| Ok(()),
              )
              .optional()?
              .is_some();

            if taken {
              RawInviteOutcome::UsernameTaken
            } else {
              tx.execute(
                "UPDATE sessions SET username = ?2, image_link = ?3, updated_at = ?4
                  WHERE session_id = ?1 AND username IS NULL",
                rusqlite::params![session_id_str, username, image_link, at_str],
              )?;
              tx.execute(
                "INSERT INTO invites (invite_id, session_id, created_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![invite_id_str, session_id_str, at_str],
              )?;
              let session = tx.query_row(
                &format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE session_id = ?1"),
                rusqlite::params![session_id_str],
                RawSession::from_row,
              )?;
              RawInviteOutcome::Created(session)
            }
          }
        };

        tx.commit()?;
        Ok(outcome)
      })
      .await?;

    Ok(match raw {
      RawInviteOutcome::Created(session) => InviteOutcome::Created {
        session: session.into_session()?,
        invite,
      },
      RawInviteOutcome::SessionMissing => InviteOutcome::SessionMissing,
      RawInviteOutcome::AlreadyNamed => InviteOutcome::AlreadyNamed,
      RawInviteOutcome::UsernameTaken => InviteOutcome::UsernameTaken,
    })
  }

  async fn get_invite(&self, id: InviteId) -> Result<Option<InviteView>> {
    let id_str = id.to_string();

    let raw: Option<(RawInvite, RawSession)> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT i.invite_id, i.session_id, i.created_at,
                    s.session_id, s.points, s.is_active, s.username, s.image_link,
                    s.created_at, s.updated_at
               FROM invites i
               JOIN sessions s ON s.session_id = i.session_id
              WHERE i.invite_id = ?1",
            rusqlite::params![id_str],
            |row| {
              let invite = RawInvite {
                invite_id:  row.get(0)?,
                session_id: row.get(1)?,
                created_at: row.get(2)?,
              };
              let session = RawSession {
                session_id: row.get(3)?,
                points:     row.get(4)?,
                is_active:  row.get(5)?,
                username:   row.get(6)?,
                image_link: row.get(7)?,
                created_at: row.get(8)?,
                updated_at: row.get(9)?,
              };
              Ok((invite, session))
            },
          )
          .optional()?)
      })
      .await?;

    raw
      .map(|(invite, session)| {
        Ok(InviteView {
          invite:  invite.into_invite()?,
          session: session.into_session()?,
        })
      })
      .transpose()
  }
}
