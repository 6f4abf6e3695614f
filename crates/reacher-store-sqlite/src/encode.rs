//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. Clues, fun facts and trivia are
//! stored as compact JSON arrays. Identifiers are stored in their prefixed
//! string form and re-validated on the way out.

use chrono::{DateTime, Utc};
use reacher_core::{
  city::{City, Clue, NewCity},
  id::{CityId, InviteId, SessionId},
  invite::Invite,
  session::Session,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── JSON columns ────────────────────────────────────────────────────────────

pub fn encode_clues(clues: &[Clue]) -> Result<String> { Ok(serde_json::to_string(clues)?) }

pub fn decode_clues(s: &str) -> Result<Vec<Clue>> { Ok(serde_json::from_str(s)?) }

pub fn encode_strings(items: &[String]) -> Result<String> { Ok(serde_json::to_string(items)?) }

pub fn decode_strings(s: &str) -> Result<Vec<String>> { Ok(serde_json::from_str(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawCity::from_row`].
pub const CITY_COLUMNS: &str =
  "city_id, city, country, clues, fun_facts, trivia, created_at, updated_at";

/// Raw strings read directly from a `cities` row.
pub struct RawCity {
  pub city_id:    String,
  pub city:       String,
  pub country:    String,
  pub clues:      String,
  pub fun_facts:  String,
  pub trivia:     String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawCity {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      city_id:    row.get(0)?,
      city:       row.get(1)?,
      country:    row.get(2)?,
      clues:      row.get(3)?,
      fun_facts:  row.get(4)?,
      trivia:     row.get(5)?,
      created_at: row.get(6)?,
      updated_at: row.get(7)?,
    })
  }

  pub fn into_city(self) -> Result<City> {
    Ok(City {
      city_id:    CityId::parse(&self.city_id)?,
      city:       self.city,
      country:    self.country,
      clues:      decode_clues(&self.clues)?,
      fun_facts:  decode_strings(&self.fun_facts)?,
      trivia:     decode_strings(&self.trivia)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// A seed record encoded for insertion, with a freshly minted id that is
/// only used if the `(city, country)` pair is new.
pub struct EncodedCity {
  pub city_id:   String,
  pub city:      String,
  pub country:   String,
  pub clues:     String,
  pub fun_facts: String,
  pub trivia:    String,
}

impl EncodedCity {
  pub fn encode(input: &NewCity) -> Result<Self> {
    Ok(Self {
      city_id:   CityId::generate().to_string(),
      city:      input.city.clone(),
      country:   input.country.clone(),
      clues:     encode_clues(&input.clues)?,
      fun_facts: encode_strings(&input.fun_facts)?,
      trivia:    encode_strings(&input.trivia)?,
    })
  }
}

/// Column list matching [`RawSession::from_row`].
pub const SESSION_COLUMNS: &str =
  "session_id, points, is_active, username, image_link, created_at, updated_at";

/// Raw values read directly from a `sessions` row.
pub struct RawSession {
  pub session_id: String,
  pub points:     i64,
  pub is_active:  bool,
  pub username:   Option<String>,
  pub image_link: Option<String>,
  pub created_at: String,
  pub updated_at: String,
}

impl RawSession {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      session_id: row.get(0)?,
      points:     row.get(1)?,
      is_active:  row.get(2)?,
      username:   row.get(3)?,
      image_link: row.get(4)?,
      created_at: row.get(5)?,
      updated_at: row.get(6)?,
    })
  }

  pub fn into_session(self) -> Result<Session> {
    Ok(Session {
      session_id: SessionId::parse(&self.session_id)?,
      points:     self.points,
      is_active:  self.is_active,
      username:   self.username,
      image_link: self.image_link,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from an `invites` row.
pub struct RawInvite {
  pub invite_id:  String,
  pub session_id: String,
  pub created_at: String,
}

impl RawInvite {
  pub fn into_invite(self) -> Result<Invite> {
    Ok(Invite {
      invite_id:  InviteId::parse(&self.invite_id)?,
      session_id: SessionId::parse(&self.session_id)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
