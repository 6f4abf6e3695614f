//! Sessions: the per-player identity that carries a points balance.
//!
//! A session starts active with [`GameRules::initial_points`]. Its balance
//! changes only through guess verification, so it can always be recomputed by
//! replaying guess outcomes from the initial value. Deactivation is an
//! administrative capability of the store and is never reachable from play.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, id::SessionId, rules::GameRules, store::GameStore};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
  pub session_id: SessionId,
  /// Never negative.
  pub points:     i64,
  pub is_active:  bool,
  /// Globally unique once set; assigned at most once.
  pub username:   Option<String>,
  pub image_link: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Session {
  /// Fail with [`Error::SessionInactive`] unless the session may play.
  pub fn ensure_active(&self) -> Result<()> {
    if self.is_active {
      Ok(())
    } else {
      Err(Error::SessionInactive(self.session_id.clone()))
    }
  }
}

/// Create a fresh active session with the configured starting balance.
pub async fn create_session<S>(store: &S, rules: &GameRules) -> Result<Session>
where
  S: GameStore,
{
  store
    .create_session(i64::from(rules.initial_points))
    .await
    .map_err(Error::store)
}

/// Load a session regardless of its state.
pub async fn find_session<S>(store: &S, id: &SessionId) -> Result<Session>
where
  S: GameStore,
{
  store
    .get_session(id.clone())
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::SessionMissing(id.clone()))
}

/// Load a session and require it to be active.
pub async fn require_active<S>(store: &S, id: &SessionId) -> Result<Session>
where
  S: GameStore,
{
  let session = find_session(store, id).await?;
  session.ensure_active()?;
  Ok(session)
}
