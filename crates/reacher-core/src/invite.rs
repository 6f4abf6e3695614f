//! Invites: shareable links that show off a session's score.
//!
//! Creating the first invite turns an anonymous session into a named one: the
//! session receives a username and an avatar, and an invite record pointing
//! back at it is written in the same transaction. A session is named once;
//! later attempts are rejected rather than overwriting the profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{
  Error, Result,
  id::{InviteId, SessionId},
  session::{self, Session},
  store::GameStore,
};

pub const USERNAME_MIN_CHARS: usize = 3;
pub const USERNAME_MAX_CHARS: usize = 30;

/// An immutable record that a session shared its score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invite {
  pub invite_id:  InviteId,
  pub session_id: SessionId,
  pub created_at: DateTime<Utc>,
}

/// The public face assigned to a session when it first shares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
  pub username:   String,
  pub image_link: String,
}

/// What the store did with a [`GameStore::create_invite`] request.
#[derive(Debug, Clone)]
pub enum InviteOutcome {
  Created { session: Session, invite: Invite },
  SessionMissing,
  /// The session already carries a username.
  AlreadyNamed,
  /// Another session holds the requested username.
  UsernameTaken,
}

/// An invite joined with the current state of the session that created it.
#[derive(Debug, Clone)]
pub struct InviteView {
  pub invite:  Invite,
  pub session: Session,
}

/// What a visitor following an invite link gets to see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedScore {
  pub username:   String,
  pub points:     i64,
  pub image_link: String,
}

pub fn validate_username(username: &str) -> Result<()> {
  let chars = username.chars().count();
  if chars < USERNAME_MIN_CHARS {
    return Err(Error::InvalidUsername(format!(
      "must contain at least {USERNAME_MIN_CHARS} characters"
    )));
  }
  if chars > USERNAME_MAX_CHARS {
    return Err(Error::InvalidUsername(format!(
      "must contain at most {USERNAME_MAX_CHARS} characters"
    )));
  }
  Ok(())
}

/// Identicon avatar derived from the session id.
pub fn avatar_url(session_id: &SessionId) -> String {
  let digest = Sha256::digest(session_id.as_str().as_bytes());
  format!("https://gravatar.com/avatar/{}?d=identicon", hex::encode(digest))
}

/// Name an active session and record an invite for it.
pub async fn create_invite<S>(
  store: &S,
  session_id: &SessionId,
  username: &str,
) -> Result<(Session, Invite)>
where
  S: GameStore,
{
  validate_username(username)?;

  let session = session::require_active(store, session_id).await?;
  if session.username.is_some() {
    return Err(Error::ProfileAlreadySet(session_id.clone()));
  }

  let profile = Profile {
    username:   username.to_owned(),
    image_link: avatar_url(session_id),
  };

  match store
    .create_invite(session_id.clone(), profile)
    .await
    .map_err(Error::store)?
  {
    InviteOutcome::Created { session, invite } => Ok((session, invite)),
    InviteOutcome::SessionMissing => Err(Error::SessionMissing(session_id.clone())),
    InviteOutcome::AlreadyNamed => Err(Error::ProfileAlreadySet(session_id.clone())),
    InviteOutcome::UsernameTaken => Err(Error::UsernameTaken(username.to_owned())),
  }
}

/// Resolve an invite to the score it advertises.
pub async fn shared_score<S>(store: &S, invite_id: &InviteId) -> Result<SharedScore>
where
  S: GameStore,
{
  let view = store
    .get_invite(invite_id.clone())
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::InviteMissing(invite_id.clone()))?;

  match (view.session.username, view.session.image_link) {
    (Some(username), Some(image_link)) => Ok(SharedScore {
      username,
      points: view.session.points,
      image_link,
    }),
    _ => Err(Error::DataIntegrity(format!(
      "invite {invite_id} points at session {} which has no profile",
      view.invite.session_id
    ))),
  }
}
