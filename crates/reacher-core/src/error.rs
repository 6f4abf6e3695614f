//! Error types for `reacher-core`.

use thiserror::Error;

use crate::id::{CityId, InviteId, SessionId};

/// Coarse classification of an [`Error`], used by transport layers to pick a
/// status code and to decide whether the message may be shown to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Malformed or unacceptable input; the caller can fix it.
  ClientError,
  NotFound,
  /// The session exists but is not allowed to play.
  Forbidden,
  /// A uniqueness rule was violated (e.g. a username already in use).
  Conflict,
  /// Misconfiguration, inconsistent data, or a store failure. Never shown to
  /// the caller in detail.
  Internal,
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("session not found: {0}")]
  SessionMissing(SessionId),

  #[error("session {0} is inactive")]
  SessionInactive(SessionId),

  #[error("city not found: {0}")]
  CityMissing(CityId),

  #[error("invite not found: {0}")]
  InviteMissing(InviteId),

  #[error("invalid {expected} id: {value:?}")]
  InvalidId {
    expected: &'static str,
    value:    String,
  },

  #[error("invalid username: {0}")]
  InvalidUsername(String),

  #[error("session {0} already has a username")]
  ProfileAlreadySet(SessionId),

  #[error("username already taken: {0}")]
  UsernameTaken(String),

  #[error("catalog holds {found} cities but at least {required} are needed")]
  CatalogTooSmall { found: usize, required: usize },

  #[error("data integrity: {0}")]
  DataIntegrity(String),

  #[error("malformed dataset: {0}")]
  Dataset(#[from] serde_json::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }

  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::InvalidId { .. }
      | Self::InvalidUsername(_)
      | Self::ProfileAlreadySet(_) => ErrorKind::ClientError,
      Self::SessionMissing(_) | Self::CityMissing(_) | Self::InviteMissing(_) => {
        ErrorKind::NotFound
      }
      Self::SessionInactive(_) => ErrorKind::Forbidden,
      Self::UsernameTaken(_) => ErrorKind::Conflict,
      Self::CatalogTooSmall { .. }
      | Self::DataIntegrity(_)
      | Self::Dataset(_)
      | Self::Store(_) => ErrorKind::Internal,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn classification() {
    let sess = SessionId::generate();
    assert_eq!(Error::SessionMissing(sess.clone()).kind(), ErrorKind::NotFound);
    assert_eq!(Error::SessionInactive(sess.clone()).kind(), ErrorKind::Forbidden);
    assert_eq!(Error::ProfileAlreadySet(sess).kind(), ErrorKind::ClientError);
    assert_eq!(Error::UsernameTaken("ada".into()).kind(), ErrorKind::Conflict);
    assert_eq!(
      Error::CatalogTooSmall { found: 3, required: 4 }.kind(),
      ErrorKind::Internal
    );
    assert_eq!(
      Error::store(std::io::Error::other("disk on fire")).kind(),
      ErrorKind::Internal
    );
  }
}
