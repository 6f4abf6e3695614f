//! Prefixed, time-sortable identifiers.
//!
//! Every identifier is rendered as `<tag>_<ulid>`, e.g.
//! `sess_01HZX3W8K5Q9T2V7B4N6M0C1DE`. The ULID half is 26 characters of
//! Crockford base32 whose leading 10 characters encode the creation
//! millisecond, so ids of one kind sort lexicographically by creation time.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ulid::Ulid;

use crate::Error;

const ULID_LEN: usize = 26;

/// `true` if `s` is `<tag>_` followed by a canonical (uppercase) ULID.
fn is_prefixed_ulid(s: &str, tag: &str) -> bool {
  s.strip_prefix(tag)
    .and_then(|rest| rest.strip_prefix('_'))
    .is_some_and(|ulid| {
      ulid.len() == ULID_LEN
        && ulid.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_uppercase())
        && Ulid::from_string(ulid).is_ok()
    })
}

macro_rules! prefixed_id {
  ($(#[$meta:meta])* $name:ident, $tag:literal) => {
    $(#[$meta])*
    #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct $name(String);

    impl $name {
      /// The human-readable type tag placed before the underscore.
      pub const TAG: &'static str = $tag;

      /// Mint a fresh identifier stamped with the current time.
      pub fn generate() -> Self { Self(format!("{}_{}", $tag, Ulid::new())) }

      /// Validate and wrap an identifier received from outside.
      pub fn parse(s: &str) -> Result<Self, Error> {
        if is_prefixed_ulid(s, $tag) {
          Ok(Self(s.to_owned()))
        } else {
          Err(Error::InvalidId { expected: $tag, value: s.to_owned() })
        }
      }

      pub fn as_str(&self) -> &str { &self.0 }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
    }

    impl FromStr for $name {
      type Err = Error;

      fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
    }

    impl Serialize for $name {
      fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
      }
    }

    impl<'de> Deserialize<'de> for $name {
      fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
      }
    }
  };
}

prefixed_id!(
  /// Identifies a player session (`sess_…`).
  SessionId,
  "sess"
);

prefixed_id!(
  /// Identifies a city in the catalog (`city_…`).
  CityId,
  "city"
);

prefixed_id!(
  /// Identifies a shareable invite (`invi_…`).
  InviteId,
  "invi"
);
