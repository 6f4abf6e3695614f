//! The `GameStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `reacher-store-sqlite`).
//! Every core operation receives a store handle explicitly; nothing in this
//! crate holds a global client. Randomness never lives in the store: the
//! catalog exposes counts and offsets and the caller's RNG does the choosing.

use std::future::Future;

use crate::{
  city::{City, CityOption},
  id::{CityId, InviteId, SessionId},
  invite::{InviteOutcome, InviteView, Profile},
  session::Session,
};

/// Abstraction over a Reacher storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait GameStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── City catalog ──────────────────────────────────────────────────────

  /// Number of cities in the catalog.
  fn count_cities(&self) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// The city at `offset` in a stable ordering (by id). `None` past the end.
  fn city_at(
    &self,
    offset: usize,
  ) -> impl Future<Output = Result<Option<City>, Self::Error>> + Send + '_;

  /// Retrieve a city by id. Returns `None` if not found.
  fn get_city(
    &self,
    id: CityId,
  ) -> impl Future<Output = Result<Option<City>, Self::Error>> + Send + '_;

  /// Every city except `id`, as answer options. Read as one snapshot so the
  /// result never contains duplicates.
  fn cities_excluding(
    &self,
    id: CityId,
  ) -> impl Future<Output = Result<Vec<CityOption>, Self::Error>> + Send + '_;

  // ── Sessions ──────────────────────────────────────────────────────────

  /// Create and persist an active session holding `initial_points`.
  fn create_session(
    &self,
    initial_points: i64,
  ) -> impl Future<Output = Result<Session, Self::Error>> + Send + '_;

  /// Retrieve a session by id. Returns `None` if not found.
  fn get_session(
    &self,
    id: SessionId,
  ) -> impl Future<Output = Result<Option<Session>, Self::Error>> + Send + '_;

  /// Atomically set `points = max(floor, points + delta)` and return the new
  /// balance. Returns `None` if the session does not exist.
  ///
  /// Implementations must apply the read-modify-write as one indivisible
  /// step: concurrent adjustments of the same session may not lose updates.
  fn adjust_points(
    &self,
    id: SessionId,
    delta: i64,
    floor: i64,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + '_;

  // ── Invites ───────────────────────────────────────────────────────────

  /// Assign `profile` to a session that has no username yet and record a new
  /// invite for it, all in one transaction. Rejections are reported through
  /// [`InviteOutcome`], not through `Self::Error`.
  fn create_invite(
    &self,
    session_id: SessionId,
    profile: Profile,
  ) -> impl Future<Output = Result<InviteOutcome, Self::Error>> + Send + '_;

  /// Retrieve an invite together with the current state of its session.
  fn get_invite(
    &self,
    id: InviteId,
  ) -> impl Future<Output = Result<Option<InviteView>, Self::Error>> + Send + '_;
}
