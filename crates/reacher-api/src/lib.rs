//! JSON REST API for Reacher.
//!
//! Exposes an axum [`Router`] backed by any [`reacher_core::store::GameStore`].
//! Every response uses the `{"success": bool, ...}` envelope. Rate limiting,
//! CORS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api/v1", reacher_api::api_router(state.clone()))
//! ```

pub mod cities;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod invites;
pub mod sessions;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use reacher_core::{id::InviteId, rules::GameRules, store::GameStore};
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Links and copy returned when a session shares its score.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShareSettings {
  /// Invite links are `<invite_base_url>/<invite_id>`.
  pub invite_base_url: String,
  pub share_image_url: String,
  pub share_text:      String,
}

impl Default for ShareSettings {
  fn default() -> Self {
    Self {
      invite_base_url: "https://reacher.app/invite".to_owned(),
      share_image_url: "https://reacher.app/share.png".to_owned(),
      share_text:      "welcome!".to_owned(),
    }
  }
}

impl ShareSettings {
  pub fn invite_link(&self, invite_id: &InviteId) -> String {
    format!("{}/{invite_id}", self.invite_base_url.trim_end_matches('/'))
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: GameStore> {
  pub store: Arc<S>,
  pub rules: GameRules,
  pub share: Arc<ShareSettings>,
}

impl<S: GameStore> AppState<S> {
  pub fn new(store: S, rules: GameRules, share: ShareSettings) -> Self {
    Self {
      store: Arc::new(store),
      rules,
      share: Arc::new(share),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: GameStore + Clone + 'static,
{
  Router::new()
    // Sessions
    .route("/session", post(sessions::create::<S>).get(sessions::current::<S>))
    // Gameplay
    .route("/city/random", get(cities::random::<S>))
    .route("/city/guess/verify", post(cities::verify::<S>))
    // Invites
    .route("/invite", post(invites::create::<S>))
    .route("/invite/{id}", get(invites::get_one::<S>))
    .with_state(state)
}

#[cfg(test)]
mod tests;
