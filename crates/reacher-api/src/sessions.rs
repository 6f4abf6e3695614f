//! Handlers for `/session` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/session` | No body; returns 201 + `{session_id, points}` |
//! | `GET`  | `/session` | `session-id` header; 404 if not found |

use axum::{Json, extract::State, http::StatusCode};
use reacher_core::{id::SessionId, session, store::GameStore};
use serde::Serialize;

use crate::{
  AppState,
  envelope::{self, Envelope},
  error::ApiError,
  extract::SessionHeader,
};

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SessionCreated {
  pub session_id: SessionId,
  pub points:     i64,
}

/// `POST /session`
pub async fn create<S>(
  State(state): State<AppState<S>>,
) -> Result<(StatusCode, Json<Envelope<SessionCreated>>), ApiError>
where
  S: GameStore,
{
  let session = session::create_session(&*state.store, &state.rules).await?;
  tracing::info!(session_id = %session.session_id, points = session.points, "session created");

  Ok(envelope::created(SessionCreated {
    session_id: session.session_id,
    points:     session.points,
  }))
}

// ─── Current ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SessionView {
  pub session_id: SessionId,
  pub points:     i64,
  pub username:   Option<String>,
  pub image_link: Option<String>,
  pub is_active:  bool,
}

/// `GET /session`
///
/// Inactive sessions are still readable.
pub async fn current<S>(
  State(state): State<AppState<S>>,
  SessionHeader(session_id): SessionHeader,
) -> Result<Json<Envelope<SessionView>>, ApiError>
where
  S: GameStore,
{
  let session = session::find_session(&*state.store, &session_id).await?;
  Ok(envelope::ok(SessionView {
    session_id: session.session_id,
    points:     session.points,
    username:   session.username,
    image_link: session.image_link,
    is_active:  session.is_active,
  }))
}
