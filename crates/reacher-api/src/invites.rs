//! Handlers for `/invite` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/invite` | `session-id` header; body `{"username":"ada"}` |
//! | `GET`  | `/invite/:id` | No session needed; 404 if not found |

use axum::{
  Json,
  extract::{Path, State},
};
use reacher_core::{
  id::InviteId,
  invite::{self, SharedScore},
  store::GameStore,
};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  envelope::{self, Envelope},
  error::ApiError,
  extract::{ApiJson, SessionHeader},
};

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub username: String,
}

#[derive(Debug, Serialize)]
pub struct InviteCreated {
  pub username:     String,
  pub points:       i64,
  pub image_link:   String,
  pub invite_id:    InviteId,
  pub invite_link:  String,
  pub wa_image_url: String,
  pub wa_text:      String,
}

/// `POST /invite`: names the session on first use and records an invite.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  SessionHeader(session_id): SessionHeader,
  ApiJson(body): ApiJson<CreateBody>,
) -> Result<Json<Envelope<InviteCreated>>, ApiError>
where
  S: GameStore,
{
  let (session, invite) =
    invite::create_invite(&*state.store, &session_id, &body.username).await?;
  tracing::info!(%session_id, invite_id = %invite.invite_id, "invite created");

  let image_link = session.image_link.ok_or_else(|| {
    reacher_core::Error::DataIntegrity(format!("session {session_id} was named without an avatar"))
  })?;

  Ok(envelope::ok(InviteCreated {
    username: body.username,
    points: session.points,
    image_link,
    invite_link: state.share.invite_link(&invite.invite_id),
    invite_id: invite.invite_id,
    wa_image_url: state.share.share_image_url.clone(),
    wa_text: state.share.share_text.clone(),
  }))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /invite/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Envelope<SharedScore>>, ApiError>
where
  S: GameStore,
{
  let invite_id = InviteId::parse(&id)?;
  let score = invite::shared_score(&*state.store, &invite_id).await?;
  Ok(envelope::ok(score))
}
