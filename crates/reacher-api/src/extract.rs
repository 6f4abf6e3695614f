//! Request extractors that reject with [`ApiError`] so failures keep the
//! standard envelope.

use axum::{
  extract::{FromRequest, FromRequestParts},
  http::request::Parts,
};
use reacher_core::id::SessionId;

use crate::error::ApiError;

/// Header carrying the opaque session token.
pub const SESSION_HEADER: &str = "session-id";

/// The caller's session id, taken from the `session-id` header.
///
/// Only the id's shape is checked here; whether the session exists and may
/// play is decided by the core operation the handler calls.
#[derive(Debug, Clone)]
pub struct SessionHeader(pub SessionId);

impl<St> FromRequestParts<St> for SessionHeader
where
  St: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
    let raw = parts
      .headers
      .get(SESSION_HEADER)
      .and_then(|v| v.to_str().ok())
      .filter(|v| !v.is_empty())
      .ok_or(ApiError::MissingSession)?;

    Ok(SessionHeader(SessionId::parse(raw)?))
  }
}

/// `axum::Json` with body rejections reported as 400 envelopes.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
