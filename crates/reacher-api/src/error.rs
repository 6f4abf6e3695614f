//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use reacher_core::ErrorKind;
use serde_json::json;
use thiserror::Error;

/// Shown in place of the real message for every 5xx response.
pub const GENERIC_FAILURE: &str = "Something went wrong";

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Core(#[from] reacher_core::Error),

  #[error("missing session-id header")]
  MissingSession,

  #[error("Malformed body passed: {0}")]
  MalformedBody(String),

  #[error("no route for this path")]
  UnknownRoute,

  #[error("too many requests, please try again later")]
  RateLimited,
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { Self::MalformedBody(rejection.body_text()) }
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Core(e) => match e.kind() {
        ErrorKind::ClientError => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
      },
      ApiError::MissingSession | ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
      ApiError::UnknownRoute => StatusCode::NOT_FOUND,
      ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let message = if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
      GENERIC_FAILURE.to_owned()
    } else {
      tracing::debug!(error = %self, %status, "request rejected");
      self.to_string()
    };
    (status, Json(json!({ "success": false, "message": message }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use reacher_core::id::SessionId;

  use super::*;

  #[test]
  fn core_errors_map_by_kind() {
    let inactive = ApiError::from(reacher_core::Error::SessionInactive(SessionId::generate()));
    assert_eq!(inactive.status(), StatusCode::FORBIDDEN);

    let taken = ApiError::from(reacher_core::Error::UsernameTaken("ada".into()));
    assert_eq!(taken.status(), StatusCode::CONFLICT);

    let broken = ApiError::from(reacher_core::Error::DataIntegrity("no clues".into()));
    assert_eq!(broken.status(), StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(ApiError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
  }

  #[tokio::test]
  async fn internal_detail_is_not_rendered() {
    let err = ApiError::from(reacher_core::Error::DataIntegrity("secret detail".into()));
    let resp = err.into_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "success": false, "message": GENERIC_FAILURE }));
  }
}
