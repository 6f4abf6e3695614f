//! The success half of the response envelope. Failures are rendered by
//! [`crate::ApiError`].

use axum::{Json, http::StatusCode};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
  pub success: bool,
  pub data:    T,
}

pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
  Json(Envelope { success: true, data })
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<Envelope<T>>) {
  (StatusCode::CREATED, ok(data))
}
