//! `GET /health`: liveness and uptime.

use std::time::Instant;

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthReport {
  pub status:      &'static str,
  pub timestamp:   DateTime<Utc>,
  /// Human-readable, e.g. `"3 minutes, 7 seconds"`.
  pub uptime:      String,
  pub uptime_secs: u64,
}

pub fn describe_uptime(secs: u64) -> String {
  format!("{} minutes, {} seconds", secs / 60, secs % 60)
}

pub async fn handler(started: Instant) -> Json<HealthReport> {
  let uptime_secs = started.elapsed().as_secs();
  Json(HealthReport {
    status: "ok",
    timestamp: Utc::now(),
    uptime: describe_uptime(uptime_secs),
    uptime_secs,
  })
}
