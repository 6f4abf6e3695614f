//! Per-client fixed-window request limiter.
//!
//! Each client IP gets its own counter. When a client's window budget is spent,
//! its requests are answered with 429 until that window rolls over. Requests
//! that carry no connection info share a single counter.

use std::{
  net::{IpAddr, Ipv4Addr, SocketAddr},
  sync::Arc,
  time::{Duration, Instant},
};

use axum::{
  extract::{ConnectInfo, Request, State},
  middleware::Next,
  response::{IntoResponse, Response},
};
use dashmap::DashMap;
use reacher_api::ApiError;

/// Tracked clients above which expired windows are dropped.
const SWEEP_THRESHOLD: usize = 10_000;

#[derive(Debug)]
struct Window {
  started: Instant,
  used:    u64,
}

#[derive(Debug)]
pub struct RateLimiter {
  limit:   u64,
  period:  Duration,
  windows: DashMap<IpAddr, Window>,
}

impl RateLimiter {
  pub fn new(limit: u64, period: Duration) -> Self {
    Self {
      limit,
      period,
      windows: DashMap::new(),
    }
  }

  /// Spend one request from `client`'s current window. `false` once it is
  /// empty.
  pub fn try_acquire(&self, client: IpAddr) -> bool {
    let now = Instant::now();

    if self.windows.len() >= SWEEP_THRESHOLD {
      self
        .windows
        .retain(|_, window| now.duration_since(window.started) < self.period);
    }

    let mut window = self
      .windows
      .entry(client)
      .or_insert_with(|| Window { started: now, used: 0 });

    if now.duration_since(window.started) >= self.period {
      window.started = now;
      window.used = 0;
    }

    if window.used < self.limit {
      window.used += 1;
      true
    } else {
      false
    }
  }

  /// Number of clients currently holding a window.
  pub fn tracked_clients(&self) -> usize { self.windows.len() }
}

fn client_ip(req: &Request) -> IpAddr {
  req
    .extensions()
    .get::<ConnectInfo<SocketAddr>>()
    .map(|ConnectInfo(addr)| addr.ip())
    .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Middleware for [`axum::middleware::from_fn_with_state`].
pub async fn enforce(
  State(limiter): State<Arc<RateLimiter>>,
  req: Request,
  next: Next,
) -> Response {
  let client = client_ip(&req);
  if limiter.try_acquire(client) {
    next.run(req).await
  } else {
    tracing::warn!(%client, path = %req.uri().path(), "rate limit exceeded");
    ApiError::RateLimited.into_response()
  }
}
