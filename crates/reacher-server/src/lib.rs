//! HTTP server assembly for Reacher.
//!
//! Wraps the [`reacher_api`] router with the outer surface: `/health`,
//! request tracing, CORS, the per-client rate limit, and configuration loading.

pub mod health;
pub mod limit;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::{Duration, Instant},
};

use axum::{
  Router,
  http::{HeaderName, HeaderValue, Method, header},
  middleware,
  routing::get,
};
use reacher_api::{ApiError, AppState, ShareSettings, extract::SESSION_HEADER};
use reacher_core::{rules::GameRules, store::GameStore};
use serde::Deserialize;
use tower_http::{
  cors::{AllowOrigin, CorsLayer},
  trace::TraceLayer,
};

use limit::RateLimiter;

/// Path prefix every API route is mounted under.
pub const API_PREFIX: &str = "/api/v1";

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `reacher.toml` and
/// `REACHER_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:         String,
  pub port:         u16,
  pub store_path:   PathBuf,
  pub cors_origins: Vec<String>,
  pub rate_limit:   RateLimitConfig,
  pub game:         GameRules,
  pub share:        ShareSettings,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:         "0.0.0.0".to_owned(),
      port:         3000,
      store_path:   PathBuf::from("reacher.sqlite3"),
      cors_origins: vec![
        "http://localhost:3000".to_owned(),
        "http://localhost:5173".to_owned(),
      ],
      rate_limit:   RateLimitConfig::default(),
      game:         GameRules::default(),
      share:        ShareSettings::default(),
    }
  }
}

/// Requests allowed per window, for each client IP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
  pub requests: u64,
  pub per_secs: u64,
}

impl Default for RateLimitConfig {
  fn default() -> Self {
    Self {
      requests: 100,
      per_secs: 900,
    }
  }
}

fn environment() -> config::Environment {
  config::Environment::with_prefix("REACHER")
    .prefix_separator("_")
    .separator("__")
    .list_separator(",")
    .with_list_parse_key("cors_origins")
    .try_parsing(true)
}

fn load_with(path: &Path, env: config::Environment) -> Result<ServerConfig, config::ConfigError> {
  config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(env)
    .build()?
    .try_deserialize()
}

/// Read the optional TOML file at `path`, then apply `REACHER_*` overrides.
/// Nested keys use `__`, e.g. `REACHER_GAME__CORRECT_AWARD=3`.
pub fn load_config(path: &Path) -> Result<ServerConfig, config::ConfigError> {
  load_with(path, environment())
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Application ──────────────────────────────────────────────────────────────

fn cors_layer(origins: &[String]) -> CorsLayer {
  let allow_origin = if origins.iter().any(|origin| origin.trim() == "*") {
    AllowOrigin::any()
  } else {
    AllowOrigin::list(listed_origins(origins))
  };

  CorsLayer::new()
    .allow_origin(allow_origin)
    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
    .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(SESSION_HEADER)])
}

fn listed_origins(origins: &[String]) -> Vec<HeaderValue> {
  origins
    .iter()
    .filter_map(|origin| match HeaderValue::from_str(origin) {
      Ok(value) => Some(value),
      Err(_) => {
        tracing::warn!(%origin, "ignoring invalid CORS origin");
        None
      }
    })
    .collect()
}

/// Build the complete application: API routes under [`API_PREFIX`], `/health`,
/// and the middleware stack.
pub fn app<S>(state: AppState<S>, cfg: &ServerConfig) -> Router
where
  S: GameStore + Clone + 'static,
{
  let started = Instant::now();
  let limiter = Arc::new(RateLimiter::new(
    cfg.rate_limit.requests,
    Duration::from_secs(cfg.rate_limit.per_secs),
  ));

  Router::new()
    .route("/health", get(move || health::handler(started)))
    .nest(API_PREFIX, reacher_api::api_router(state))
    .fallback(|| async { ApiError::UnknownRoute })
    .layer(middleware::from_fn_with_state(limiter, limit::enforce))
    .layer(cors_layer(&cfg.cors_origins))
    .layer(TraceLayer::new_for_http())
}
