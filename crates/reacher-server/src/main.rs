//! `reacher`, the trivia game backend.
//!
//! Reads `reacher.toml` (or the path given with `--config`) plus `REACHER_*`
//! environment overrides, opens the SQLite store, and serves the JSON API.
//!
//! # Usage
//!
//! ```text
//! reacher serve
//! reacher seed --dataset dataset/sample.json
//! reacher deactivate sess_01HZX3W8K5Q9T2V7B4N6M0C1DE
//! ```

use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use reacher_api::AppState;
use reacher_core::{city, id::SessionId};
use reacher_server::{ServerConfig, app, expand_tilde, load_config};
use reacher_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Reacher trivia backend")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "reacher.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,
  /// Load a city dataset, inserting new cities and refreshing existing ones.
  Seed {
    /// JSON array of `{city, country, clues, fun_fact, trivia}` records.
    #[arg(long, value_name = "FILE")]
    dataset: PathBuf,
  },
  /// Allow a session to play again.
  Activate { session_id: String },
  /// Stop a session from playing.
  Deactivate { session_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let cfg = load_config(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store_path = expand_tilde(&cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(store, cfg).await,
    Command::Seed { dataset } => seed(&store, dataset).await,
    Command::Activate { session_id } => set_active(&store, &session_id, true).await,
    Command::Deactivate { session_id } => set_active(&store, &session_id, false).await,
  }
}

async fn serve(store: SqliteStore, cfg: ServerConfig) -> anyhow::Result<()> {
  let state = AppState::new(store, cfg.game, cfg.share.clone());
  let app = app(state, &cfg);
  let address = format!("{}:{}", cfg.host, cfg.port);

  tracing::info!("Listening on http://{address}");
  tracing::info!("Health check available at http://{address}/health");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("server stopped");
  Ok(())
}

async fn seed(store: &SqliteStore, dataset: PathBuf) -> anyhow::Result<()> {
  let raw = tokio::fs::read_to_string(&dataset)
    .await
    .with_context(|| format!("failed to read dataset {dataset:?}"))?;
  let cities = city::parse_dataset(&raw)
    .with_context(|| format!("invalid dataset {dataset:?}"))?;

  tracing::info!(found = cities.len(), "seeding cities");
  let written = store.seed_cities(cities).await.context("failed to seed cities")?;
  tracing::info!(written, "seeding complete");
  Ok(())
}

async fn set_active(store: &SqliteStore, raw_id: &str, active: bool) -> anyhow::Result<()> {
  let session_id = SessionId::parse(raw_id)?;
  let found = store
    .set_session_active(&session_id, active)
    .await
    .context("failed to update session")?;

  anyhow::ensure!(found, "session {session_id} not found");
  tracing::info!(%session_id, active, "session updated");
  Ok(())
}

/// Resolve on SIGINT or SIGTERM so in-flight requests can finish.
async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::error!(error = %e, "failed to listen for ctrl-c");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
      Ok(mut signal) => {
        signal.recv().await;
      }
      Err(e) => {
        tracing::error!(error = %e, "failed to listen for SIGTERM");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    () = ctrl_c => {},
    () = terminate => {},
  }

  tracing::info!("shutdown signal received, draining connections");
}
