//! CheapEats server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, and serves the JSON API under `/api/v1`.

mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use axum::Router;
use cheapeats_api::{AppState, api_router};
use cheapeats_engine::{Reconciler, ReconcilerConfig};
use cheapeats_places::{GooglePlacesClient, PlacesConfig};
use cheapeats_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "CheapEats restaurant price API")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
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

  let server_cfg = settings::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  if server_cfg.places_api_key.is_empty() {
    tracing::warn!("places_api_key is not set; nearby searches will be rejected upstream");
  }

  // Open SQLite store.
  let store_path = settings::expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let places = GooglePlacesClient::new(PlacesConfig {
    api_key:  server_cfg.places_api_key.clone(),
    base_url: server_cfg.places_base_url.clone(),
    timeout:  server_cfg.request_timeout(),
  })
  .context("failed to build places client")?;

  let reconciler = Reconciler::new(
    Arc::new(store),
    Arc::new(places),
    ReconcilerConfig { throttle: server_cfg.throttle(), ..Default::default() },
  );

  let shutdown = CancellationToken::new();
  let state = AppState::new(reconciler, shutdown.clone())
    .with_default_radius(server_cfg.default_radius_m);

  let app = Router::new()
    .nest("/api/v1", api_router(state))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive());

  let address = server_cfg.address();
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal(shutdown))
    .await
    .context("server error")?;

  tracing::info!("server stopped");
  Ok(())
}

/// Resolve on Ctrl-C, cancelling every in-flight reconciliation.
async fn shutdown_signal(shutdown: CancellationToken) {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for shutdown signal");
    return;
  }
  tracing::info!("shutdown requested");
  shutdown.cancel();
}
