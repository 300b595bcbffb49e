//! OsteoPlay Vet · veterinary anatomy game backend
//!
//! - Axum HTTP + WebSocket API for the word fill-in game and the quiz
//! - Questions from the content API when configured, built-in tables otherwise
//! - Static SPA fallback (STATIC_DIR/index.html)
//!
//! Important env variables:
//!   PORT             : u16 (default 3000)
//!   GAME_CONFIG_PATH : path to TOML config (session defaults, endpoints, word/quiz banks)
//!   STATIC_DIR       : front-end build directory (default "./static")
//!   LOG_LEVEL        : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT       : "pretty" (default) or "json"

mod telemetry;
mod util;
mod error;
mod domain;
mod config;
mod rng;
mod masking;
mod guess;
mod session;
mod results;
mod content;
mod provider;
mod seeds;
mod player;
mod state;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Providers, player table, content client.
  let state = Arc::new(AppState::new());

  let app = build_router(state.clone());

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "osteoplay_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
  info!(target: "osteoplay_backend", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "osteoplay_backend", error = %e, "Could not listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "osteoplay_backend", "Shutdown requested");
}
