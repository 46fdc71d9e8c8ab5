//! LeetClone · editor/submission client core
//!
//! - Axum HTTP + WebSocket API consumed by the view layer
//! - Judge collaborator reached over HTTP (problems, submission history, submit)
//! - Static SPA fallback (STATIC_DIR, default ./static)
//!
//! Important env variables:
//!   PORT                : u16 (default 3000)
//!   JUDGE_BASE_URL      : judge collaborator, default "http://127.0.0.1:8000"
//!   JUDGE_TIMEOUT_SECS  : per-request timeout, default 20
//!   DEFAULT_LANGUAGE    : "python" (default) or "cpp"
//!   CLIENT_CONFIG_PATH  : path to TOML config (same keys, see config.rs)
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

mod telemetry;
mod domain;
mod config;
mod boilerplate;
mod verdict;
mod catalog;
mod history;
mod store;
mod judge;
mod state;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::config::ClientConfig;
use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let cfg = ClientConfig::load();
  let state = AppState::from_config(&cfg)?;

  // The catalog is fetched exactly once; the view sees an empty list if the judge is down.
  logic::load_catalog(&state).await;

  let app = build_router(Arc::new(state), &cfg.server.static_dir);

  let addr = SocketAddr::from(([0, 0, 0, 0], cfg.server.port));
  let listener = TcpListener::bind(addr).await?;
  info!(target: "leetclone_client", %addr, judge = %cfg.judge.base_url, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
