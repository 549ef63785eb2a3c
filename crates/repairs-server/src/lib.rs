//! HTTP server assembly for the repair-ticket service.
//!
//! Wraps the JSON API from `repairs-api` with Basic authentication and
//! request tracing, and provides the configuration type read by the binary.

pub mod admin;
pub mod auth;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware};
use repairs_core::store::RepairStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `REPAIRS_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8000 }

fn default_store_path() -> PathBuf { PathBuf::from("repairs.sqlite3") }

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router: API routes behind authentication,
/// with per-request tracing spans.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: RepairStore + 'static,
{
  repairs_api::api_router(store.clone())
    .layer(middleware::from_fn_with_state(store, auth::require_caller::<S>))
    .layer(TraceLayer::new_for_http())
}
