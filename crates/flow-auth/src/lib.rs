//! Authentication service for FeedbackFlow.
//!
//! Exposes an axum [`Router`] that checks credentials against a configured
//! user directory, issues opaque bearer tokens, and answers who the caller is
//! and who reports to them.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod tokens;
pub mod users;

pub use error::{Error, Result};

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use chrono::TimeDelta;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use tokens::TokenTable;
use users::{UserDirectory, UserEntry};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:             String,
  #[serde(default = "default_port")]
  pub port:             u16,
  #[serde(default = "default_access_ttl")]
  pub access_ttl_secs:  i64,
  #[serde(default = "default_refresh_ttl")]
  pub refresh_ttl_secs: i64,
  #[serde(default)]
  pub users:            Vec<UserEntry>,
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8000 }
fn default_access_ttl() -> i64 { 5 * 60 }
fn default_refresh_ttl() -> i64 { 24 * 60 * 60 }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             default_host(),
      port:             default_port(),
      access_ttl_secs:  default_access_ttl(),
      refresh_ttl_secs: default_refresh_ttl(),
      users:            Vec::new(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState {
  pub users:  Arc<UserDirectory>,
  pub tokens: Arc<TokenTable>,
}

impl AppState {
  pub fn new(config: &ServerConfig, users: UserDirectory) -> Self {
    Self {
      users:  Arc::new(users),
      tokens: Arc::new(TokenTable::new(
        TimeDelta::seconds(config.access_ttl_secs),
        TimeDelta::seconds(config.refresh_ttl_secs),
      )),
    }
  }

  /// State for the configured users.
  pub fn from_config(config: &ServerConfig) -> Result<Self> {
    let users = UserDirectory::from_entries(config.users.clone())?;
    Ok(Self::new(config, users))
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the authentication service.
pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/auth/login/",   post(handlers::login))
    .route("/auth/refresh/", post(handlers::refresh))
    .route("/auth/me/",      get(handlers::me))
    .route("/auth/team/",    get(handlers::team))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[cfg(test)]
mod tests;
