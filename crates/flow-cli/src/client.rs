//! Async HTTP client for the flow-auth service.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use flow_core::{
  auth::{AuthError, Authenticator, LoginGrant, Tokens},
  identity::Identity,
};
use reqwest::{Client, StatusCode};
use serde::Serialize;

#[derive(Serialize)]
struct Credentials<'a> {
  username: &'a str,
  password: &'a str,
}

/// Talks to `/auth/*` on the configured server.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpAuthenticator {
  client:   Client,
  base_url: String,
}

impl HttpAuthenticator {
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, base_url: base_url.into() })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/auth{}", self.base_url.trim_end_matches('/'), path)
  }

  // ── Endpoints ─────────────────────────────────────────────────────────────

  /// `POST /auth/login/`
  async fn login(&self, username: &str, password: &str) -> Result<Tokens, AuthError> {
    let resp = self
      .client
      .post(self.url("/login/"))
      .json(&Credentials { username, password })
      .send()
      .await
      .map_err(transport)?;
    if !resp.status().is_success() {
      return Err(AuthError::Rejected(resp.status().as_u16()));
    }
    resp.json().await.map_err(malformed)
  }

  /// `GET /auth/me/`
  async fn me(&self, access: &str) -> Result<Identity, AuthError> {
    let resp = self
      .client
      .get(self.url("/me/"))
      .bearer_auth(access)
      .send()
      .await
      .map_err(transport)?;
    if !resp.status().is_success() {
      return Err(AuthError::Rejected(resp.status().as_u16()));
    }
    resp.json().await.map_err(malformed)
  }

  /// `GET /auth/team/`: the caller's direct reports. `None` when the caller
  /// is not a manager.
  pub async fn team(&self, access: &str) -> Result<Option<Vec<Identity>>> {
    let resp = self
      .client
      .get(self.url("/team/"))
      .bearer_auth(access)
      .send()
      .await
      .context("GET /auth/team/ failed")?;

    match resp.status() {
      StatusCode::FORBIDDEN => Ok(None),
      s if s.is_success() => {
        Ok(Some(resp.json().await.context("deserialising team")?))
      }
      s => Err(anyhow!("GET /auth/team/ → {s}")),
    }
  }
}

impl Authenticator for HttpAuthenticator {
  async fn authenticate(
    &self,
    username: &str,
    password: &str,
  ) -> Result<LoginGrant, AuthError> {
    let tokens = self.login(username, password).await?;
    let identity = self.me(&tokens.access).await?;
    Ok(LoginGrant { tokens, identity })
  }
}

fn transport(e: reqwest::Error) -> AuthError { AuthError::Transport(e.to_string()) }

fn malformed(e: reqwest::Error) -> AuthError { AuthError::Malformed(e.to_string()) }
