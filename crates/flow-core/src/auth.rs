//! The contract with the external authentication service.

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::Identity;

/// Token pair issued by `POST /auth/login/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
  pub access:  String,
  pub refresh: String,
}

/// A successful login: the issued tokens and the identity they belong to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginGrant {
  pub tokens:   Tokens,
  pub identity: Identity,
}

/// The document cached in the session slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
  pub identity: Identity,
  pub tokens:   Tokens,
}

impl From<LoginGrant> for StoredSession {
  fn from(g: LoginGrant) -> Self {
    Self { identity: g.identity, tokens: g.tokens }
  }
}

/// Why a login attempt failed. Callers show all of these as "invalid
/// credentials"; the variants exist for logs.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
  /// The service answered with a non-success status.
  #[error("rejected with status {0}")]
  Rejected(u16),

  #[error("transport error: {0}")]
  Transport(String),

  #[error("malformed response: {0}")]
  Malformed(String),
}

/// Verifies credentials and resolves the caller's identity.
pub trait Authenticator: Send + Sync {
  fn authenticate<'a>(
    &'a self,
    username: &'a str,
    password: &'a str,
  ) -> impl Future<Output = Result<LoginGrant, AuthError>> + Send + 'a;
}
