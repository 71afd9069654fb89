//! [`SessionHolder`] — who is logged in on this client.
//!
//! Two states, anonymous and authenticated, plus a `loading` flag that is only
//! raised while the holder hydrates and while a login request is in flight.
//! The holder is mutated through `&mut self`, so a second login cannot start
//! while one is pending.

use tracing::{info, warn};

use crate::{
  Result,
  auth::{Authenticator, StoredSession, Tokens},
  identity::Identity,
  repository::SessionRepository,
};

pub struct SessionHolder<R, A> {
  repo:    R,
  auth:    A,
  current: Option<StoredSession>,
  loading: bool,
}

impl<R, A> SessionHolder<R, A>
where
  R: SessionRepository,
  A: Authenticator,
{
  /// A holder that has not yet looked at storage; `is_loading()` is true
  /// until [`initialize`](Self::initialize) runs.
  pub fn new(repo: R, auth: A) -> Self {
    Self { repo, auth, current: None, loading: true }
  }

  /// Restore a previously cached session, if any.
  pub async fn initialize(&mut self) -> Result<()> {
    let restored = self.repo.load().await;
    self.loading = false;
    self.current = restored?;
    if let Some(s) = &self.current {
      info!(user = %s.identity.id, role = %s.identity.role, "session restored");
    }
    Ok(())
  }

  /// Verify credentials with the authentication service.
  ///
  /// Returns `Ok(false)` for any authentication failure, leaving memory and
  /// storage untouched. `Err` means the credentials were accepted but the
  /// session could not be written; the holder stays as it was.
  pub async fn login(&mut self, username: &str, password: &str) -> Result<bool> {
    self.loading = true;
    let outcome = self.auth.authenticate(username, password).await;
    let result = match outcome {
      Ok(grant) => {
        let session = StoredSession::from(grant);
        match self.repo.save(&session).await {
          Ok(()) => {
            info!(user = %session.identity.id, "logged in");
            self.current = Some(session);
            Ok(true)
          }
          Err(e) => Err(e),
        }
      }
      Err(e) => {
        warn!(username, error = %e, "login failed");
        Ok(false)
      }
    };
    self.loading = false;
    result
  }

  /// Forget the current identity, in memory and in storage. If the slot
  /// cannot be cleared the holder keeps its identity.
  pub async fn logout(&mut self) -> Result<()> {
    self.repo.clear().await?;
    if let Some(s) = self.current.take() {
      info!(user = %s.identity.id, "logged out");
    }
    Ok(())
  }

  // ── Reads ───────────────────────────────────────────────────────────────

  pub fn identity(&self) -> Option<&Identity> {
    self.current.as_ref().map(|s| &s.identity)
  }

  pub fn tokens(&self) -> Option<&Tokens> {
    self.current.as_ref().map(|s| &s.tokens)
  }

  pub fn is_authenticated(&self) -> bool { self.current.is_some() }

  pub fn is_loading(&self) -> bool { self.loading }
}
