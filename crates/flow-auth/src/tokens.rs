//! Opaque bearer tokens.
//!
//! A token is 32 random bytes, hex-encoded. The table keeps only the SHA-256
//! digest of each token, so a dump of server memory cannot be replayed.

use std::{
  collections::HashMap,
  sync::{Mutex, MutexGuard, PoisonError},
};

use chrono::{DateTime, TimeDelta, Utc};
use flow_core::{auth::Tokens, identity::UserId};
use rand_core::{OsRng, RngCore as _};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
  Access,
  Refresh,
}

#[derive(Debug, Clone)]
struct Grant {
  user:       UserId,
  kind:       Kind,
  expires_at: DateTime<Utc>,
}

impl Grant {
  fn is_live(&self, kind: Kind, now: DateTime<Utc>) -> bool {
    self.kind == kind && now < self.expires_at
  }
}

/// Issued tokens, keyed by digest.
pub struct TokenTable {
  grants:      Mutex<HashMap<String, Grant>>,
  access_ttl:  TimeDelta,
  refresh_ttl: TimeDelta,
}

impl TokenTable {
  pub fn new(access_ttl: TimeDelta, refresh_ttl: TimeDelta) -> Self {
    Self { grants: Mutex::new(HashMap::new()), access_ttl, refresh_ttl }
  }

  /// Issue a fresh access/refresh pair for `user`.
  pub fn issue_pair(&self, user: &UserId) -> Tokens {
    Tokens {
      access:  self.issue(user, Kind::Access),
      refresh: self.issue(user, Kind::Refresh),
    }
  }

  /// Exchange a live refresh token for a new access token.
  pub fn refresh(&self, refresh: &str) -> Option<String> {
    let user = self.resolve(refresh, Kind::Refresh)?;
    Some(self.issue(&user, Kind::Access))
  }

  /// The user behind a live access token.
  pub fn authenticate(&self, access: &str) -> Option<UserId> {
    self.resolve(access, Kind::Access)
  }

  /// Drop every expired grant. Returns how many were removed.
  pub fn purge_expired(&self) -> usize {
    let now = Utc::now();
    let mut grants = self.lock();
    let before = grants.len();
    grants.retain(|_, g| now < g.expires_at);
    before - grants.len()
  }

  fn issue(&self, user: &UserId, kind: Kind) -> String {
    let mut raw = [0u8; 32];
    OsRng.fill_bytes(&mut raw);
    let token = hex::encode(raw);

    let ttl = match kind {
      Kind::Access => self.access_ttl,
      Kind::Refresh => self.refresh_ttl,
    };
    self.lock().insert(digest(&token), Grant {
      user: user.clone(),
      kind,
      expires_at: Utc::now() + ttl,
    });
    token
  }

  fn resolve(&self, token: &str, kind: Kind) -> Option<UserId> {
    let now = Utc::now();
    self
      .lock()
      .get(&digest(token))
      .filter(|g| g.is_live(kind, now))
      .map(|g| g.user.clone())
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<String, Grant>> {
    self.grants.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

fn digest(token: &str) -> String {
  hex::encode(Sha256::digest(token.as_bytes()))
}
