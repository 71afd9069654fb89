//! The user directory: configured accounts with argon2 password hashes.

use std::collections::HashMap;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use flow_core::{
  fixture::Fixture,
  identity::{Identity, Role, Roster, UserId},
};
use rand_core::OsRng;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Password given to every account created by [`UserDirectory::demo`].
pub const DEMO_PASSWORD: &str = "12345";

/// One account as written in the config file.
///
/// Keys are snake_case so they survive the `config` crate's key handling.
#[derive(Debug, Clone, Deserialize)]
pub struct UserEntry {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  pub id:            String,
  pub name:          String,
  pub email:         String,
  pub role:          Role,
  #[serde(default)]
  pub manager_id:    Option<String>,
  #[serde(default)]
  pub avatar:        Option<String>,
}

impl UserEntry {
  fn identity(&self) -> Identity {
    Identity {
      id:         UserId::from(self.id.as_str()),
      name:       self.name.clone(),
      email:      self.email.clone(),
      role:       self.role,
      manager_id: self.manager_id.as_deref().map(UserId::from),
      avatar:     self.avatar.clone(),
    }
  }
}

/// Hash `password` into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| Error::Hash(e.to_string()))
}

// ─── Directory ───────────────────────────────────────────────────────────────

pub struct UserDirectory {
  credentials: HashMap<String, (String, UserId)>,
  roster:      Roster,
}

impl UserDirectory {
  /// Build a directory from config entries. Usernames must be unique and the
  /// identities must form a valid roster.
  pub fn from_entries(entries: Vec<UserEntry>) -> Result<Self> {
    let mut credentials = HashMap::new();
    let mut members = Vec::with_capacity(entries.len());
    for entry in entries {
      let identity = entry.identity();
      if credentials
        .insert(entry.username.clone(), (entry.password_hash, identity.id.clone()))
        .is_some()
      {
        return Err(Error::Users(flow_core::Error::InvalidRoster(format!(
          "duplicate username {}",
          entry.username
        ))));
      }
      members.push(identity);
    }
    let roster = Roster::new(members);
    roster.validate()?;
    Ok(Self { credentials, roster })
  }

  /// The sample roster, one account per member, each with
  /// [`DEMO_PASSWORD`]. Usernames are lower-cased first names.
  pub fn demo() -> Result<Self> {
    let hash = hash_password(DEMO_PASSWORD)?;
    let entries = Fixture::sample()
      .roster
      .members()
      .iter()
      .map(|m| UserEntry {
        username:      demo_username(m),
        password_hash: hash.clone(),
        id:            m.id.to_string(),
        name:          m.name.clone(),
        email:         m.email.clone(),
        role:          m.role,
        manager_id:    m.manager_id.as_ref().map(ToString::to_string),
        avatar:        m.avatar.clone(),
      })
      .collect();
    Self::from_entries(entries)
  }

  /// Check `password` for `username`, returning the account's identity.
  pub fn verify(&self, username: &str, password: &str) -> Option<&Identity> {
    let (hash, id) = self.credentials.get(username)?;
    let parsed = PasswordHash::new(hash).ok()?;
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .ok()?;
    self.roster.get(id)
  }

  pub fn identity(&self, id: &UserId) -> Option<&Identity> { self.roster.get(id) }

  pub fn by_username(&self, username: &str) -> Option<&Identity> {
    self
      .credentials
      .get(username)
      .and_then(|(_, id)| self.roster.get(id))
  }

  pub fn roster(&self) -> &Roster { &self.roster }

  /// Usernames in a stable order, for listings.
  pub fn usernames(&self) -> Vec<&str> {
    let mut names: Vec<&str> = self.credentials.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
  }
}

fn demo_username(member: &Identity) -> String {
  member
    .name
    .split_whitespace()
    .next()
    .unwrap_or(member.id.as_str())
    .to_lowercase()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn entry(username: &str, id: &str, role: Role, manager: Option<&str>) -> UserEntry {
    UserEntry {
      username:      username.into(),
      password_hash: hash_password("pw").unwrap(),
      id:            id.into(),
      name:          username.into(),
      email:         format!("{username}@example.com"),
      role,
      manager_id:    manager.map(Into::into),
      avatar:        None,
    }
  }

  #[test]
  fn demo_accounts_use_first_names() {
    let dir = UserDirectory::demo().unwrap();
    assert_eq!(dir.usernames(), ["david", "emily", "mike", "sarah"]);
    assert_eq!(dir.verify("sarah", DEMO_PASSWORD).unwrap().id.as_str(), "1");
    assert!(dir.verify("sarah", "wrong").is_none());
    assert!(dir.verify("nobody", DEMO_PASSWORD).is_none());
  }

  #[test]
  fn duplicate_usernames_are_rejected() {
    let entries = vec![
      entry("a", "1", Role::Manager, None),
      entry("a", "2", Role::Employee, Some("1")),
    ];
    assert!(matches!(UserDirectory::from_entries(entries), Err(Error::Users(_))));
  }

  #[test]
  fn manager_reference_must_name_a_manager() {
    let entries = vec![
      entry("a", "1", Role::Employee, None),
      entry("b", "2", Role::Employee, Some("1")),
    ];
    assert!(UserDirectory::from_entries(entries).is_err());
  }
}
