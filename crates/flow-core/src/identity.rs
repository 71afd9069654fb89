//! Identities — the managers and employees who author and receive feedback.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{Error, Result};

/// Display name used when a subject is missing from the roster.
pub const UNKNOWN_EMPLOYEE: &str = "Unknown Employee";

// ─── Ids ─────────────────────────────────────────────────────────────────────

/// Opaque user identifier, as issued by the authentication service.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for UserId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for UserId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

impl From<String> for UserId {
  fn from(s: String) -> Self { Self(s) }
}

// ─── Role ────────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
  Manager,
  Employee,
}

// ─── Identity ────────────────────────────────────────────────────────────────

/// An authenticated actor. The JSON shape matches the `/auth/me/` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
  pub id:         UserId,
  pub name:       String,
  pub email:      String,
  pub role:       Role,
  /// Only meaningful for employees.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub manager_id: Option<UserId>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub avatar:     Option<String>,
}

impl Identity {
  pub fn is_manager(&self) -> bool { self.role == Role::Manager }
}

// ─── Roster ──────────────────────────────────────────────────────────────────

/// The set of known identities, in a stable display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
  members: Vec<Identity>,
}

impl Roster {
  pub fn new(members: Vec<Identity>) -> Self { Self { members } }

  pub fn members(&self) -> &[Identity] { &self.members }

  pub fn get(&self, id: &UserId) -> Option<&Identity> {
    self.members.iter().find(|m| &m.id == id)
  }

  /// Direct reports of `manager_id`, in roster order.
  pub fn team_of<'a>(
    &'a self,
    manager_id: &UserId,
  ) -> impl Iterator<Item = &'a Identity> + use<'a> {
    let manager_id = manager_id.clone();
    self
      .members
      .iter()
      .filter(move |m| m.manager_id.as_ref() == Some(&manager_id))
  }

  pub fn is_on_team(&self, manager_id: &UserId, employee_id: &UserId) -> bool {
    self.team_of(manager_id).any(|m| &m.id == employee_id)
  }

  pub fn display_name(&self, id: &UserId) -> &str {
    self.get(id).map_or(UNKNOWN_EMPLOYEE, |m| m.name.as_str())
  }

  /// Insert `member`, replacing any existing entry with the same id.
  pub fn upsert(&mut self, member: Identity) {
    match self.members.iter_mut().find(|m| m.id == member.id) {
      Some(existing) => *existing = member,
      None => self.members.push(member),
    }
  }

  /// Check the reporting invariants: ids are unique, only employees carry a
  /// manager reference, and that reference names a known manager.
  pub fn validate(&self) -> Result<()> {
    for (i, member) in self.members.iter().enumerate() {
      if self.members[..i].iter().any(|m| m.id == member.id) {
        return Err(Error::InvalidRoster(format!(
          "duplicate identity id {}",
          member.id
        )));
      }

      let Some(manager_id) = &member.manager_id else { continue };

      if member.role != Role::Employee {
        return Err(Error::InvalidRoster(format!(
          "{} is a {} but names a manager",
          member.id, member.role
        )));
      }

      match self.get(manager_id) {
        Some(m) if m.role == Role::Manager => {}
        Some(_) => {
          return Err(Error::InvalidRoster(format!(
            "{} reports to {manager_id}, who is not a manager",
            member.id
          )));
        }
        None => {
          return Err(Error::InvalidRoster(format!(
            "{} reports to unknown identity {manager_id}",
            member.id
          )));
        }
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn person(id: &str, role: Role, manager: Option<&str>) -> Identity {
    Identity {
      id: id.into(),
      name: format!("Person {id}"),
      email: format!("{id}@company.com"),
      role,
      manager_id: manager.map(UserId::from),
      avatar: None,
    }
  }

  #[test]
  fn role_string_forms() {
    assert_eq!(Role::Manager.to_string(), "manager");
    assert_eq!("employee".parse::<Role>().unwrap(), Role::Employee);
    assert_eq!(serde_json::to_string(&Role::Employee).unwrap(), "\"employee\"");
  }

  #[test]
  fn identity_wire_shape_is_camel_case() {
    let json = serde_json::to_value(person("2", Role::Employee, Some("1"))).unwrap();
    assert_eq!(json["managerId"], "1");
    assert!(json.get("avatar").is_none());

    let back: Identity = serde_json::from_value(serde_json::json!({
      "id": "1", "name": "Sarah", "email": "s@c.com", "role": "manager"
    }))
    .unwrap();
    assert_eq!(back.manager_id, None);
    assert!(back.is_manager());
  }

  #[test]
  fn team_of_lists_direct_reports_only() {
    let roster = Roster::new(vec![
      person("1", Role::Manager, None),
      person("2", Role::Employee, Some("1")),
      person("5", Role::Manager, None),
      person("6", Role::Employee, Some("5")),
    ]);
    let team: Vec<_> = roster.team_of(&"1".into()).map(|m| m.id.as_str()).collect();
    assert_eq!(team, ["2"]);
    assert!(roster.is_on_team(&"5".into(), &"6".into()));
    assert!(!roster.is_on_team(&"1".into(), &"6".into()));
  }

  #[test]
  fn team_outlives_lookup_key() {
    let roster = Roster::new(vec![
      person("5", Role::Manager, None),
      person("6", Role::Employee, Some("5")),
    ]);
    let reports = {
      let key = UserId::from("5");
      roster.team_of(&key)
    };
    assert_eq!(reports.map(|m| m.id.as_str()).collect::<Vec<_>>(), ["6"]);
  }

  #[test]
  fn display_name_falls_back() {
    let roster = Roster::new(vec![person("1", Role::Manager, None)]);
    assert_eq!(roster.display_name(&"1".into()), "Person 1");
    assert_eq!(roster.display_name(&"99".into()), UNKNOWN_EMPLOYEE);
  }

  #[test]
  fn validate_rejects_employee_reporting_to_employee() {
    let roster = Roster::new(vec![
      person("2", Role::Employee, None),
      person("3", Role::Employee, Some("2")),
    ]);
    assert!(matches!(roster.validate(), Err(Error::InvalidRoster(_))));
  }

  #[test]
  fn validate_rejects_unknown_manager_and_duplicates() {
    let dangling = Roster::new(vec![person("3", Role::Employee, Some("9"))]);
    assert!(dangling.validate().is_err());

    let dup = Roster::new(vec![
      person("1", Role::Manager, None),
      person("1", Role::Manager, None),
    ]);
    assert!(dup.validate().is_err());
  }

  #[test]
  fn upsert_replaces_by_id() {
    let mut roster = Roster::new(vec![person("1", Role::Manager, None)]);
    let mut renamed = person("1", Role::Manager, None);
    renamed.name = "Renamed".into();
    roster.upsert(renamed);
    roster.upsert(person("2", Role::Employee, Some("1")));
    assert_eq!(roster.members().len(), 2);
    assert_eq!(roster.display_name(&"1".into()), "Renamed");
  }
}
