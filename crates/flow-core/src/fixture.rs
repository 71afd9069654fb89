//! Seed data: the roster of known people and the feedback collection a fresh
//! client starts with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
  Result,
  feedback::{Feedback, Sentiment},
  identity::{Identity, Role, Roster, UserId},
};

/// Explicit seed object handed to the record store and the shell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
  pub roster:   Roster,
  #[serde(default)]
  pub feedback: Vec<Feedback>,
}

impl Fixture {
  /// Build a fixture, checking the roster's reporting invariants.
  pub fn new(roster: Roster, feedback: Vec<Feedback>) -> Result<Self> {
    roster.validate()?;
    Ok(Self { roster, feedback })
  }

  /// Parse a fixture document (`{"roster": [...], "feedback": [...]}`).
  pub fn from_json(document: &str) -> Result<Self, FixtureError> {
    let fixture: Self = serde_json::from_str(document)?;
    fixture.roster.validate()?;
    Ok(fixture)
  }

  /// One manager with three reports and three sample records.
  pub fn sample() -> Self {
    let roster = Roster::new(vec![
      person(
        "1",
        "Sarah Johnson",
        "sarah@company.com",
        Role::Manager,
        None,
        "415829",
      ),
      person(
        "2",
        "Mike Chen",
        "mike@company.com",
        Role::Employee,
        Some("1"),
        "2379004",
      ),
      person(
        "3",
        "Emily Rodriguez",
        "emily@company.com",
        Role::Employee,
        Some("1"),
        "3763188",
      ),
      person(
        "4",
        "David Park",
        "david@company.com",
        Role::Employee,
        Some("1"),
        "2182970",
      ),
    ]);

    let feedback = vec![
      record(
        "1",
        "2",
        "Excellent problem-solving skills and consistently delivers \
         high-quality code. Great team collaboration and always willing to \
         help colleagues.",
        "Could benefit from improving time estimation for tasks and speaking \
         up more in team meetings.",
        Sentiment::Positive,
        "2024-01-15T10:00:00Z",
        Some("2024-01-16T09:30:00Z"),
      ),
      record(
        "2",
        "3",
        "Outstanding leadership on the recent project. Shows great initiative \
         and has strong communication skills with clients.",
        "Focus on delegating more tasks to team members and avoid taking on \
         too much work personally.",
        Sentiment::Positive,
        "2024-01-10T14:30:00Z",
        None,
      ),
      record(
        "3",
        "4",
        "Very detail-oriented and catches issues others miss. Solid technical \
         foundation and reliable delivery.",
        "Work on being more proactive in suggesting improvements and take \
         more ownership of feature development.",
        Sentiment::Neutral,
        "2024-01-08T11:15:00Z",
        Some("2024-01-09T10:00:00Z"),
      ),
    ];

    Self { roster, feedback }
  }
}

/// Why a fixture document could not be loaded.
#[derive(Debug, Error)]
pub enum FixtureError {
  #[error("fixture is not valid JSON: {0}")]
  Json(#[from] serde_json::Error),

  #[error(transparent)]
  Roster(#[from] crate::Error),
}

fn person(
  id: &str,
  name: &str,
  email: &str,
  role: Role,
  manager_id: Option<&str>,
  photo: &str,
) -> Identity {
  Identity {
    id: id.into(),
    name: name.to_owned(),
    email: email.to_owned(),
    role,
    manager_id: manager_id.map(UserId::from),
    avatar: Some(format!(
      "https://images.pexels.com/photos/{photo}/pexels-photo-{photo}.jpeg\
       ?auto=compress&cs=tinysrgb&w=150&h=150&fit=crop"
    )),
  }
}

fn record(
  id: &str,
  employee_id: &str,
  strengths: &str,
  improvements: &str,
  sentiment: Sentiment,
  created_at: &str,
  acknowledged_at: Option<&str>,
) -> Feedback {
  let created_at = timestamp(created_at);
  let acknowledged_at = acknowledged_at.map(timestamp);
  Feedback {
    id: id.into(),
    manager_id: "1".into(),
    employee_id: employee_id.into(),
    strengths: strengths.to_owned(),
    improvements: improvements.to_owned(),
    sentiment,
    created_at,
    updated_at: created_at,
    acknowledged: acknowledged_at.is_some(),
    acknowledged_at,
  }
}

fn timestamp(s: &str) -> DateTime<Utc> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .unwrap_or_default()
}
