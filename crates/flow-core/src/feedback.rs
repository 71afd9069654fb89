//! Feedback records — the unit of data owned by the record store.
//!
//! A record is authored by one manager for one employee. Its author and
//! subject never change; content edits and acknowledgment are the only
//! mutations, and every mutation advances `updated_at`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::{Error, Result, identity::UserId};

// ─── Id ──────────────────────────────────────────────────────────────────────

/// Unique, immutable record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackId(pub String);

impl FeedbackId {
  /// A fresh identifier that cannot collide with existing ones.
  pub fn generate() -> Self { Self(Uuid::new_v4().to_string()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for FeedbackId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for FeedbackId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

// ─── Sentiment ───────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sentiment {
  Positive,
  #[default]
  Neutral,
  Negative,
}

// ─── Feedback ────────────────────────────────────────────────────────────────

/// One stored feedback record. The JSON shape is the stored slot document's
/// element shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
  pub id:              FeedbackId,
  pub manager_id:      UserId,
  pub employee_id:     UserId,
  pub strengths:       String,
  pub improvements:    String,
  pub sentiment:       Sentiment,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
  pub acknowledged:    bool,
  /// Present iff `acknowledged`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub acknowledged_at: Option<DateTime<Utc>>,
}

impl Feedback {
  /// Whether the record was edited after creation.
  pub fn is_edited(&self) -> bool { self.updated_at != self.created_at }
}

// ─── NewFeedback ─────────────────────────────────────────────────────────────

/// Input to [`crate::record_store::RecordStore::add`]. Id and timestamps are
/// always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewFeedback {
  pub manager_id:   UserId,
  pub employee_id:  UserId,
  pub strengths:    String,
  pub improvements: String,
  pub sentiment:    Sentiment,
}

impl NewFeedback {
  pub(crate) fn validate(&self) -> Result<()> {
    non_empty("strengths", &self.strengths)?;
    non_empty("improvements", &self.improvements)
  }

  pub(crate) fn into_feedback(self, now: DateTime<Utc>) -> Feedback {
    Feedback {
      id:              FeedbackId::generate(),
      manager_id:      self.manager_id,
      employee_id:     self.employee_id,
      strengths:       self.strengths,
      improvements:    self.improvements,
      sentiment:       self.sentiment,
      created_at:      now,
      updated_at:      now,
      acknowledged:    false,
      acknowledged_at: None,
    }
  }
}

// ─── FeedbackPatch ───────────────────────────────────────────────────────────

/// Partial edit of a record's content. Author, subject and id are absent on
/// purpose: they are immutable.
#[derive(Debug, Clone, Default)]
pub struct FeedbackPatch {
  pub strengths:    Option<String>,
  pub improvements: Option<String>,
  pub sentiment:    Option<Sentiment>,
}

impl FeedbackPatch {
  pub(crate) fn validate(&self) -> Result<()> {
    if let Some(s) = &self.strengths {
      non_empty("strengths", s)?;
    }
    if let Some(s) = &self.improvements {
      non_empty("improvements", s)?;
    }
    Ok(())
  }

  pub(crate) fn apply(self, record: &mut Feedback, now: DateTime<Utc>) {
    if let Some(s) = self.strengths {
      record.strengths = s;
    }
    if let Some(s) = self.improvements {
      record.improvements = s;
    }
    if let Some(s) = self.sentiment {
      record.sentiment = s;
    }
    record.updated_at = now;
  }
}

fn non_empty(field: &'static str, value: &str) -> Result<()> {
  if value.trim().is_empty() {
    Err(Error::EmptyField(field))
  } else {
    Ok(())
  }
}
