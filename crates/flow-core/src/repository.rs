//! Repository traits for the two durable client-local slots.
//!
//! The record store and session holder never touch storage directly; they are
//! handed an implementation of these traits at construction. Backends store
//! each slot as one JSON document and use [`encode_slot`] / [`decode_slot`] so
//! that malformed content is reported the same way everywhere.

use std::future::Future;

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Result, auth::StoredSession, feedback::Feedback};

/// Slot holding the serialized feedback collection.
pub const FEEDBACK_SLOT: &str = "feedbacks";

/// Slot holding the serialized session (identity and tokens).
pub const SESSION_SLOT: &str = "feedbackUser";

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Durable storage for the whole feedback collection.
pub trait FeedbackRepository: Send + Sync {
  /// Read the stored collection. `None` means the slot has never been
  /// written; malformed content is [`Error::CorruptState`].
  fn load(
    &self,
  ) -> impl Future<Output = Result<Option<Vec<Feedback>>>> + Send + '_;

  /// Replace the stored collection with `snapshot`.
  fn save<'a>(
    &'a self,
    snapshot: &'a [Feedback],
  ) -> impl Future<Output = Result<()>> + Send + 'a;
}

/// Durable storage for the cached session.
pub trait SessionRepository: Send + Sync {
  fn load(
    &self,
  ) -> impl Future<Output = Result<Option<StoredSession>>> + Send + '_;

  fn save<'a>(
    &'a self,
    session: &'a StoredSession,
  ) -> impl Future<Output = Result<()>> + Send + 'a;

  /// Remove the slot entirely. Clearing an empty slot is not an error.
  fn clear(&self) -> impl Future<Output = Result<()>> + Send + '_;
}

// ─── Slot codec ──────────────────────────────────────────────────────────────

/// Serialise a slot document.
pub fn encode_slot<T: Serialize + ?Sized>(
  slot: &'static str,
  value: &T,
) -> Result<String> {
  serde_json::to_string(value).map_err(|e| Error::CorruptState {
    slot,
    reason: e.to_string(),
  })
}

/// Deserialise a slot document, mapping any mismatch to
/// [`Error::CorruptState`].
pub fn decode_slot<T: DeserializeOwned>(
  slot: &'static str,
  document: &str,
) -> Result<T> {
  serde_json::from_str(document).map_err(|e| {
    tracing::warn!(slot, error = %e, "slot holds malformed data");
    Error::CorruptState { slot, reason: e.to_string() }
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decode_reports_slot_name() {
    let err = decode_slot::<Vec<Feedback>>(FEEDBACK_SLOT, "{\"not\":\"a list\"}")
      .unwrap_err();
    assert!(matches!(err, Error::CorruptState { slot: FEEDBACK_SLOT, .. }));
  }

  #[test]
  fn empty_collection_round_trips() {
    let doc = encode_slot(FEEDBACK_SLOT, &Vec::<Feedback>::new()).unwrap();
    assert_eq!(doc, "[]");
    let back: Vec<Feedback> = decode_slot(FEEDBACK_SLOT, &doc).unwrap();
    assert!(back.is_empty());
  }
}
