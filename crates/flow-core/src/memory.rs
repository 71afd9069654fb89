//! In-memory repository, for tests and for running without a data file.
//!
//! Documents are kept as serialized JSON, exactly as a durable backend would
//! keep them, so hydration goes through the same decode path.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{
  Result,
  auth::StoredSession,
  feedback::Feedback,
  repository::{
    FEEDBACK_SLOT, FeedbackRepository, SESSION_SLOT, SessionRepository,
    decode_slot, encode_slot,
  },
};

/// Slot storage held in a shared map.
///
/// Cloning is cheap and clones share the same slots, so a test can keep a
/// handle to inspect what a store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
  slots:  Arc<Mutex<HashMap<&'static str, String>>>,
  writes: Arc<Mutex<usize>>,
}

impl MemoryRepository {
  pub fn new() -> Self { Self::default() }

  /// Raw document currently held in `slot`.
  pub fn raw(&self, slot: &'static str) -> Option<String> {
    lock(&self.slots).get(slot).cloned()
  }

  /// Overwrite `slot` with an arbitrary document, bypassing encoding.
  pub fn put_raw(&self, slot: &'static str, document: impl Into<String>) {
    lock(&self.slots).insert(slot, document.into());
  }

  /// Number of successful writes (saves and clears) so far.
  pub fn write_count(&self) -> usize { *lock(&self.writes) }

  fn write(&self, slot: &'static str, document: Option<String>) {
    let mut slots = lock(&self.slots);
    match document {
      Some(d) => slots.insert(slot, d),
      None => slots.remove(slot),
    };
    *lock(&self.writes) += 1;
  }

  fn read<T: serde::de::DeserializeOwned>(
    &self,
    slot: &'static str,
  ) -> Result<Option<T>> {
    self.raw(slot).map(|d| decode_slot(slot, &d)).transpose()
  }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
  m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FeedbackRepository for MemoryRepository {
  async fn load(&self) -> Result<Option<Vec<Feedback>>> {
    self.read(FEEDBACK_SLOT)
  }

  async fn save(&self, snapshot: &[Feedback]) -> Result<()> {
    let doc = encode_slot(FEEDBACK_SLOT, snapshot)?;
    self.write(FEEDBACK_SLOT, Some(doc));
    Ok(())
  }
}

impl SessionRepository for MemoryRepository {
  async fn load(&self) -> Result<Option<StoredSession>> {
    self.read(SESSION_SLOT)
  }

  async fn save(&self, session: &StoredSession) -> Result<()> {
    let doc = encode_slot(SESSION_SLOT, session)?;
    self.write(SESSION_SLOT, Some(doc));
    Ok(())
  }

  async fn clear(&self) -> Result<()> {
    self.write(SESSION_SLOT, None);
    Ok(())
  }
}
