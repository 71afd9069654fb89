//! [`RecordStore`] — the single source of truth for feedback records.
//!
//! The store keeps the whole collection in memory, newest first, and writes
//! the full collection to its repository after every mutation. A failed write
//! rolls the in-memory change back, so memory and the durable slot never
//! disagree.

use chrono::Utc;
use tracing::{debug, info};

use crate::{
  Error, Result,
  feedback::{Feedback, FeedbackId, FeedbackPatch, NewFeedback},
  identity::UserId,
  repository::FeedbackRepository,
};

pub struct RecordStore<R> {
  repo:    R,
  seed:    Vec<Feedback>,
  records: Vec<Feedback>,
}

impl<R: FeedbackRepository> RecordStore<R> {
  /// Create an empty, not yet hydrated store. `seed` is used by
  /// [`initialize`](Self::initialize) when the repository has never been
  /// written.
  pub fn new(repo: R, seed: Vec<Feedback>) -> Self {
    Self { repo, seed, records: Vec::new() }
  }

  /// Hydrate from the repository, or seed it on first use.
  pub async fn initialize(&mut self) -> Result<()> {
    match self.repo.load().await? {
      Some(stored) => {
        debug!(count = stored.len(), "hydrated feedback from storage");
        self.records = stored;
      }
      None => {
        info!(count = self.seed.len(), "no stored feedback; writing seed");
        self.repo.save(&self.seed).await?;
        self.records = self.seed.clone();
      }
    }
    Ok(())
  }

  // ── Writes ──────────────────────────────────────────────────────────────

  /// Create a record and put it at the front of the collection.
  pub async fn add(&mut self, input: NewFeedback) -> Result<Feedback> {
    input.validate()?;
    let record = input.into_feedback(Utc::now());

    self.records.insert(0, record.clone());
    if let Err(e) = self.persist().await {
      self.records.remove(0);
      return Err(e);
    }

    info!(
      id = %record.id,
      manager = %record.manager_id,
      employee = %record.employee_id,
      "feedback added"
    );
    Ok(record)
  }

  /// Merge `patch` into the record with `id` and refresh its `updated_at`.
  pub async fn update(
    &mut self,
    id: &FeedbackId,
    patch: FeedbackPatch,
  ) -> Result<Feedback> {
    patch.validate()?;
    let idx = self.position(id)?;

    let previous = self.records[idx].clone();
    patch.apply(&mut self.records[idx], Utc::now());
    self.commit(idx, previous).await
  }

  /// Mark the record with `id` as acknowledged.
  ///
  /// Acknowledging twice is a no-op: `acknowledged_at` keeps its first value
  /// and nothing is written.
  pub async fn acknowledge(&mut self, id: &FeedbackId) -> Result<Feedback> {
    let idx = self.position(id)?;
    if self.records[idx].acknowledged {
      debug!(%id, "feedback already acknowledged");
      return Ok(self.records[idx].clone());
    }

    let previous = self.records[idx].clone();
    let now = Utc::now();
    let record = &mut self.records[idx];
    record.acknowledged = true;
    record.acknowledged_at = Some(now);
    record.updated_at = now;

    let record = self.commit(idx, previous).await?;
    info!(%id, employee = %record.employee_id, "feedback acknowledged");
    Ok(record)
  }

  // ── Reads ───────────────────────────────────────────────────────────────

  /// The whole collection, newest insert first.
  pub fn snapshot(&self) -> &[Feedback] { &self.records }

  pub fn get(&self, id: &FeedbackId) -> Option<&Feedback> {
    self.records.iter().find(|f| &f.id == id)
  }

  /// Records whose subject is `employee_id`, in collection order.
  pub fn by_employee(&self, employee_id: &UserId) -> Vec<&Feedback> {
    self
      .records
      .iter()
      .filter(|f| &f.employee_id == employee_id)
      .collect()
  }

  /// Records authored by `manager_id`, in collection order.
  pub fn by_manager(&self, manager_id: &UserId) -> Vec<&Feedback> {
    self
      .records
      .iter()
      .filter(|f| &f.manager_id == manager_id)
      .collect()
  }

  // ── Internals ───────────────────────────────────────────────────────────

  fn position(&self, id: &FeedbackId) -> Result<usize> {
    self
      .records
      .iter()
      .position(|f| &f.id == id)
      .ok_or_else(|| Error::FeedbackNotFound(id.clone()))
  }

  /// Persist after an in-place edit at `idx`, restoring `previous` on failure.
  async fn commit(&mut self, idx: usize, previous: Feedback) -> Result<Feedback> {
    match self.persist().await {
      Ok(()) => Ok(self.records[idx].clone()),
      Err(e) => {
        self.records[idx] = previous;
        Err(e)
      }
    }
  }

  async fn persist(&self) -> Result<()> {
    self.repo.save(&self.records).await?;
    debug!(count = self.records.len(), "feedback persisted");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    feedback::Sentiment,
    fixture::Fixture,
    memory::MemoryRepository,
    repository::FEEDBACK_SLOT,
  };

  async fn seeded() -> (RecordStore<MemoryRepository>, MemoryRepository) {
    let repo = MemoryRepository::new();
    let mut store = RecordStore::new(repo.clone(), Fixture::sample().feedback);
    store.initialize().await.unwrap();
    (store, repo)
  }

  fn new_feedback(employee: &str) -> NewFeedback {
    NewFeedback {
      manager_id:   "1".into(),
      employee_id:  employee.into(),
      strengths:    "x".into(),
      improvements: "y".into(),
      sentiment:    Sentiment::Neutral,
    }
  }

  fn ids(records: &[&Feedback]) -> Vec<String> {
    records.iter().map(|f| f.id.to_string()).collect()
  }

  // ─── Initialisation ────────────────────────────────────────────────────

  #[tokio::test]
  async fn first_use_writes_seed() {
    let (store, repo) = seeded().await;
    assert_eq!(store.snapshot().len(), 3);
    assert_eq!(repo.write_count(), 1);

    let stored: Vec<Feedback> =
      serde_json::from_str(&repo.raw(FEEDBACK_SLOT).unwrap()).unwrap();
    assert_eq!(stored, store.snapshot());
  }

  #[tokio::test]
  async fn stored_collection_wins_over_seed() {
    let repo = MemoryRepository::new();
    repo.put_raw(FEEDBACK_SLOT, "[]");
    let mut store = RecordStore::new(repo.clone(), Fixture::sample().feedback);
    store.initialize().await.unwrap();
    assert!(store.snapshot().is_empty());
    assert_eq!(repo.write_count(), 0);
  }

  #[tokio::test]
  async fn persist_then_hydrate_is_identity() {
    let (mut store, repo) = seeded().await;
    store.add(new_feedback("3")).await.unwrap();
    store.acknowledge(&"2".into()).await.unwrap();

    let mut rehydrated = RecordStore::new(repo, Vec::new());
    rehydrated.initialize().await.unwrap();
    assert_eq!(rehydrated.snapshot(), store.snapshot());
  }

  #[tokio::test]
  async fn malformed_slot_is_corrupt_state() {
    let repo = MemoryRepository::new();
    repo.put_raw(FEEDBACK_SLOT, "{\"oops\": true}");
    let mut store = RecordStore::new(repo, Fixture::sample().feedback);
    let err = store.initialize().await.unwrap_err();
    assert!(matches!(err, Error::CorruptState { slot: FEEDBACK_SLOT, .. }));
  }

  // ─── Reads ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn seed_filters() {
    let (store, _) = seeded().await;
    assert_eq!(ids(&store.by_manager(&"1".into())), ["1", "2", "3"]);
    assert_eq!(ids(&store.by_employee(&"2".into())), ["1"]);
    assert!(store.by_manager(&"2".into()).is_empty());
  }

  // ─── Add ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn add_prepends_unacknowledged_record() {
    let (mut store, repo) = seeded().await;
    let created = store.add(new_feedback("2")).await.unwrap();

    assert_eq!(created.created_at, created.updated_at);
    assert!(!created.acknowledged);
    assert!(created.acknowledged_at.is_none());
    assert!(
      Fixture::sample().feedback.iter().all(|f| f.id != created.id),
      "new id collides with seed"
    );

    let mine = store.by_employee(&"2".into());
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0].id, created.id);
    assert_eq!(store.snapshot()[0].id, created.id);
    assert_eq!(repo.write_count(), 2);
  }

  #[tokio::test]
  async fn add_rejects_empty_text() {
    let (mut store, repo) = seeded().await;
    let mut input = new_feedback("2");
    input.strengths = String::new();
    let err = store.add(input).await.unwrap_err();
    assert!(matches!(err, Error::EmptyField("strengths")));
    assert_eq!(store.snapshot().len(), 3);
    assert_eq!(repo.write_count(), 1);
  }

  // ─── Update ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn update_merges_and_keeps_identity_fields() {
    let (mut store, _) = seeded().await;
    let before = store.get(&"3".into()).unwrap().clone();

    let after = store
      .update(&"3".into(), FeedbackPatch {
        sentiment: Some(Sentiment::Positive),
        ..Default::default()
      })
      .await
      .unwrap();

    assert_eq!(after.id, before.id);
    assert_eq!(after.manager_id, before.manager_id);
    assert_eq!(after.employee_id, before.employee_id);
    assert_eq!(after.strengths, before.strengths);
    assert_eq!(after.sentiment, Sentiment::Positive);
    assert!(after.updated_at > before.updated_at);
    assert!(after.is_edited());
  }

  #[tokio::test]
  async fn empty_patch_still_refreshes_updated_at() {
    let (mut store, _) = seeded().await;
    let before = store.get(&"1".into()).unwrap().updated_at;
    let after = store
      .update(&"1".into(), FeedbackPatch::default())
      .await
      .unwrap();
    assert!(after.updated_at > before);
  }

  #[tokio::test]
  async fn update_unknown_id_is_not_found() {
    let (mut store, repo) = seeded().await;
    let err = store
      .update(&"nope".into(), FeedbackPatch::default())
      .await
      .unwrap_err();
    assert!(matches!(err, Error::FeedbackNotFound(id) if id.as_str() == "nope"));
    assert_eq!(repo.write_count(), 1);
  }

  // ─── Acknowledge ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn acknowledge_sets_flag_and_timestamp() {
    let (mut store, _) = seeded().await;
    let acked = store.acknowledge(&"2".into()).await.unwrap();
    assert!(acked.acknowledged);
    assert_eq!(acked.acknowledged_at, Some(acked.updated_at));
  }

  #[tokio::test]
  async fn acknowledge_is_idempotent() {
    let (mut store, repo) = seeded().await;
    let first = store.acknowledge(&"2".into()).await.unwrap();
    let writes = repo.write_count();

    let second = store.acknowledge(&"2".into()).await.unwrap();
    assert_eq!(second, first);
    assert_eq!(repo.write_count(), writes);
  }

  #[tokio::test]
  async fn acknowledge_unknown_id_is_not_found() {
    let (mut store, _) = seeded().await;
    assert!(matches!(
      store.acknowledge(&"42".into()).await,
      Err(Error::FeedbackNotFound(_))
    ));
  }

  // ─── Failed writes ─────────────────────────────────────────────────────

  struct FailingRepo;

  impl FeedbackRepository for FailingRepo {
    async fn load(&self) -> Result<Option<Vec<Feedback>>> {
      Ok(Some(Fixture::sample().feedback))
    }

    async fn save(&self, _: &[Feedback]) -> Result<()> {
      Err(Error::storage(std::io::Error::other("quota exceeded")))
    }
  }

  #[tokio::test]
  async fn failed_write_rolls_back() {
    let mut store = RecordStore::new(FailingRepo, Vec::new());
    store.initialize().await.unwrap();

    assert!(matches!(
      store.add(new_feedback("2")).await,
      Err(Error::Storage(_))
    ));
    assert_eq!(store.snapshot().len(), 3);

    assert!(store.acknowledge(&"2".into()).await.is_err());
    assert!(!store.get(&"2".into()).unwrap().acknowledged);
  }

  /// Empty storage whose first write fails.
  #[derive(Default)]
  struct FirstWriteFails {
    inner:  MemoryRepository,
    failed: std::sync::atomic::AtomicBool,
  }

  impl FeedbackRepository for FirstWriteFails {
    async fn load(&self) -> Result<Option<Vec<Feedback>>> {
      FeedbackRepository::load(&self.inner).await
    }

    async fn save(&self, records: &[Feedback]) -> Result<()> {
      if !self.failed.swap(true, std::sync::atomic::Ordering::SeqCst) {
        return Err(Error::storage(std::io::Error::other("locked")));
      }
      FeedbackRepository::save(&self.inner, records).await
    }
  }

  #[tokio::test]
  async fn seed_survives_failed_first_write() {
    let repo = FirstWriteFails::default();
    let raw = repo.inner.clone();
    let mut store = RecordStore::new(repo, Fixture::sample().feedback);

    assert!(matches!(store.initialize().await, Err(Error::Storage(_))));
    assert!(store.snapshot().is_empty());

    store.initialize().await.unwrap();
    assert_eq!(store.snapshot().len(), 3);
    let stored: Vec<Feedback> =
      serde_json::from_str(&raw.raw(FEEDBACK_SLOT).unwrap()).unwrap();
    assert_eq!(stored.len(), 3);
  }
}
