//! Employee timeline: the viewer's own feedback, newest first.

use crate::{
  Error, Result,
  feedback::{Feedback, FeedbackId},
  identity::Identity,
  record_store::RecordStore,
  repository::FeedbackRepository,
};

#[derive(Debug, Clone)]
pub struct TimelineEntry<'a> {
  pub feedback:        &'a Feedback,
  /// Show the acknowledge affordance.
  pub can_acknowledge: bool,
}

#[derive(Debug, Clone)]
pub struct Timeline<'a> {
  pub entries:      Vec<TimelineEntry<'a>>,
  pub total:        usize,
  pub pending:      usize,
  pub acknowledged: usize,
}

impl<'a> Timeline<'a> {
  /// Build the timeline for `employee` from the records addressed to them.
  pub fn build(employee: &Identity, records: &[&'a Feedback]) -> Self {
    let mut mine: Vec<&'a Feedback> = records
      .iter()
      .copied()
      .filter(|f| f.employee_id == employee.id)
      .collect();
    mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let pending = mine.iter().filter(|f| !f.acknowledged).count();
    Self {
      total: mine.len(),
      pending,
      acknowledged: mine.len() - pending,
      entries: mine
        .into_iter()
        .map(|feedback| TimelineEntry {
          feedback,
          can_acknowledge: !feedback.acknowledged,
        })
        .collect(),
    }
  }
}

/// Acknowledge `id` on behalf of `employee`, who must be the record's
/// subject.
pub async fn acknowledge<R: FeedbackRepository>(
  store: &mut RecordStore<R>,
  employee: &Identity,
  id: &FeedbackId,
) -> Result<Feedback> {
  let record = store
    .get(id)
    .ok_or_else(|| Error::FeedbackNotFound(id.clone()))?;
  if record.employee_id != employee.id {
    return Err(Error::Forbidden(format!(
      "feedback {id} is not addressed to {}",
      employee.id
    )));
  }
  store.acknowledge(id).await
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    feedback::{NewFeedback, Sentiment},
    fixture::Fixture,
    memory::MemoryRepository,
  };

  fn member(fixture: &Fixture, id: &str) -> Identity {
    fixture.roster.get(&id.into()).unwrap().clone()
  }

  #[tokio::test]
  async fn sorted_newest_first_with_counts() {
    let fixture = Fixture::sample();
    let mike = member(&fixture, "2");
    let mut store = RecordStore::new(MemoryRepository::new(), fixture.feedback.clone());
    store.initialize().await.unwrap();
    store
      .add(NewFeedback {
        manager_id:   "1".into(),
        employee_id:  mike.id.clone(),
        strengths:    "a".into(),
        improvements: "b".into(),
        sentiment:    Sentiment::Positive,
      })
      .await
      .unwrap();

    let all: Vec<&Feedback> = store.snapshot().iter().collect();
    let t = Timeline::build(&mike, &all);
    assert_eq!(t.total, 2);
    assert_eq!(t.pending, 1);
    assert_eq!(t.acknowledged, 1);
    assert!(t.entries[0].feedback.created_at > t.entries[1].feedback.created_at);
    assert!(t.entries[0].can_acknowledge);
    assert!(!t.entries[1].can_acknowledge);
  }

  #[test]
  fn empty_timeline() {
    let fixture = Fixture::sample();
    let manager = member(&fixture, "1");
    let all: Vec<&Feedback> = fixture.feedback.iter().collect();
    let t = Timeline::build(&manager, &all);
    assert_eq!(t.total, 0);
    assert!(t.entries.is_empty());
  }

  #[tokio::test]
  async fn only_the_subject_may_acknowledge() {
    let fixture = Fixture::sample();
    let mut store = RecordStore::new(MemoryRepository::new(), fixture.feedback.clone());
    store.initialize().await.unwrap();

    let mike = member(&fixture, "2");
    let emily = member(&fixture, "3");

    let err = acknowledge(&mut store, &mike, &"2".into()).await.unwrap_err();
    assert!(matches!(err, Error::Forbidden(_)));
    assert!(!store.get(&"2".into()).unwrap().acknowledged);

    let acked = acknowledge(&mut store, &emily, &"2".into()).await.unwrap();
    assert!(acked.acknowledged);
  }
}
