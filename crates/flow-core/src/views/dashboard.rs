//! Manager dashboard: headline counts, the sentiment histogram, and one
//! summary row per direct report.

use crate::{
  feedback::Feedback,
  identity::{Identity, Roster},
  views::SentimentCounts,
};

#[derive(Debug, Clone)]
pub struct MemberSummary<'a> {
  pub member:             &'a Identity,
  pub feedback_count:     usize,
  pub acknowledged_count: usize,
  /// Most recent record by `created_at`.
  pub latest:             Option<&'a Feedback>,
}

#[derive(Debug, Clone)]
pub struct Dashboard<'a> {
  pub team_size:    usize,
  pub total:        usize,
  pub acknowledged: usize,
  pub pending:      usize,
  pub sentiment:    SentimentCounts,
  pub members:      Vec<MemberSummary<'a>>,
}

impl<'a> Dashboard<'a> {
  /// Build the dashboard for `manager` from the records they authored.
  pub fn build(
    manager: &'a Identity,
    records: &[&'a Feedback],
    roster: &'a Roster,
  ) -> Self {
    let mine: Vec<&Feedback> = records
      .iter()
      .copied()
      .filter(|f| f.manager_id == manager.id)
      .collect();

    let total = mine.len();
    let acknowledged = mine.iter().filter(|f| f.acknowledged).count();

    let members: Vec<_> = roster
      .team_of(&manager.id)
      .map(|member| {
        let theirs: Vec<&'a Feedback> = mine
          .iter()
          .copied()
          .filter(|f| f.employee_id == member.id)
          .collect();
        MemberSummary {
          member,
          feedback_count: theirs.len(),
          acknowledged_count: theirs.iter().filter(|f| f.acknowledged).count(),
          latest: theirs.iter().copied().max_by_key(|f| f.created_at),
        }
      })
      .collect();

    Self {
      team_size: members.len(),
      total,
      acknowledged,
      pending: total - acknowledged,
      sentiment: SentimentCounts::tally(mine.iter().copied()),
      members,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    feedback::{NewFeedback, Sentiment},
    fixture::Fixture,
    memory::MemoryRepository,
    record_store::RecordStore,
  };

  #[test]
  fn sample_dashboard() {
    let fixture = Fixture::sample();
    let manager = &fixture.roster.members()[0];
    let records: Vec<&Feedback> = fixture.feedback.iter().collect();
    let d = Dashboard::build(manager, &records, &fixture.roster);

    assert_eq!(d.team_size, 3);
    assert_eq!(d.total, 3);
    assert_eq!(d.acknowledged, 2);
    assert_eq!(d.pending, 1);
    assert_eq!(d.sentiment.get(Sentiment::Positive), 2);
    assert_eq!(d.sentiment.get(Sentiment::Neutral), 1);
    assert_eq!(d.sentiment.get(Sentiment::Negative), 0);

    let emily = d.members.iter().find(|m| m.member.id.as_str() == "3").unwrap();
    assert_eq!(emily.feedback_count, 1);
    assert_eq!(emily.acknowledged_count, 0);
    assert_eq!(emily.latest.unwrap().id.as_str(), "2");
  }

  #[test]
  fn member_without_feedback_has_no_latest() {
    let fixture = Fixture::sample();
    let manager = &fixture.roster.members()[0];
    let d = Dashboard::build(manager, &[], &fixture.roster);
    assert_eq!(d.total, 0);
    assert!(d.members.iter().all(|m| m.latest.is_none() && m.feedback_count == 0));
  }

  #[tokio::test]
  async fn acknowledging_drops_pending_by_one() {
    let fixture = Fixture::sample();
    let manager = fixture.roster.members()[0].clone();
    let mut store = RecordStore::new(MemoryRepository::new(), fixture.feedback.clone());
    store.initialize().await.unwrap();

    let before = Dashboard::build(&manager, &store.by_manager(&manager.id), &fixture.roster).pending;
    store.acknowledge(&"2".into()).await.unwrap();
    let after = Dashboard::build(&manager, &store.by_manager(&manager.id), &fixture.roster).pending;
    assert_eq!(before - after, 1);
  }

  #[tokio::test]
  async fn latest_follows_created_at_not_order() {
    let fixture = Fixture::sample();
    let manager = fixture.roster.members()[0].clone();
    let mut store = RecordStore::new(MemoryRepository::new(), fixture.feedback.clone());
    store.initialize().await.unwrap();
    let added = store
      .add(NewFeedback {
        manager_id:   manager.id.clone(),
        employee_id:  "2".into(),
        strengths:    "Shipped the migration".into(),
        improvements: "Write it up".into(),
        sentiment:    Sentiment::Negative,
      })
      .await
      .unwrap();

    let records = store.by_manager(&manager.id);
    let d = Dashboard::build(&manager, &records, &fixture.roster);
    let mike = d.members.iter().find(|m| m.member.id.as_str() == "2").unwrap();
    assert_eq!(mike.feedback_count, 2);
    assert_eq!(mike.latest.unwrap().id, added.id);
    assert_eq!(d.sentiment.get(Sentiment::Negative), 1);
  }
}
