//! Manager team list: every record the manager authored, narrowed by a
//! free-text search and an optional subject filter.

use crate::{
  feedback::Feedback,
  identity::{Identity, Roster, UserId},
};

/// Transient filter state. Both filters apply together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamFilter {
  /// Case-insensitive substring over subject name, strengths and
  /// improvements. Empty matches everything.
  pub search:   String,
  /// Exact subject match. `None` means all team members.
  pub employee: Option<UserId>,
}

impl TeamFilter {
  pub fn is_active(&self) -> bool {
    !self.search.is_empty() || self.employee.is_some()
  }

  pub fn matches(&self, record: &Feedback, subject_name: &str) -> bool {
    let needle = self.search.to_lowercase();
    let matches_search = needle.is_empty()
      || subject_name.to_lowercase().contains(&needle)
      || record.strengths.to_lowercase().contains(&needle)
      || record.improvements.to_lowercase().contains(&needle);

    let matches_employee = self
      .employee
      .as_ref()
      .is_none_or(|id| &record.employee_id == id);

    matches_search && matches_employee
  }
}

#[derive(Debug, Clone)]
pub struct TeamRow<'a> {
  pub feedback:     &'a Feedback,
  pub subject_name: &'a str,
  pub avatar:       Option<&'a str>,
  pub edited:       bool,
}

/// What to show when the list is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
  /// The manager has not written anything yet.
  NoFeedback,
  /// Records exist but the filters exclude all of them.
  NoMatches,
}

#[derive(Debug, Clone)]
pub struct TeamList<'a> {
  pub rows:  Vec<TeamRow<'a>>,
  /// Subjects offered by the employee filter.
  pub team:  Vec<&'a Identity>,
  pub empty: Option<EmptyState>,
}

impl<'a> TeamList<'a> {
  pub fn build(
    manager: &'a Identity,
    records: &[&'a Feedback],
    roster: &'a Roster,
    filter: &TeamFilter,
  ) -> Self {
    let rows: Vec<_> = records
      .iter()
      .copied()
      .filter(|f| f.manager_id == manager.id)
      .filter_map(|f| {
        let subject_name = roster.display_name(&f.employee_id);
        filter.matches(f, subject_name).then(|| TeamRow {
          feedback: f,
          subject_name,
          avatar: roster.get(&f.employee_id).and_then(|m| m.avatar.as_deref()),
          edited: f.is_edited(),
        })
      })
      .collect();

    let empty = rows.is_empty().then_some(if filter.is_active() {
      EmptyState::NoMatches
    } else {
      EmptyState::NoFeedback
    });

    Self { rows, team: roster.team_of(&manager.id).collect(), empty }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::fixture::Fixture;

  fn list_ids(fixture: &Fixture, filter: &TeamFilter) -> Vec<String> {
    let manager = &fixture.roster.members()[0];
    let records: Vec<&Feedback> = fixture.feedback.iter().collect();
    TeamList::build(manager, &records, &fixture.roster, filter)
      .rows
      .iter()
      .map(|r| r.feedback.id.to_string())
      .collect()
  }

  #[test]
  fn no_filter_lists_everything() {
    let fixture = Fixture::sample();
    assert_eq!(list_ids(&fixture, &TeamFilter::default()), ["1", "2", "3"]);
  }

  #[test]
  fn search_is_case_insensitive_over_name_and_text() {
    let fixture = Fixture::sample();
    let by_name = TeamFilter { search: "EMILY".into(), employee: None };
    assert_eq!(list_ids(&fixture, &by_name), ["2"]);

    let by_text = TeamFilter { search: "detail-ORIENTED".into(), employee: None };
    assert_eq!(list_ids(&fixture, &by_text), ["3"]);

    let by_improvement = TeamFilter { search: "time estimation".into(), employee: None };
    assert_eq!(list_ids(&fixture, &by_improvement), ["1"]);
  }

  #[test]
  fn filters_combine_with_and() {
    let fixture = Fixture::sample();
    let f = TeamFilter {
      search:   "leadership".into(),
      employee: Some("2".into()),
    };
    assert!(list_ids(&fixture, &f).is_empty());

    let f = TeamFilter {
      search:   "leadership".into(),
      employee: Some("3".into()),
    };
    assert_eq!(list_ids(&fixture, &f), ["2"]);
  }

  #[test]
  fn empty_states_are_distinguished() {
    let fixture = Fixture::sample();
    let manager = &fixture.roster.members()[0];

    let none = TeamList::build(manager, &[], &fixture.roster, &TeamFilter::default());
    assert_eq!(none.empty, Some(EmptyState::NoFeedback));
    assert_eq!(none.team.len(), 3);

    let records: Vec<&Feedback> = fixture.feedback.iter().collect();
    let filter = TeamFilter { search: "zzz".into(), employee: None };
    let miss = TeamList::build(manager, &records, &fixture.roster, &filter);
    assert_eq!(miss.empty, Some(EmptyState::NoMatches));
  }

  #[test]
  fn rows_carry_subject_details() {
    let fixture = Fixture::sample();
    let manager = &fixture.roster.members()[0];
    let records: Vec<&Feedback> = fixture.feedback.iter().collect();
    let list = TeamList::build(manager, &records, &fixture.roster, &TeamFilter::default());
    assert_eq!(list.rows[0].subject_name, "Mike Chen");
    assert!(list.rows[0].avatar.is_some());
    assert!(!list.rows[0].edited);
    assert_eq!(list.empty, None);
  }
}
