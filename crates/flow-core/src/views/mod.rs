//! View models: pure derivations over a record snapshot, the viewer's
//! identity and the roster.
//!
//! Nothing here owns records. The only writes are
//! [`form::FeedbackDraft::submit`] and [`timeline::acknowledge`], and both go
//! through the [`RecordStore`](crate::record_store::RecordStore).

pub mod dashboard;
pub mod form;
pub mod team;
pub mod timeline;

use std::collections::HashMap;

use strum::IntoEnumIterator as _;

use crate::feedback::{Feedback, Sentiment};

/// Count of records per sentiment; every sentiment is present, even at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentimentCounts(HashMap<Sentiment, usize>);

impl SentimentCounts {
  pub fn tally<'a>(records: impl IntoIterator<Item = &'a Feedback>) -> Self {
    let mut counts: HashMap<_, _> =
      Sentiment::iter().map(|s| (s, 0)).collect();
    for f in records {
      *counts.entry(f.sentiment).or_default() += 1;
    }
    Self(counts)
  }

  pub fn get(&self, sentiment: Sentiment) -> usize {
    self.0.get(&sentiment).copied().unwrap_or(0)
  }
}
