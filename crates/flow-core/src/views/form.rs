//! Feedback form: a draft that becomes either a new record or an edit.

use crate::{
  Error, Result,
  feedback::{Feedback, FeedbackId, FeedbackPatch, NewFeedback, Sentiment},
  identity::{Identity, Roster, UserId},
  record_store::RecordStore,
  repository::FeedbackRepository,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
  Create,
  Edit(FeedbackId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackDraft {
  mode:             FormMode,
  employee_id:      Option<UserId>,
  pub strengths:    String,
  pub improvements: String,
  pub sentiment:    Sentiment,
}

impl Default for FeedbackDraft {
  fn default() -> Self { Self::create() }
}

impl FeedbackDraft {
  /// A blank draft for new feedback, sentiment defaulting to neutral.
  pub fn create() -> Self {
    Self {
      mode:         FormMode::Create,
      employee_id:  None,
      strengths:    String::new(),
      improvements: String::new(),
      sentiment:    Sentiment::default(),
    }
  }

  /// A draft pre-filled from `record`; its subject cannot be changed.
  pub fn editing(record: &Feedback) -> Self {
    Self {
      mode:         FormMode::Edit(record.id.clone()),
      employee_id:  Some(record.employee_id.clone()),
      strengths:    record.strengths.clone(),
      improvements: record.improvements.clone(),
      sentiment:    record.sentiment,
    }
  }

  pub fn mode(&self) -> &FormMode { &self.mode }

  pub fn is_editing(&self) -> bool { matches!(self.mode, FormMode::Edit(_)) }

  pub fn employee_id(&self) -> Option<&UserId> { self.employee_id.as_ref() }

  pub fn select_employee(&mut self, id: UserId) -> Result<()> {
    if self.is_editing() {
      return Err(Error::SubjectLocked);
    }
    self.employee_id = Some(id);
    Ok(())
  }

  /// Whether every required field is filled in.
  pub fn is_complete(&self) -> bool {
    self.employee_id.is_some()
      && !self.strengths.trim().is_empty()
      && !self.improvements.trim().is_empty()
  }

  /// Write the draft through `store` as `author`.
  ///
  /// Only managers may submit, and new feedback must be addressed to one of
  /// the author's direct reports.
  pub async fn submit<R: FeedbackRepository>(
    &self,
    store: &mut RecordStore<R>,
    author: &Identity,
    roster: &Roster,
  ) -> Result<Feedback> {
    if !author.is_manager() {
      return Err(Error::Forbidden("only managers can give feedback".into()));
    }

    match &self.mode {
      FormMode::Create => {
        let employee_id = self
          .employee_id
          .clone()
          .ok_or(Error::EmptyField("employee"))?;
        if !roster.is_on_team(&author.id, &employee_id) {
          return Err(Error::NotOnTeam(employee_id));
        }
        store
          .add(NewFeedback {
            manager_id: author.id.clone(),
            employee_id,
            strengths: self.strengths.clone(),
            improvements: self.improvements.clone(),
            sentiment: self.sentiment,
          })
          .await
      }
      FormMode::Edit(id) => {
        if store.get(id).is_some_and(|f| f.manager_id != author.id) {
          return Err(Error::Forbidden(format!(
            "feedback {id} was written by another manager"
          )));
        }
        store
          .update(id, FeedbackPatch {
            strengths:    Some(self.strengths.clone()),
            improvements: Some(self.improvements.clone()),
            sentiment:    Some(self.sentiment),
          })
          .await
      }
    }
  }
}
