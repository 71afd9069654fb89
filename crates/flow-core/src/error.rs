//! Error types for `flow-core`.

use thiserror::Error;

use crate::{feedback::FeedbackId, identity::UserId};

#[derive(Debug, Error)]
pub enum Error {
  #[error("feedback not found: {0}")]
  FeedbackNotFound(FeedbackId),

  #[error("{0} must not be empty")]
  EmptyField(&'static str),

  /// A durable slot holds a document that does not decode.
  #[error("slot {slot:?} holds malformed data: {reason}")]
  CorruptState {
    slot:   &'static str,
    reason: String,
  },

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("{0} is not on this manager's team")]
  NotOnTeam(UserId),

  #[error("the subject of existing feedback cannot be changed")]
  SubjectLocked,

  #[error("invalid roster: {0}")]
  InvalidRoster(String),
}

impl Error {
  /// Wrap a backend error as [`Error::Storage`].
  pub fn storage(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Storage(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
