//! Error type for `flow-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// The file was written by a newer schema than this build understands.
  #[error("unsupported schema version {0}")]
  SchemaVersion(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for flow_core::Error {
  fn from(e: Error) -> Self { flow_core::Error::storage(e) }
}
