//! [`SqliteSlots`]: the SQLite implementation of the slot repositories.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use rusqlite::OptionalExtension as _;
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use flow_core::{
  auth::StoredSession,
  feedback::Feedback,
  repository::{
    FEEDBACK_SLOT, FeedbackRepository, SESSION_SLOT, SessionRepository,
    decode_slot, encode_slot,
  },
};

use crate::{
  Error, Result,
  schema::{SCHEMA, VERSION},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Both client slots, kept in a single SQLite file.
///
/// Cloning is cheap and clones share the connection, so one value can back
/// the record store and the session holder at once.
#[derive(Clone)]
pub struct SqliteSlots {
  conn: tokio_rusqlite::Connection,
}

impl SqliteSlots {
  /// Open (or create) the slot file at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    let found: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("PRAGMA user_version", [], |r| r.get(0))?)
      })
      .await?;
    if found > VERSION {
      return Err(Error::SchemaVersion(found));
    }

    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Raw slot access ─────────────────────────────────────────────────────

  /// The document currently stored under `key`, undecoded.
  pub async fn raw(&self, key: &'static str) -> Result<Option<String>> {
    let doc = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT document FROM slots WHERE key = ?1",
              rusqlite::params![key],
              |r| r.get::<_, String>(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(doc)
  }

  /// Overwrite `key` with `document` as-is.
  pub async fn put_raw(&self, key: &'static str, document: String) -> Result<()> {
    let written_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let len = document.len();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO slots (key, document, written_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(key) DO UPDATE SET
             document   = excluded.document,
             written_at = excluded.written_at",
          rusqlite::params![key, document, written_at],
        )?;
        Ok(())
      })
      .await?;
    debug!(slot = key, bytes = len, "slot written");
    Ok(())
  }

  async fn remove(&self, key: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM slots WHERE key = ?1", rusqlite::params![key])?;
        Ok(())
      })
      .await?;
    debug!(slot = key, "slot cleared");
    Ok(())
  }

  async fn read<T: DeserializeOwned>(
    &self,
    key: &'static str,
  ) -> flow_core::Result<Option<T>> {
    self
      .raw(key)
      .await?
      .map(|doc| decode_slot(key, &doc))
      .transpose()
  }

  async fn write<T: Serialize + ?Sized>(
    &self,
    key: &'static str,
    value: &T,
  ) -> flow_core::Result<()> {
    let doc = encode_slot(key, value)?;
    self.put_raw(key, doc).await?;
    Ok(())
  }
}

// ─── Repository impls ────────────────────────────────────────────────────────

impl FeedbackRepository for SqliteSlots {
  async fn load(&self) -> flow_core::Result<Option<Vec<Feedback>>> {
    self.read(FEEDBACK_SLOT).await
  }

  async fn save(&self, snapshot: &[Feedback]) -> flow_core::Result<()> {
    self.write(FEEDBACK_SLOT, snapshot).await
  }
}

impl SessionRepository for SqliteSlots {
  async fn load(&self) -> flow_core::Result<Option<StoredSession>> {
    self.read(SESSION_SLOT).await
  }

  async fn save(&self, session: &StoredSession) -> flow_core::Result<()> {
    self.write(SESSION_SLOT, session).await
  }

  async fn clear(&self) -> flow_core::Result<()> {
    self.remove(SESSION_SLOT).await?;
    Ok(())
  }
}
