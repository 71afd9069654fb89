//! SQL schema for the slot store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! layout so later migrations can be gated on it.

/// Layout version written by [`SCHEMA`].
pub const VERSION: i64 = 1;

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per slot. A missing row means the slot was never written.
CREATE TABLE IF NOT EXISTS slots (
    key         TEXT PRIMARY KEY,
    document    TEXT NOT NULL,   -- JSON, decoded by flow-core
    written_at  TEXT NOT NULL    -- RFC 3339 UTC
);

PRAGMA user_version = 1;
";
