//! SQLite backend for the FeedbackFlow client slots.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Each slot is one row holding one JSON
//! document.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteSlots;
