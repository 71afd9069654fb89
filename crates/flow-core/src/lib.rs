//! Core types and components for FeedbackFlow.
//!
//! No HTTP or database code lives here. The record store and session holder
//! talk to durable storage only through the repository traits in
//! [`repository`], and to the login service only through the
//! [`auth::Authenticator`] trait.

pub mod auth;
pub mod error;
pub mod feedback;
pub mod fixture;
pub mod identity;
pub mod memory;
pub mod record_store;
pub mod repository;
pub mod session;
pub mod shell;
pub mod views;

pub use error::{Error, Result};
