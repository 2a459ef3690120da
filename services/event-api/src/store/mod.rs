//! In-memory stores for users and events.
//!
//! Each store guards its records with a single `tokio::sync::RwLock`. Every
//! read-check-write sequence runs under one write guard, so concurrent
//! requests cannot interleave between a check and the mutation it guards.

mod events;
mod users;

pub use events::EventStore;
pub use users::UserStore;

use evently_id::{EventId, UserId};
use thiserror::Error;

/// Errors from store operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    #[error("user id already exists: {0}")]
    DuplicateUser(UserId),

    #[error("event id already exists: {0}")]
    DuplicateEvent(EventId),
}
