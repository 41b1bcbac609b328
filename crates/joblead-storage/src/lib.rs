//! Relational store for jobs and their contacts, on SQLite via sqlx.

mod status_hook;
mod store;
mod updates;

pub use status_hook::{LoggingStatusHook, StatusHook};
pub use store::{ClassificationUpdate, InsertOutcome, JobStore, JobSummary, StatusTransition};
pub use updates::{BindValue, FieldUpdates, UpdateError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
