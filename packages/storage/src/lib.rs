// ABOUTME: SQLite persistence layer for admissions and enrolled students
// ABOUTME: Exposes the storage structs, error type and pool initialization

use schoolgate_core::FieldError;
use thiserror::Error;

pub mod admissions;
pub mod db;
pub mod students;

pub use admissions::AdmissionStorage;
pub use students::StudentStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Validation failed: {} error(s)", .0.len())]
    Validation(Vec<FieldError>),
}
