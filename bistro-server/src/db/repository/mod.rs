//! Repository Module
//!
//! CRUD operations over the SQLite store, one module of free functions per
//! table. Handlers convert [`RepoError`] into `AppError` via `From`.

// Auth
pub mod user;

// Catalog
pub mod category;
pub mod menu_item;

// Ordering
pub mod cart;
pub mod order;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Still referenced: {0}")]
    Referenced(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
