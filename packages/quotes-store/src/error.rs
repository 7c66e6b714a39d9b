//! Store error types.

use thiserror::Error;

/// Store operation errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Author not found
    #[error("Author with id={id} not found")]
    AuthorNotFound { id: i64 },

    /// Quote not found
    #[error("Quote with id={id} not found")]
    QuoteNotFound { id: i64 },

    /// Author name already taken
    #[error("Author with name '{name}' already exists")]
    DuplicateAuthorName { name: String },

    /// Store rejected a write (unique or foreign key violation)
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Underlying database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failure at startup
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}
