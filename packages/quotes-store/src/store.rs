//! SQLite-backed store for authors and quotes.
//!
//! Every mutating operation runs inside its own transaction; referenced
//! authors are checked for existence before a quote is written, so a quote
//! can never be persisted against a missing author. Foreign keys are also
//! enforced at the SQLite level as a backstop.

use std::str::FromStr;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::models::{Author, QuoteChanges, QuoteWithAuthor, DEFAULT_SURNAME};

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!();

const QUOTE_SELECT: &str = "SELECT q.id, q.text, q.author_id, \
     a.name AS author_name, a.surname AS author_surname \
     FROM quote_model q JOIN author_model a ON a.id = q.author_id \
     ORDER BY q.id";

const QUOTE_SELECT_BY_ID: &str = "SELECT q.id, q.text, q.author_id, \
     a.name AS author_name, a.surname AS author_surname \
     FROM quote_model q JOIN author_model a ON a.id = q.author_id \
     WHERE q.id = ?1";

const AUTHOR_SELECT_BY_ID: &str = "SELECT id, name, surname FROM author_model WHERE id = ?1";

/// Joined quote row as read from the store.
#[derive(Debug, sqlx::FromRow)]
struct QuoteRow {
    id: i64,
    text: String,
    author_id: i64,
    author_name: String,
    author_surname: String,
}

impl From<QuoteRow> for QuoteWithAuthor {
    fn from(row: QuoteRow) -> Self {
        QuoteWithAuthor {
            id: row.id,
            author: Author {
                id: row.author_id,
                name: row.author_name,
                surname: row.author_surname,
            },
            text: row.text,
        }
    }
}

/// Handle to the SQLite store.
///
/// Cheap to clone; all clones share one bounded connection pool.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Opens a bounded connection pool against the configured database.
    ///
    /// The database file is created if it does not exist yet. Call
    /// [`Store::migrate`] before serving requests.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        tracing::info!(url = %config.database_url, "connected to database");
        Ok(Self { pool })
    }

    /// Applies any pending schema migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        MIGRATOR.run(&self.pool).await?;
        Ok(())
    }

    /// Inserts a new author.
    ///
    /// When `surname` is `None` the fixed placeholder is used. A duplicate
    /// name is rejected by the store's unique index and surfaced as
    /// [`StoreError::DuplicateAuthorName`].
    pub async fn create_author(
        &self,
        name: &str,
        surname: Option<&str>,
    ) -> Result<Author, StoreError> {
        let surname = surname.unwrap_or(DEFAULT_SURNAME);

        let author = sqlx::query_as::<_, Author>(
            "INSERT INTO author_model (name, surname) VALUES (?1, ?2) \
             RETURNING id, name, surname",
        )
        .bind(name)
        .bind(surname)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_author_insert_error(e, name))?;

        tracing::debug!(id = author.id, "created author");
        Ok(author)
    }

    /// Looks up an author by id.
    pub async fn get_author(&self, id: i64) -> Result<Author, StoreError> {
        sqlx::query_as::<_, Author>(AUTHOR_SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::AuthorNotFound { id })
    }

    /// Returns all quotes in insertion order, each with its author embedded.
    pub async fn list_quotes(&self) -> Result<Vec<QuoteWithAuthor>, StoreError> {
        let rows = sqlx::query_as::<_, QuoteRow>(QUOTE_SELECT)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(QuoteWithAuthor::from).collect())
    }

    /// Looks up a single quote by id, with its author embedded.
    pub async fn get_quote(&self, id: i64) -> Result<QuoteWithAuthor, StoreError> {
        sqlx::query_as::<_, QuoteRow>(QUOTE_SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(QuoteWithAuthor::from)
            .ok_or(StoreError::QuoteNotFound { id })
    }

    /// Inserts a new quote for an existing author.
    ///
    /// The author is resolved inside the same transaction as the insert, so
    /// the returned quote always embeds a live author.
    pub async fn create_quote(
        &self,
        author_id: i64,
        text: &str,
    ) -> Result<QuoteWithAuthor, StoreError> {
        let mut tx = self.pool.begin().await?;

        let author = sqlx::query_as::<_, Author>(AUTHOR_SELECT_BY_ID)
            .bind(author_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::AuthorNotFound { id: author_id })?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO quote_model (author_id, text) VALUES (?1, ?2) RETURNING id",
        )
        .bind(author_id)
        .bind(text)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;

        tracing::debug!(id, author_id, "created quote");
        Ok(QuoteWithAuthor {
            id,
            author,
            text: text.to_string(),
        })
    }

    /// Applies an explicit set of changes to an existing quote.
    ///
    /// A changed `author_id` must reference an existing author; the check
    /// happens at write time, in the same transaction as the update.
    pub async fn update_quote(
        &self,
        id: i64,
        changes: &QuoteChanges,
    ) -> Result<QuoteWithAuthor, StoreError> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM quote_model WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_none() {
            return Err(StoreError::QuoteNotFound { id });
        }

        if let Some(author_id) = changes.author_id {
            let found: Option<i64> =
                sqlx::query_scalar("SELECT id FROM author_model WHERE id = ?1")
                    .bind(author_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            if found.is_none() {
                return Err(StoreError::AuthorNotFound { id: author_id });
            }

            sqlx::query("UPDATE quote_model SET author_id = ?1 WHERE id = ?2")
                .bind(author_id)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(map_write_error)?;
        }

        if let Some(text) = &changes.text {
            sqlx::query("UPDATE quote_model SET text = ?1 WHERE id = ?2")
                .bind(text)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(map_write_error)?;
        }

        let row = sqlx::query_as::<_, QuoteRow>(QUOTE_SELECT_BY_ID)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(id, "updated quote");
        Ok(row.into())
    }

    /// Deletes a quote by id.
    pub async fn delete_quote(&self, id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM quote_model WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::QuoteNotFound { id });
        }

        tracing::debug!(id, "deleted quote");
        Ok(())
    }
}

/// Maps write failures, turning constraint rejections into their own variant.
fn map_write_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if matches!(
            db.kind(),
            sqlx::error::ErrorKind::UniqueViolation | sqlx::error::ErrorKind::ForeignKeyViolation
        ) {
            return StoreError::ConstraintViolation(db.to_string());
        }
    }
    StoreError::Database(e)
}

/// Maps author insert failures, naming the duplicate when the unique index
/// on `name` rejects the write.
fn map_author_insert_error(e: sqlx::Error, name: &str) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            return StoreError::DuplicateAuthorName {
                name: name.to_string(),
            };
        }
    }
    map_write_error(e)
}
