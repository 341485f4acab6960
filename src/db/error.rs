//! Database error types.
//!
//! Storage-backend agnostic errors with miette diagnostics. SQLx errors are
//! classified on conversion so callers can tell a broken uniqueness rule apart
//! from a generic storage failure.

use miette::Diagnostic;
use thiserror::Error;

/// Database operation errors.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Entity not found: {entity_type} with id '{id}'")]
    #[diagnostic(code(rss_aggregator::db::not_found))]
    NotFound { entity_type: String, id: String },

    #[error("Validation error: {message}")]
    #[diagnostic(code(rss_aggregator::db::validation_error))]
    Validation { message: String },

    #[error("Constraint violation: {message}")]
    #[diagnostic(code(rss_aggregator::db::constraint))]
    Constraint { message: String },

    #[error("Database error: {message}")]
    #[diagnostic(code(rss_aggregator::db::database_error))]
    Database { message: String },

    #[error("Migration error: {message}")]
    #[diagnostic(
        code(rss_aggregator::db::migration_error),
        help("The schema could not be brought up to date; the server will not start.")
    )]
    Migration { message: String },

    #[error("Connection error: {message}")]
    #[diagnostic(
        code(rss_aggregator::db::connection_error),
        help("Check DATABASE_URL, e.g. sqlite://rss_aggregator.db")
    )]
    Connection { message: String },
}

impl DbError {
    pub(crate) fn not_found(entity_type: &str, id: impl ToString) -> Self {
        DbError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        DbError::Validation {
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db_err)
                if db_err.is_unique_violation() || db_err.is_foreign_key_violation() =>
            {
                DbError::Constraint {
                    message: db_err.message().to_string(),
                }
            }
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity_type: "row".to_string(),
                id: "unknown".to_string(),
            },
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => DbError::Connection {
                message: e.to_string(),
            },
            _ => DbError::Database {
                message: e.to_string(),
            },
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
