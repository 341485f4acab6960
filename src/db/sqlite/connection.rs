//! SQLite connection pool and schema migration management.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use tracing::{debug, info};

use super::{SqliteArticleRepository, SqliteFeedRepository, SqliteUserRepository};
use crate::db::{Database, DbError, DbResult};

// Embed migrations from data/sql/sqlite/ at compile time
static MIGRATOR: Migrator = sqlx::migrate!("data/sql/sqlite");

/// SQLite database implementation.
///
/// Owns the process-wide connection pool. Repositories hold a clone of the
/// pool handle, which is reference counted.
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Connect using a `sqlite:` URL such as `sqlite://rss_aggregator.db`.
    ///
    /// The database file is created if missing.
    pub async fn connect(url: &str) -> DbResult<Self> {
        debug!(url, "Connecting to database");
        let options = SqliteConnectOptions::from_str(url).map_err(|e| DbError::Connection {
            message: format!("invalid database url '{}': {}", url, e),
        })?;
        Self::connect_with(options).await
    }

    /// Open a database file at the given path.
    pub async fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        Self::connect_with(SqliteConnectOptions::new().filename(path)).await
    }

    /// Create an in-memory database (useful for testing).
    ///
    /// Pinned to a single connection that is never recycled, since every
    /// in-memory connection is its own database.
    pub async fn in_memory() -> DbResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;
        Ok(Self { pool })
    }

    async fn connect_with(options: SqliteConnectOptions) -> DbResult<Self> {
        let options = options
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(10));

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    /// Get the underlying pool for direct queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl Database for SqliteDatabase {
    type Users = SqliteUserRepository;
    type Feeds = SqliteFeedRepository;
    type Articles = SqliteArticleRepository;

    async fn migrate(&self) -> DbResult<()> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| DbError::Migration {
                message: e.to_string(),
            })?;

        info!(migrations = MIGRATOR.iter().count(), "Database schema is up to date");
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        debug!("Database pool closed");
    }

    fn users(&self) -> Self::Users {
        SqliteUserRepository {
            pool: self.pool.clone(),
        }
    }

    fn feeds(&self) -> Self::Feeds {
        SqliteFeedRepository {
            pool: self.pool.clone(),
        }
    }

    fn articles(&self) -> Self::Articles {
        SqliteArticleRepository {
            pool: self.pool.clone(),
        }
    }
}
