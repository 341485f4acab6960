//! SQLite FeedRepository implementation.

use sqlx::SqlitePool;
use tracing::debug;

use crate::db::utils::{current_timestamp, next_updated_at};
use crate::db::{DbError, DbResult, Feed, FeedPatch, FeedRepository, Id, NewFeed};

/// SQLx-backed feed repository.
pub struct SqliteFeedRepository {
    pub(crate) pool: SqlitePool,
}

impl FeedRepository for SqliteFeedRepository {
    async fn create(&self, feed: &NewFeed) -> DbResult<Feed> {
        feed.validate()?;

        // Server-assigned; created_at and updated_at start out equal
        let created_at = current_timestamp();
        let updated_at = created_at;
        let user_id = feed.user_id.filter(|id| *id != 0);

        let id = sqlx::query(
            "INSERT INTO feeds (name, url, user_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&feed.name)
        .bind(&feed.url)
        .bind(user_id)
        .bind(created_at)
        .bind(updated_at)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        debug!(feed_id = id, "Created feed");

        Ok(Feed {
            id,
            name: feed.name.clone(),
            url: feed.url.clone(),
            user_id,
            created_at,
            updated_at,
        })
    }

    async fn get(&self, id: Id) -> DbResult<Feed> {
        sqlx::query_as::<_, Feed>(
            "SELECT id, name, url, user_id, created_at, updated_at FROM feeds WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Feed", id))
    }

    async fn list(&self) -> DbResult<Vec<Feed>> {
        let feeds = sqlx::query_as::<_, Feed>(
            "SELECT id, name, url, user_id, created_at, updated_at FROM feeds ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(feeds)
    }

    async fn update(&self, id: Id, patch: &FeedPatch) -> DbResult<Feed> {
        // Load and write in one transaction so the merge sees a consistent row
        let mut tx = self.pool.begin().await?;

        let mut feed = sqlx::query_as::<_, Feed>(
            "SELECT id, name, url, user_id, created_at, updated_at FROM feeds WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Feed", id))?;

        patch.apply_to(&mut feed);
        feed.updated_at = next_updated_at(feed.updated_at);

        sqlx::query("UPDATE feeds SET name = ?, url = ?, user_id = ?, updated_at = ? WHERE id = ?")
            .bind(&feed.name)
            .bind(&feed.url)
            .bind(feed.user_id)
            .bind(feed.updated_at)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(feed_id = id, "Updated feed");
        Ok(feed)
    }

    async fn delete(&self, id: Id) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM feeds WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        debug!(feed_id = id, removed, "Deleted feed");
        Ok(removed)
    }
}
