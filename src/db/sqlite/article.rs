//! SQLite ArticleRepository implementation.

use sqlx::SqlitePool;
use tracing::debug;

use crate::db::utils::current_timestamp;
use crate::db::{Article, ArticleQuery, ArticleRepository, DbError, DbResult, Id, NewArticle};

/// SQLx-backed article repository.
pub struct SqliteArticleRepository {
    pub(crate) pool: SqlitePool,
}

impl ArticleRepository for SqliteArticleRepository {
    async fn create(&self, article: &NewArticle) -> DbResult<Article> {
        article.validate()?;

        // Check and insert in one transaction so the feed cannot vanish in between
        let mut tx = self.pool.begin().await?;

        let feed_exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM feeds WHERE id = ?")
            .bind(article.feed_id)
            .fetch_one(&mut *tx)
            .await?;

        if feed_exists == 0 {
            return Err(DbError::validation(format!(
                "Feed {} does not exist",
                article.feed_id
            )));
        }

        let created_at = current_timestamp();

        let id = sqlx::query(
            "INSERT INTO articles (title, description, url, published_at, feed_id, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&article.title)
        .bind(&article.description)
        .bind(&article.url)
        .bind(article.published_at)
        .bind(article.feed_id)
        .bind(created_at)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;

        debug!(article_id = id, feed_id = article.feed_id, "Created article");

        Ok(Article {
            id,
            title: article.title.clone(),
            description: article.description.clone(),
            url: article.url.clone(),
            published_at: article.published_at,
            feed_id: article.feed_id,
            created_at,
        })
    }

    async fn get(&self, id: Id) -> DbResult<Article> {
        sqlx::query_as::<_, Article>(
            "SELECT id, title, description, url, published_at, feed_id, created_at \
             FROM articles WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Article", id))
    }

    async fn list(&self, query: Option<&ArticleQuery>) -> DbResult<Vec<Article>> {
        let articles = match query.and_then(|q| q.feed_id) {
            Some(feed_id) => {
                sqlx::query_as::<_, Article>(
                    "SELECT id, title, description, url, published_at, feed_id, created_at \
                     FROM articles WHERE feed_id = ? ORDER BY published_at DESC, id",
                )
                .bind(feed_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Article>(
                    "SELECT id, title, description, url, published_at, feed_id, created_at \
                     FROM articles ORDER BY published_at DESC, id",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(articles)
    }

    async fn delete(&self, id: Id) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM articles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
