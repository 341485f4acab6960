//! SQLite UserRepository implementation.

use sqlx::SqlitePool;
use tracing::debug;

use crate::db::utils::{current_timestamp, next_updated_at};
use crate::db::{DbError, DbResult, Id, NewUser, User, UserPatch, UserRepository};

/// SQLx-backed user repository.
pub struct SqliteUserRepository {
    pub(crate) pool: SqlitePool,
}

impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: &NewUser) -> DbResult<User> {
        user.validate()?;

        let created_at = current_timestamp();
        let updated_at = created_at;

        // A duplicate api_key trips idx_users_api_key and surfaces as Constraint
        let id = sqlx::query(
            "INSERT INTO users (name, api_key, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&user.name)
        .bind(&user.api_key)
        .bind(created_at)
        .bind(updated_at)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        debug!(user_id = id, "Created user");

        Ok(User {
            id,
            name: user.name.clone(),
            api_key: user.api_key.clone(),
            created_at,
            updated_at,
        })
    }

    async fn get(&self, id: Id) -> DbResult<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, api_key, created_at, updated_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("User", id))
    }

    async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, api_key, created_at, updated_at FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn update(&self, id: Id, patch: &UserPatch) -> DbResult<User> {
        let mut tx = self.pool.begin().await?;

        let mut user = sqlx::query_as::<_, User>(
            "SELECT id, name, api_key, created_at, updated_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("User", id))?;

        patch.apply_to(&mut user);
        user.updated_at = next_updated_at(user.updated_at);

        sqlx::query("UPDATE users SET name = ?, api_key = ?, updated_at = ? WHERE id = ?")
            .bind(&user.name)
            .bind(&user.api_key)
            .bind(user.updated_at)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(user_id = id, "Updated user");
        Ok(user)
    }

    async fn delete(&self, id: Id) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
