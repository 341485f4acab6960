pub mod api;
pub mod article;
pub mod user;

use chrono::DateTime;

use crate::db::{Database, DbResult, SqliteDatabase, Timestamp};

/// Connect to the store and bring the schema up to date.
pub async fn open_database(url: &str) -> DbResult<SqliteDatabase> {
    let db = SqliteDatabase::connect(url).await?;
    db.migrate().await?;
    Ok(db)
}

/// Render a millisecond timestamp as UTC, falling back to the raw number.
pub fn format_timestamp(ms: Timestamp) -> String {
    DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ms.to_string())
}

/// Shorten `value` to `max` characters, marking the cut with `...`.
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let kept: String = value.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
#[path = "user_test.rs"]
mod user_test;
