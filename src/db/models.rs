//! Domain models for the aggregator database.
//!
//! These models are storage-agnostic and represent the core entities used
//! throughout the application. Timestamps are milliseconds since the Unix
//! epoch.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{DbError, DbResult};

/// Auto-incrementing row id shared by all entities.
pub type Id = i64;

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

// =============================================================================
// Entities
// =============================================================================

/// A registered consumer of the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Id,
    pub name: String,
    /// Unique across all users. Stored but never checked.
    pub api_key: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A feed registered by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Feed {
    pub id: Id,
    pub name: String,
    pub url: String,
    /// Owning user. Not validated against `users`.
    pub user_id: Option<Id>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An article ingested from a feed.
///
/// Only the `feed_id` is carried; the feed itself is never embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Article {
    pub id: Id,
    pub title: String,
    pub description: String,
    pub url: String,
    pub published_at: Timestamp,
    pub feed_id: Id,
    pub created_at: Timestamp,
}

// =============================================================================
// Create shapes
// =============================================================================

/// Fields a caller supplies when creating a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub api_key: String,
}

impl NewUser {
    pub fn validate(&self) -> DbResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(DbError::validation("User api_key is required"));
        }
        Ok(())
    }
}

/// Fields a caller supplies when creating a feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewFeed {
    pub name: String,
    pub url: String,
    pub user_id: Option<Id>,
}

impl NewFeed {
    /// Both `name` and `url` must be non-blank.
    pub fn validate(&self) -> DbResult<()> {
        if self.name.trim().is_empty() {
            return Err(DbError::validation("Feed name is required"));
        }
        if self.url.trim().is_empty() {
            return Err(DbError::validation("Feed url is required"));
        }
        Ok(())
    }
}

/// Fields a caller supplies when creating an article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewArticle {
    pub title: String,
    pub description: String,
    pub url: String,
    pub published_at: Timestamp,
    pub feed_id: Id,
}

impl NewArticle {
    pub fn validate(&self) -> DbResult<()> {
        if self.feed_id <= 0 {
            return Err(DbError::validation("Article feed_id is required"));
        }
        Ok(())
    }
}

// =============================================================================
// Partial updates
// =============================================================================

/// Returns the value only if it was actually supplied.
///
/// A blank string is the zero value and means "leave unchanged", matching
/// the trim applied by the create-shape validators.
fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Partial update for a user. Empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub api_key: Option<String>,
}

impl UserPatch {
    /// Merge supplied fields over `user`. Timestamps are left alone.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(name) = supplied(&self.name) {
            user.name = name.to_string();
        }
        if let Some(api_key) = supplied(&self.api_key) {
            user.api_key = api_key.to_string();
        }
    }
}

/// Partial update for a feed. Empty strings and a zero `user_id` are treated
/// as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedPatch {
    pub name: Option<String>,
    pub url: Option<String>,
    pub user_id: Option<Id>,
}

impl FeedPatch {
    /// Merge supplied fields over `feed`. Timestamps are left alone.
    pub fn apply_to(&self, feed: &mut Feed) {
        if let Some(name) = supplied(&self.name) {
            feed.name = name.to_string();
        }
        if let Some(url) = supplied(&self.url) {
            feed.url = url.to_string();
        }
        if let Some(user_id) = self.user_id.filter(|id| *id != 0) {
            feed.user_id = Some(user_id);
        }
    }
}

// =============================================================================
// Queries
// =============================================================================

/// Filter for article listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArticleQuery {
    /// Only return articles belonging to this feed.
    pub feed_id: Option<Id>,
}

impl ArticleQuery {
    pub fn for_feed(feed_id: Id) -> Self {
        Self {
            feed_id: Some(feed_id),
        }
    }
}
