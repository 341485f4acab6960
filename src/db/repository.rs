//! Repository traits for data access abstraction.
//!
//! These traits define the contract for data access, allowing different
//! storage backends to be swapped without changing business logic. Every
//! future is `Send` so handlers generic over [`Database`] can run on the
//! multi-threaded runtime.

use std::future::Future;

use crate::db::{
    DbResult,
    models::{
        Article, ArticleQuery, Feed, FeedPatch, Id, NewArticle, NewFeed, NewUser, User, UserPatch,
    },
};

/// Repository for User operations.
pub trait UserRepository: Send + Sync {
    /// Create a new user. Fails with `Constraint` on a duplicate api_key.
    fn create(&self, user: &NewUser) -> impl Future<Output = DbResult<User>> + Send;

    /// Get a user by ID.
    fn get(&self, id: Id) -> impl Future<Output = DbResult<User>> + Send;

    /// Get all users.
    fn list(&self) -> impl Future<Output = DbResult<Vec<User>>> + Send;

    /// Merge supplied fields over an existing user.
    fn update(&self, id: Id, patch: &UserPatch) -> impl Future<Output = DbResult<User>> + Send;

    /// Delete a user by ID. Returns whether a row was removed.
    fn delete(&self, id: Id) -> impl Future<Output = DbResult<bool>> + Send;
}

/// Repository for Feed operations.
pub trait FeedRepository: Send + Sync {
    /// Create a new feed.
    fn create(&self, feed: &NewFeed) -> impl Future<Output = DbResult<Feed>> + Send;

    /// Get a feed by ID.
    fn get(&self, id: Id) -> impl Future<Output = DbResult<Feed>> + Send;

    /// Get all feeds.
    fn list(&self) -> impl Future<Output = DbResult<Vec<Feed>>> + Send;

    /// Merge supplied fields over an existing feed.
    fn update(&self, id: Id, patch: &FeedPatch) -> impl Future<Output = DbResult<Feed>> + Send;

    /// Delete a feed by ID. Returns whether a row was removed.
    fn delete(&self, id: Id) -> impl Future<Output = DbResult<bool>> + Send;
}

/// Repository for Article operations.
pub trait ArticleRepository: Send + Sync {
    /// Create a new article. The referenced feed must exist.
    fn create(&self, article: &NewArticle) -> impl Future<Output = DbResult<Article>> + Send;

    /// Get an article by ID.
    fn get(&self, id: Id) -> impl Future<Output = DbResult<Article>> + Send;

    /// Get all articles, optionally restricted to one feed.
    fn list(
        &self,
        query: Option<&ArticleQuery>,
    ) -> impl Future<Output = DbResult<Vec<Article>>> + Send;

    /// Delete an article by ID. Returns whether a row was removed.
    fn delete(&self, id: Id) -> impl Future<Output = DbResult<bool>> + Send;
}

/// Combined database interface.
pub trait Database: Send + Sync {
    type Users: UserRepository;
    type Feeds: FeedRepository;
    type Articles: ArticleRepository;

    /// Apply pending schema migrations. Safe to call on every start.
    fn migrate(&self) -> impl Future<Output = DbResult<()>> + Send;

    /// Release the underlying connections.
    fn close(&self) -> impl Future<Output = ()> + Send;

    /// Get the user repository.
    fn users(&self) -> Self::Users;

    /// Get the feed repository.
    fn feeds(&self) -> Self::Feeds;

    /// Get the article repository.
    fn articles(&self) -> Self::Articles;
}
