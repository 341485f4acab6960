//! SQLite implementation of the database traits.
//!
//! This module provides a SQLx-backed implementation of the repository
//! traits defined in the parent module.

mod article;
mod connection;
mod feed;
mod user;

#[cfg(test)]
mod user_test;

pub use article::SqliteArticleRepository;
pub use connection::SqliteDatabase;
pub use feed::SqliteFeedRepository;
pub use user::SqliteUserRepository;
