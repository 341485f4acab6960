//! Database abstraction layer.
//!
//! Trait-based data access so the API layer never depends on a concrete
//! storage backend.
//!
//! # Architecture
//!
//! - `error`: Storage-agnostic error types
//! - `models`: Domain entities (User, Feed, Article) and their write shapes
//! - `repository`: Trait definitions for data access
//! - `sqlite`: SQLx-backed implementation and schema migrations

mod error;
mod models;
mod repository;
pub mod sqlite;
pub mod utils;


pub use error::{DbError, DbResult};
pub use models::*;
pub use repository::*;
pub use sqlite::SqliteDatabase;
