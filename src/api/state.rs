//! Application state for the API server.

use std::sync::Arc;

use crate::db::Database;

/// Shared application state.
///
/// Holds the storage handle constructed at startup. Generic over
/// `D: Database` so handlers never name a concrete backend.
pub struct AppState<D: Database> {
    db: Arc<D>,
}

// Manual Clone impl - we only need Arc to be cloneable, not D
impl<D: Database> Clone for AppState<D> {
    fn clone(&self) -> Self {
        Self {
            db: Arc::clone(&self.db),
        }
    }
}

impl<D: Database> AppState<D> {
    /// Create a new AppState owning the given database.
    pub fn new(db: D) -> Self {
        Self { db: Arc::new(db) }
    }

    /// Get a reference to the database.
    pub fn db(&self) -> &D {
        &self.db
    }
}
