//! Application state container shared across Axum route handlers and services.
//!
//! It holds the database connection, the per-student lock table and the
//! token revocation list. Every field is cheap to clone.

use crate::{locks::KeyedLocks, tokens::RevokedTokens};
use sea_orm::DatabaseConnection;

#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    locks: KeyedLocks,
    revoked: RevokedTokens,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            locks: KeyedLocks::new(),
            revoked: RevokedTokens::new(),
        }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Per-student mutexes serializing heartbeat and command writes.
    pub fn locks(&self) -> &KeyedLocks {
        &self.locks
    }

    pub fn revoked(&self) -> &RevokedTokens {
        &self.revoked
    }
}
