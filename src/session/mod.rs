// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Lifecycle Module
//!
//! Maps opaque session ids to user ids. A session id moves through
//! `absent → active → (expired | destroyed)`; there is no way back to
//! active, a new login always issues a fresh id.
//!
//! Three store variants:
//!
//! - [`MemorySessionStore`] - volatile, never expires
//! - [`ExpiringSessionStore`] - volatile, expiry evaluated at lookup time
//! - [`DurableSessionStore`] - expiring, write-through to an embedded
//!   database so sessions survive process restarts
//!
//! Expiry is lazy: an expired record fails lookup but stays in the store
//! until an explicit destroy removes it. There is no background sweeper.

pub mod durable;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use durable::{DurableSessionStore, SessionDatabase};
pub use store::{ExpiringSessionStore, MemorySessionStore};

/// A single session: issued id, owning user, creation time.
///
/// Immutable once created; the only mutation is removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Opaque unguessable session id (UUID v4)
    pub session_id: String,
    /// Id of the user the session belongs to
    pub user_id: String,
    /// When the session was created
    pub created_at: DateTime<Utc>,
}

/// Session lifetime policy.
///
/// `duration_secs <= 0` means sessions never expire. This is a policy
/// value, not a per-record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    pub duration_secs: i64,
}

impl ExpiryPolicy {
    pub fn new(duration_secs: i64) -> Self {
        Self { duration_secs }
    }

    /// Whether a record created at `created_at` is expired at `now`.
    pub fn is_expired(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        if self.duration_secs <= 0 {
            return false;
        }
        now > created_at + chrono::Duration::seconds(self.duration_secs)
    }
}

/// Session store operations shared by all variants.
///
/// All three operations are atomic with respect to each other; stores are
/// shared across request tasks behind an `Arc`.
pub trait SessionStore: Send + Sync {
    /// Issue a fresh session for `user_id`.
    ///
    /// Returns `None` for an empty `user_id`, leaving the store untouched.
    fn create(&self, user_id: &str) -> Option<String>;

    /// Resolve a session id to its user id.
    ///
    /// Returns `None` for an empty id, an unknown id, or an expired record.
    /// Expired records are not removed here.
    fn lookup(&self, session_id: &str) -> Option<String>;

    /// Remove a session. Returns `false` when no such record exists.
    ///
    /// Destroy works on expired records too, so a failed lookup does not
    /// strand the record forever.
    fn destroy(&self, session_id: &str) -> bool;
}

/// Durable mirror for session records, used by [`DurableSessionStore`].
///
/// Every call is synchronously durable before it returns; the store holds
/// its own lock around these calls, so implementations do not need one.
pub trait SessionLog: Send + Sync {
    fn save(&self, record: &SessionRecord) -> Result<(), SessionLogError>;

    fn delete(&self, session_id: &str) -> Result<(), SessionLogError>;

    fn find(&self, session_id: &str) -> Result<Option<SessionRecord>, SessionLogError>;

    /// All records currently in the log. Used at startup to report how many
    /// sessions survived the restart.
    fn load_all(&self) -> Result<Vec<SessionRecord>, SessionLogError>;
}

/// Error type for durable session log operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionLogError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
