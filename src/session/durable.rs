// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Durable session store backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `sessions`: session_id → serialized SessionRecord (JSON bytes)
//!
//! Every mutating store operation commits a redb write transaction before
//! returning, so a session that was issued is on disk, and a session that
//! was destroyed is gone, even if the process dies immediately after.
//! Lookups read from the database rather than a memory mirror, which is
//! what lets sessions survive restarts.

use std::path::Path;
use std::sync::{Arc, Mutex};

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use uuid::Uuid;

use crate::clock::Clock;

use super::{ExpiryPolicy, SessionLog, SessionLogError, SessionRecord, SessionStore};

/// Primary table: session_id → serialized SessionRecord (JSON bytes).
const SESSIONS: TableDefinition<&str, &[u8]> = TableDefinition::new("sessions");

/// Embedded ACID session database.
pub struct SessionDatabase {
    db: Database,
}

impl SessionDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> Result<Self, SessionLogError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create the table so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SESSIONS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }
}

impl SessionLog for SessionDatabase {
    fn save(&self, record: &SessionRecord) -> Result<(), SessionLogError> {
        let json = serde_json::to_vec(record)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SESSIONS)?;
            table.insert(record.session_id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn delete(&self, session_id: &str) -> Result<(), SessionLogError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(SESSIONS)?;
            table.remove(session_id)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn find(&self, session_id: &str) -> Result<Option<SessionRecord>, SessionLogError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SESSIONS)?;
        match table.get(session_id)? {
            Some(value) => {
                let record: SessionRecord = serde_json::from_slice(value.value())?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn load_all(&self) -> Result<Vec<SessionRecord>, SessionLogError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SESSIONS)?;

        let mut records = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let record: SessionRecord = serde_json::from_slice(value.value())?;
            records.push(record);
        }
        Ok(records)
    }
}

/// Session store whose records live in a [`SessionLog`].
///
/// Same expiry semantics as [`super::ExpiringSessionStore`]; the difference
/// is that every mutation is written through to the log before the call
/// returns, and lookups read the log, so the store survives restarts.
///
/// The mutex serializes create/lookup/destroy around the log I/O. Blocking
/// on disk inside the critical section is accepted; there is no deferred
/// flush.
pub struct DurableSessionStore {
    log: Box<dyn SessionLog>,
    policy: ExpiryPolicy,
    clock: Arc<dyn Clock>,
    guard: Mutex<()>,
}

impl DurableSessionStore {
    pub fn new(log: Box<dyn SessionLog>, policy: ExpiryPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            log,
            policy,
            clock,
            guard: Mutex::new(()),
        }
    }

    /// Number of records currently in the log, expired ones included.
    pub fn restored_count(&self) -> usize {
        let _guard = self.guard.lock().expect("session store lock poisoned");
        self.log.load_all().map(|records| records.len()).unwrap_or(0)
    }
}

impl SessionStore for DurableSessionStore {
    fn create(&self, user_id: &str) -> Option<String> {
        if user_id.is_empty() {
            return None;
        }

        let record = SessionRecord {
            session_id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            created_at: self.clock.now(),
        };

        let _guard = self.guard.lock().expect("session store lock poisoned");
        match self.log.save(&record) {
            Ok(()) => Some(record.session_id),
            Err(e) => {
                tracing::warn!("Failed to persist session record: {e}");
                None
            }
        }
    }

    fn lookup(&self, session_id: &str) -> Option<String> {
        if session_id.is_empty() {
            return None;
        }

        let _guard = self.guard.lock().expect("session store lock poisoned");
        let record = match self.log.find(session_id) {
            Ok(Some(record)) => record,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read session record: {e}");
                return None;
            }
        };

        if self.policy.is_expired(record.created_at, self.clock.now()) {
            return None;
        }
        Some(record.user_id)
    }

    fn destroy(&self, session_id: &str) -> bool {
        if session_id.is_empty() {
            return false;
        }

        let _guard = self.guard.lock().expect("session store lock poisoned");
        match self.log.find(session_id) {
            Ok(Some(_)) => {}
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!("Failed to read session record: {e}");
                return false;
            }
        }

        match self.log.delete(session_id) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to delete session record: {e}");
                false
            }
        }
    }
}
