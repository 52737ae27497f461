// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory session stores.
//!
//! [`MemorySessionStore`] is the base map; [`ExpiringSessionStore`] wraps it
//! with an [`ExpiryPolicy`] checked at lookup time.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::clock::Clock;

use super::{ExpiryPolicy, SessionRecord, SessionStore};

/// Volatile session store: a mutex-guarded map, no expiry.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, SessionRecord>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh record for `user_id` and return its session id.
    ///
    /// The clock is passed in so the expiring wrapper controls the
    /// timestamps its policy is evaluated against.
    fn create_with_clock(&self, user_id: &str, clock: &dyn Clock) -> Option<String> {
        if user_id.is_empty() {
            return None;
        }

        let session_id = Uuid::new_v4().to_string();
        let record = SessionRecord {
            session_id: session_id.clone(),
            user_id: user_id.to_string(),
            created_at: clock.now(),
        };

        let mut sessions = self.sessions.lock().expect("session map lock poisoned");
        sessions.insert(session_id.clone(), record);
        Some(session_id)
    }

    /// Full record for a session id, expiry not considered.
    pub fn record(&self, session_id: &str) -> Option<SessionRecord> {
        if session_id.is_empty() {
            return None;
        }
        let sessions = self.sessions.lock().expect("session map lock poisoned");
        sessions.get(session_id).cloned()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.sessions.lock().expect("session map lock poisoned").len()
    }
}

impl SessionStore for MemorySessionStore {
    fn create(&self, user_id: &str) -> Option<String> {
        self.create_with_clock(user_id, &crate::clock::SystemClock)
    }

    fn lookup(&self, session_id: &str) -> Option<String> {
        self.record(session_id).map(|record| record.user_id)
    }

    fn destroy(&self, session_id: &str) -> bool {
        if session_id.is_empty() {
            return false;
        }
        let mut sessions = self.sessions.lock().expect("session map lock poisoned");
        sessions.remove(session_id).is_some()
    }
}

/// Expiring session store: the in-memory map plus a lookup-time expiry check.
///
/// Expired records fail lookup but are only removed by an explicit destroy
/// (lazy invalidation, not lazy eviction).
pub struct ExpiringSessionStore {
    inner: MemorySessionStore,
    policy: ExpiryPolicy,
    clock: Arc<dyn Clock>,
}

impl ExpiringSessionStore {
    pub fn new(policy: ExpiryPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: MemorySessionStore::new(),
            policy,
            clock,
        }
    }
}

impl SessionStore for ExpiringSessionStore {
    fn create(&self, user_id: &str) -> Option<String> {
        self.inner.create_with_clock(user_id, self.clock.as_ref())
    }

    fn lookup(&self, session_id: &str) -> Option<String> {
        let record = self.inner.record(session_id)?;
        if self.policy.is_expired(record.created_at, self.clock.now()) {
            return None;
        }
        Some(record.user_id)
    }

    fn destroy(&self, session_id: &str) -> bool {
        self.inner.destroy(session_id)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use crate::clock::ManualClock;

    use super::*;

    #[test]
    fn create_then_lookup_returns_user_id() {
        let store = MemorySessionStore::new();
        let session_id = store.create("user_1").unwrap();
        assert_eq!(store.lookup(&session_id), Some("user_1".to_string()));
    }

    #[test]
    fn create_rejects_empty_user_id() {
        let store = MemorySessionStore::new();
        assert!(store.create("").is_none());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn each_create_issues_a_fresh_id() {
        let store = MemorySessionStore::new();
        let first = store.create("user_1").unwrap();
        let second = store.create("user_1").unwrap();
        assert_ne!(first, second);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn lookup_rejects_empty_and_unknown_ids() {
        let store = MemorySessionStore::new();
        assert!(store.lookup("").is_none());
        assert!(store.lookup("no-such-session").is_none());
    }

    #[test]
    fn destroy_removes_the_record() {
        let store = MemorySessionStore::new();
        let session_id = store.create("user_1").unwrap();

        assert!(store.destroy(&session_id));
        assert!(store.lookup(&session_id).is_none());
    }

    #[test]
    fn destroy_twice_returns_true_then_false() {
        let store = MemorySessionStore::new();
        let session_id = store.create("user_1").unwrap();

        assert!(store.destroy(&session_id));
        assert!(!store.destroy(&session_id));
    }

    #[test]
    fn destroy_unknown_id_returns_false() {
        let store = MemorySessionStore::new();
        assert!(!store.destroy("no-such-session"));
        assert!(!store.destroy(""));
    }

    #[test]
    fn expiring_store_honors_duration_at_lookup() {
        let clock = Arc::new(ManualClock::starting_at(Utc::now()));
        let store = ExpiringSessionStore::new(ExpiryPolicy::new(5), clock.clone());

        let session_id = store.create("user_1").unwrap();

        clock.advance(Duration::seconds(4));
        assert_eq!(store.lookup(&session_id), Some("user_1".to_string()));

        clock.advance(Duration::seconds(2));
        assert!(store.lookup(&session_id).is_none());
    }

    #[test]
    fn expired_record_survives_failed_lookup_until_destroyed() {
        let clock = Arc::new(ManualClock::starting_at(Utc::now()));
        let store = ExpiringSessionStore::new(ExpiryPolicy::new(5), clock.clone());

        let session_id = store.create("user_1").unwrap();
        clock.advance(Duration::seconds(6));

        assert!(store.lookup(&session_id).is_none());
        // The failed lookup must not have evicted the record.
        assert!(store.destroy(&session_id));
        assert!(!store.destroy(&session_id));
    }

    #[test]
    fn non_positive_duration_never_expires_sessions() {
        let clock = Arc::new(ManualClock::starting_at(Utc::now()));
        let store = ExpiringSessionStore::new(ExpiryPolicy::new(0), clock.clone());

        let session_id = store.create("user_1").unwrap();
        clock.advance(Duration::days(400));
        assert_eq!(store.lookup(&session_id), Some("user_1".to_string()));
    }
}
