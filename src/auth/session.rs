// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session-cookie authentication.
//!
//! Resolves the session-id cookie through the session store, then the
//! user directory. Also carries the login/logout surface the session
//! endpoints call: issuing a session for a verified user and destroying
//! the session named by the request's cookie.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::directory::UserDirectory;
use crate::models::User;
use crate::session::SessionStore;

use super::CredentialExtractor;

/// Session-cookie credential strategy.
///
/// The store variant (in-memory, expiring, durable) is chosen at
/// construction; this type is indifferent to it.
pub struct SessionAuth {
    store: Arc<dyn SessionStore>,
    directory: Arc<dyn UserDirectory>,
    cookie_name: String,
}

impl SessionAuth {
    pub fn new(
        store: Arc<dyn SessionStore>,
        directory: Arc<dyn UserDirectory>,
        cookie_name: impl Into<String>,
    ) -> Self {
        Self {
            store,
            directory,
            cookie_name: cookie_name.into(),
        }
    }

    /// Issue a session for `user_id`. `None` for an invalid user id or a
    /// store that failed to persist the record.
    pub fn create_session(&self, user_id: &str) -> Option<String> {
        self.store.create(user_id)
    }

    /// Destroy the session named by the request's cookie.
    ///
    /// `false` when the request carries no session cookie or the store
    /// holds no such record.
    pub fn destroy_session(&self, headers: &HeaderMap) -> bool {
        let Some(session_id) = self.session_cookie(headers) else {
            return false;
        };
        self.store.destroy(&session_id)
    }
}

impl CredentialExtractor for SessionAuth {
    fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    fn current_user(&self, headers: &HeaderMap) -> Option<User> {
        let session_id = self.session_cookie(headers)?;
        let user_id = self.store.lookup(&session_id)?;
        self.directory.find_by_id(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{header, HeaderValue};
    use chrono::Utc;

    use crate::directory::hash_password;
    use crate::session::MemorySessionStore;

    use super::*;

    struct StubDirectory {
        users: Vec<User>,
    }

    impl UserDirectory for StubDirectory {
        fn find_by_email(&self, email: &str) -> Vec<User> {
            self.users
                .iter()
                .filter(|user| user.email == email)
                .cloned()
                .collect()
        }

        fn find_by_id(&self, id: &str) -> Option<User> {
            self.users.iter().find(|user| user.id == id).cloned()
        }

        fn check_password(&self, user: &User, plaintext: &str) -> bool {
            user.password_hash == hash_password(plaintext)
        }
    }

    fn session_auth() -> SessionAuth {
        let directory = StubDirectory {
            users: vec![User {
                id: "user_1".to_string(),
                email: "ada@example.com".to_string(),
                password_hash: hash_password("secret"),
                first_name: None,
                last_name: None,
                created_at: Utc::now(),
            }],
        };
        SessionAuth::new(
            Arc::new(MemorySessionStore::new()),
            Arc::new(directory),
            "_my_session_id",
        )
    }

    fn cookie_headers(name: &str, session_id: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("{name}={session_id}")).unwrap(),
        );
        headers
    }

    #[test]
    fn current_user_resolves_a_live_session() {
        let auth = session_auth();
        let session_id = auth.create_session("user_1").unwrap();

        let headers = cookie_headers("_my_session_id", &session_id);
        let user = auth.current_user(&headers).unwrap();
        assert_eq!(user.id, "user_1");
    }

    #[test]
    fn current_user_fails_without_cookie_or_with_dead_session() {
        let auth = session_auth();

        assert!(auth.current_user(&HeaderMap::new()).is_none());

        let headers = cookie_headers("_my_session_id", "no-such-session");
        assert!(auth.current_user(&headers).is_none());
    }

    #[test]
    fn current_user_fails_when_session_points_at_unknown_user() {
        let auth = session_auth();
        let session_id = auth.create_session("ghost_user").unwrap();

        let headers = cookie_headers("_my_session_id", &session_id);
        assert!(auth.current_user(&headers).is_none());
    }

    #[test]
    fn destroy_session_requires_the_cookie() {
        let auth = session_auth();
        let session_id = auth.create_session("user_1").unwrap();

        // No cookie: nothing destroyed, session still live.
        assert!(!auth.destroy_session(&HeaderMap::new()));
        let headers = cookie_headers("_my_session_id", &session_id);
        assert!(auth.current_user(&headers).is_some());

        assert!(auth.destroy_session(&headers));
        assert!(auth.current_user(&headers).is_none());
        // Second destroy finds nothing.
        assert!(!auth.destroy_session(&headers));
    }

    #[test]
    fn cookie_under_a_different_name_is_ignored() {
        let auth = session_auth();
        let session_id = auth.create_session("user_1").unwrap();

        let headers = cookie_headers("other_cookie", &session_id);
        assert!(auth.current_user(&headers).is_none());
    }
}
