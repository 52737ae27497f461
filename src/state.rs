// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Application state: the process-wide auth gate, user directory, and
//! (for session auth types) the session strategy, all built once in
//! `main` and shared by reference with every request handler.

use std::sync::Arc;

use crate::auth::{AuthGate, BasicAuth, SessionAuth};
use crate::clock::SystemClock;
use crate::config::{AuthType, Config};
use crate::directory::{DirectoryError, FileUserDirectory};
use crate::session::{
    DurableSessionStore, ExpiringSessionStore, ExpiryPolicy, MemorySessionStore, SessionDatabase,
    SessionLogError, SessionStore,
};

/// Paths excluded from authentication.
const EXCLUDED_PATHS: &[&str] = &[
    "/api/v1/status/",
    "/api/v1/unauthorized/",
    "/api/v1/forbidden/",
    "/api/v1/auth_session/login/",
];

/// Error raised while building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("user directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("session database error: {0}")]
    SessionLog(#[from] SessionLogError),
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: Arc<FileUserDirectory>,
    pub gate: Arc<AuthGate>,
    /// Present for the session-based auth types; login/logout 404 without it.
    pub sessions: Option<Arc<SessionAuth>>,
}

impl AppState {
    /// Build the state for the configured auth type.
    ///
    /// Opens the user directory and, for `session_db`, the durable
    /// session database under the data directory.
    pub fn build(config: Config) -> Result<Self, StateError> {
        let users = Arc::new(FileUserDirectory::open(&config.data_dir)?);
        let excluded_paths: Vec<String> =
            EXCLUDED_PATHS.iter().map(|path| path.to_string()).collect();

        let store: Option<Arc<dyn SessionStore>> = match config.auth_type {
            AuthType::None | AuthType::Basic => None,
            AuthType::Session => Some(Arc::new(MemorySessionStore::new())),
            AuthType::SessionExp => Some(Arc::new(ExpiringSessionStore::new(
                ExpiryPolicy::new(config.session_duration),
                Arc::new(SystemClock),
            ))),
            AuthType::SessionDb => {
                let db = SessionDatabase::open(&config.data_dir.join("sessions.redb"))?;
                let store = DurableSessionStore::new(
                    Box::new(db),
                    ExpiryPolicy::new(config.session_duration),
                    Arc::new(SystemClock),
                );
                tracing::info!(
                    "Restored {} session(s) from durable storage",
                    store.restored_count()
                );
                Some(Arc::new(store))
            }
        };

        let sessions = store.map(|store| {
            Arc::new(SessionAuth::new(
                store,
                users.clone(),
                config.session_name.clone(),
            ))
        });

        let gate = match config.auth_type {
            AuthType::None => AuthGate::disabled(),
            AuthType::Basic => AuthGate::new(
                Arc::new(BasicAuth::new(users.clone(), config.session_name.clone())),
                excluded_paths,
            ),
            AuthType::Session | AuthType::SessionExp | AuthType::SessionDb => {
                let session_auth = sessions
                    .clone()
                    .expect("session auth types always build a store");
                AuthGate::new(session_auth, excluded_paths)
            }
        };

        Ok(Self {
            config: Arc::new(config),
            users,
            gate: Arc::new(gate),
            sessions,
        })
    }
}
