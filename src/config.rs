// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! typed `Config` loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `AUTH_TYPE` | Authentication strategy (`none`, `basic`, `session`, `session_exp`, `session_db`) | `none` |
//! | `SESSION_NAME` | Name of the session cookie | `_my_session_id` |
//! | `SESSION_DURATION` | Session lifetime in seconds (`<= 0` disables expiry) | `0` |
//! | `DATA_DIR` | Root directory for durable state (users, session database) | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::env;
use std::path::PathBuf;

/// Environment variable selecting the authentication strategy.
pub const AUTH_TYPE_ENV: &str = "AUTH_TYPE";

/// Environment variable naming the session cookie.
pub const SESSION_NAME_ENV: &str = "SESSION_NAME";

/// Environment variable holding the session lifetime in seconds.
///
/// Unset, unparsable, or `<= 0` all mean sessions never expire.
pub const SESSION_DURATION_ENV: &str = "SESSION_DURATION";

/// Environment variable name for the data directory path.
///
/// Users and the durable session database are stored here.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Environment variable for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default session cookie name.
pub const DEFAULT_SESSION_NAME: &str = "_my_session_id";

/// Authentication strategy selected by `AUTH_TYPE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthType {
    /// No authentication: every request passes through.
    None,
    /// HTTP Basic authentication against the user directory.
    Basic,
    /// Session-cookie authentication, in-memory store, no expiry.
    Session,
    /// Session-cookie authentication with lookup-time expiry.
    SessionExp,
    /// Session-cookie authentication, expiring and durable across restarts.
    SessionDb,
}

impl AuthType {
    /// Parse an `AUTH_TYPE` value. Unknown values fall back to `None`.
    pub fn parse(value: &str) -> Self {
        match value {
            "none" | "" => AuthType::None,
            "basic" => AuthType::Basic,
            "session" => AuthType::Session,
            "session_exp" => AuthType::SessionExp,
            "session_db" => AuthType::SessionDb,
            other => {
                tracing::warn!("Unknown AUTH_TYPE {other:?}, authentication disabled");
                AuthType::None
            }
        }
    }
}

impl std::fmt::Display for AuthType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthType::None => write!(f, "none"),
            AuthType::Basic => write!(f, "basic"),
            AuthType::Session => write!(f, "session"),
            AuthType::SessionExp => write!(f, "session_exp"),
            AuthType::SessionDb => write!(f, "session_db"),
        }
    }
}

/// Runtime configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Selected authentication strategy.
    pub auth_type: AuthType,
    /// Name of the session cookie.
    pub session_name: String,
    /// Session lifetime in seconds; `<= 0` means sessions never expire.
    pub session_duration: i64,
    /// Root directory for durable state.
    pub data_dir: PathBuf,
    /// Server bind address.
    pub host: String,
    /// Server bind port.
    pub port: u16,
}

impl Config {
    /// Load configuration from the environment, applying defaults.
    pub fn from_env() -> Self {
        let auth_type = AuthType::parse(
            env::var(AUTH_TYPE_ENV)
                .unwrap_or_default()
                .trim(),
        );

        let session_name =
            env::var(SESSION_NAME_ENV).unwrap_or_else(|_| DEFAULT_SESSION_NAME.to_string());

        let session_duration = env::var(SESSION_DURATION_ENV)
            .ok()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .unwrap_or(0);

        let data_dir = env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/data"));

        let host = env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = env::var(PORT_ENV)
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        Self {
            auth_type,
            session_name,
            session_duration,
            data_dir,
            host,
            port,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auth_type: AuthType::None,
            session_name: DEFAULT_SESSION_NAME.to_string(),
            session_duration: 0,
            data_dir: PathBuf::from("/data"),
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}
