// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! This module decides, per request, whether the caller is authenticated
//! and who they are.
//!
//! ## Auth Flow
//!
//! 1. [`gate::AuthGate`] consults the exclusion list; excluded paths pass
//!    through untouched
//! 2. A request with neither an `Authorization` header nor a session
//!    cookie is rejected with 401
//! 3. The configured [`CredentialExtractor`] strategy resolves the
//!    credential material to a user; failure to resolve is a 403
//! 4. The resolved user rides in request extensions for handlers
//!
//! ## Strategies
//!
//! - [`NoAuth`] - never resolves a user (requests with credentials are 403)
//! - [`basic::BasicAuth`] - `Authorization: Basic <base64(email:password)>`
//!   checked against the user directory
//! - [`session::SessionAuth`] - session-id cookie resolved through a
//!   session store, then the user directory

pub mod basic;
pub mod error;
pub mod exclusions;
pub mod extractor;
pub mod gate;
pub mod session;

use axum::http::{header, HeaderMap};

use crate::models::User;

pub use basic::BasicAuth;
pub use error::AuthError;
pub use extractor::CurrentUser;
pub use gate::{AccessDecision, AuthGate};
pub use session::SessionAuth;

/// A credential-extraction strategy.
///
/// Implementations read credential material out of request headers and
/// resolve it to a user. Every failure mode (malformed material, unknown
/// user, bad password, dead session) resolves to `None`; nothing here
/// returns hard errors to the caller.
pub trait CredentialExtractor: Send + Sync {
    /// Name of the cookie session ids are carried in.
    fn cookie_name(&self) -> &str;

    /// Raw `Authorization` header value, if present and readable.
    fn authorization_header(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()
            .map(str::to_owned)
    }

    /// Session id from the configured cookie, if present.
    fn session_cookie(&self, headers: &HeaderMap) -> Option<String> {
        cookie_value(headers, self.cookie_name())
    }

    /// Resolve the request's credential material to a user.
    fn current_user(&self, headers: &HeaderMap) -> Option<User>;
}

/// Value of the cookie named `name` from the request's `Cookie` headers.
///
/// Unreadable header values and malformed pairs are skipped, not errors.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    for header_value in headers.get_all(header::COOKIE) {
        let Ok(raw) = header_value.to_str() else {
            continue;
        };
        for pair in raw.split(';') {
            let Some((key, value)) = pair.trim().split_once('=') else {
                continue;
            };
            if key == name {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Strategy used when no authentication type is configured: it never
/// resolves a user, so anything past the gate's 401 check is a 403.
pub struct NoAuth {
    cookie_name: String,
}

impl NoAuth {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
        }
    }
}

impl CredentialExtractor for NoAuth {
    fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    fn current_user(&self, _headers: &HeaderMap) -> Option<User> {
        None
    }
}
