// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-request authentication gate.
//!
//! [`AuthGate`] owns the exclusion list and the configured credential
//! strategy and turns a request into an [`AccessDecision`]. The
//! [`require_authentication`] middleware applies the gate to every
//! request and stows the resolved user in request extensions for the
//! [`super::CurrentUser`] extractor.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::models::User;
use crate::state::AppState;

use super::exclusions::requires_auth;
use super::{AuthError, CredentialExtractor};

/// Outcome of gating one request.
#[derive(Debug)]
pub enum AccessDecision {
    /// Authentication is not configured or the path is excluded
    PassThrough,
    /// Credentials resolved to this user
    Allowed(User),
    /// No credential material at all
    Unauthorized,
    /// Credential material present but no valid user behind it
    Forbidden,
}

/// Process-wide authentication gate.
///
/// One instance is built at startup and shared by every request task;
/// there is no ambient global state.
pub struct AuthGate {
    extractor: Option<Arc<dyn CredentialExtractor>>,
    excluded_paths: Vec<String>,
}

impl AuthGate {
    /// Gate with a credential strategy and an exclusion list.
    pub fn new(extractor: Arc<dyn CredentialExtractor>, excluded_paths: Vec<String>) -> Self {
        Self {
            extractor: Some(extractor),
            excluded_paths,
        }
    }

    /// Gate that passes every request through (AUTH_TYPE=none).
    pub fn disabled() -> Self {
        Self {
            extractor: None,
            excluded_paths: Vec::new(),
        }
    }

    /// Decide whether the request may proceed and as whom.
    pub fn check(&self, path: &str, headers: &HeaderMap) -> AccessDecision {
        let Some(extractor) = &self.extractor else {
            return AccessDecision::PassThrough;
        };

        if !requires_auth(path, &self.excluded_paths) {
            return AccessDecision::PassThrough;
        }

        if extractor.authorization_header(headers).is_none()
            && extractor.session_cookie(headers).is_none()
        {
            return AccessDecision::Unauthorized;
        }

        match extractor.current_user(headers) {
            Some(user) => AccessDecision::Allowed(user),
            None => AccessDecision::Forbidden,
        }
    }
}

/// Authentication middleware.
///
/// Allowed users ride in request extensions; rejections short-circuit
/// with the gate's status code and never reach the handler.
pub async fn require_authentication(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let decision = state.gate.check(request.uri().path(), request.headers());

    match decision {
        AccessDecision::PassThrough => next.run(request).await,
        AccessDecision::Allowed(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        AccessDecision::Unauthorized => {
            tracing::debug!(path = %request.uri().path(), "Rejecting request without credentials");
            AuthError::Unauthorized.into_response()
        }
        AccessDecision::Forbidden => {
            tracing::debug!(path = %request.uri().path(), "Rejecting unresolvable credentials");
            AuthError::Forbidden.into_response()
        }
    }
}
