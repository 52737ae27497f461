// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Rejection produced by the auth gate.
///
/// Malformed credentials, unknown users, and dead sessions never surface
/// individually; they all collapse into one of these two outcomes at the
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No credential material at all (no header, no session cookie)
    Unauthorized,
    /// Credential material present but it resolves to no valid user
    Forbidden,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
}

impl AuthError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Unauthorized => write!(f, "Unauthorized"),
            AuthError::Forbidden => write!(f, "Forbidden"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(AuthErrorBody {
            error: self.to_string(),
        });
        (self.status_code(), body).into_response()
    }
}
