// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User model and API request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A user record as stored in the directory.
///
/// This is the stored representation and includes the password digest;
/// API responses use [`UserResponse`], which never exposes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier (UUID)
    pub id: String,
    /// E-mail address, unique within the directory
    pub email: String,
    /// Lowercase-hex SHA-256 digest of the password
    pub password_hash: String,
    /// Optional first name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Optional last name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// When the user was created
    pub created_at: DateTime<Utc>,
}

/// User representation returned to API clients (never includes the digest).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    pub id: String,
    /// E-mail address
    pub email: String,
    /// Optional first name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Optional last name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// When the user was created
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: user.created_at,
        }
    }
}

/// Request body for POST /api/v1/users.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// E-mail address (required, must be unique)
    #[serde(default)]
    pub email: String,
    /// Plaintext password (required; stored as a SHA-256 digest)
    #[serde(default)]
    pub password: String,
    /// Optional first name
    #[serde(default)]
    pub first_name: Option<String>,
    /// Optional last name
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Typed field mask for PUT /api/v1/users/{user_id}.
///
/// Only the fields present here can be updated; anything else in the
/// stored record is immutable through the API.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UserPatch {
    /// New first name, when present
    #[serde(default)]
    pub first_name: Option<String>,
    /// New last name, when present
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Request body for POST /api/v1/auth_session/login.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// E-mail address
    #[serde(default)]
    pub email: String,
    /// Plaintext password
    #[serde(default)]
    pub password: String,
}
