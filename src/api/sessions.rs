// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session login and logout endpoints.
//!
//! Login verifies credentials against the directory, issues a session
//! through the configured store, and sets the session cookie. Logout
//! destroys the session named by the request's cookie. Both answer 404
//! when the service is not running a session auth type.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::directory::UserDirectory;
use crate::error::ApiError;
use crate::models::{LoginRequest, UserResponse};
use crate::state::AppState;

/// Log in with email and password.
#[utoipa::path(
    post,
    path = "/api/v1/auth_session/login",
    tag = "Sessions",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; session cookie set", body = UserResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "No user for this email")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let Some(sessions) = &state.sessions else {
        return Err(ApiError::not_found("Not found"));
    };

    if request.email.is_empty() {
        return Err(ApiError::bad_request("email missing"));
    }
    if request.password.is_empty() {
        return Err(ApiError::bad_request("password missing"));
    }

    let found = state.users.find_by_email(&request.email);
    if found.is_empty() {
        return Err(ApiError::not_found("no user found for this email"));
    }

    for user in found {
        if !state.users.check_password(&user, &request.password) {
            continue;
        }

        let session_id = sessions.create_session(&user.id).ok_or_else(|| {
            tracing::warn!("Failed to create session for user {}", user.id);
            ApiError::internal("could not create session")
        })?;

        let cookie = format!(
            "{}={session_id}; Path=/",
            state.config.session_name
        );
        let response = (
            StatusCode::OK,
            [(header::SET_COOKIE, cookie)],
            Json(UserResponse::from(user)),
        )
            .into_response();
        return Ok(response);
    }

    Err(ApiError::unauthorized("wrong password"))
}

/// Log out the current session.
#[utoipa::path(
    delete,
    path = "/api/v1/auth_session/logout",
    tag = "Sessions",
    responses(
        (status = 200, description = "Session destroyed"),
        (status = 404, description = "No session to destroy")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(sessions) = &state.sessions else {
        return Err(ApiError::not_found("Not found"));
    };

    if sessions.destroy_session(&headers) {
        Ok(Json(serde_json::json!({})))
    } else {
        Err(ApiError::not_found("Not found"))
    }
}
