// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::CurrentUser;
use crate::directory::{DirectoryError, UserDirectory};
use crate::error::ApiError;
use crate::models::{CreateUserRequest, UserPatch, UserResponse};
use crate::state::AppState;

/// List all users.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<UserResponse>> {
    let mut users: Vec<UserResponse> = state
        .users
        .all()
        .into_iter()
        .map(UserResponse::from)
        .collect();
    users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Json(users)
}

/// Get one user by id.
///
/// The literal id `me` returns the authenticated caller.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    params(("user_id" = String, Path, description = "User id, or `me`")),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 404, description = "No such user")
    )
)]
pub async fn get_user(
    Path(user_id): Path<String>,
    CurrentUser(current): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    if user_id == "me" {
        return current
            .map(|user| Json(user.into()))
            .ok_or_else(|| ApiError::not_found("Not found"));
    }

    state
        .users
        .find_by_id(&user_id)
        .map(|user| Json(user.into()))
        .ok_or_else(|| ApiError::not_found("Not found"))
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Missing or conflicting fields")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    if request.email.is_empty() {
        return Err(ApiError::bad_request("email missing"));
    }
    if request.password.is_empty() {
        return Err(ApiError::bad_request("password missing"));
    }

    let user = state
        .users
        .create(
            &request.email,
            &request.password,
            request.first_name,
            request.last_name,
        )
        .map_err(|e| match e {
            DirectoryError::AlreadyExists(_) => {
                ApiError::bad_request(format!("Can't create User: {e}"))
            }
            other => {
                tracing::warn!("Failed to create user: {other}");
                ApiError::internal("Can't create User")
            }
        })?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Update a user's name fields.
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    params(("user_id" = String, Path, description = "User id")),
    request_body = UserPatch,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 404, description = "No such user")
    )
)]
pub async fn update_user(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<UserResponse>, ApiError> {
    let updated = state.users.update(&user_id, patch).map_err(|e| {
        tracing::warn!("Failed to update user {user_id}: {e}");
        ApiError::internal("Can't update User")
    })?;

    updated
        .map(|user| Json(user.into()))
        .ok_or_else(|| ApiError::not_found("Not found"))
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "Users",
    params(("user_id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "No such user")
    )
)]
pub async fn delete_user(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if state.users.remove(&user_id) {
        Ok(Json(serde_json::json!({})))
    } else {
        Err(ApiError::not_found("Not found"))
    }
}
