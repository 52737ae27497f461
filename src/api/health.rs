// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Index endpoints: service status, directory stats, and the error-path
//! probes. All of these except `/stats` are on the exclusion list and
//! reachable without credentials.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::state::AppState;

/// Response for GET /api/v1/status
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    /// Always "OK" while the service is up
    pub status: String,
}

/// Response for GET /api/v1/stats
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    /// Number of users in the directory
    pub users: usize,
}

/// Service status.
#[utoipa::path(
    get,
    path = "/api/v1/status",
    tag = "Index",
    responses(
        (status = 200, description = "Service is up", body = StatusResponse)
    )
)]
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "OK".to_string(),
    })
}

/// Object counts per type.
#[utoipa::path(
    get,
    path = "/api/v1/stats",
    tag = "Index",
    responses(
        (status = 200, description = "Directory statistics", body = StatsResponse)
    )
)]
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        users: state.users.count(),
    })
}

/// Probe that always answers 401.
#[utoipa::path(
    get,
    path = "/api/v1/unauthorized",
    tag = "Index",
    responses(
        (status = 401, description = "Always unauthorized")
    )
)]
pub async fn unauthorized() -> ApiError {
    ApiError::unauthorized("Unauthorized")
}

/// Probe that always answers 403.
#[utoipa::path(
    get,
    path = "/api/v1/forbidden",
    tag = "Index",
    responses(
        (status = 403, description = "Always forbidden")
    )
)]
pub async fn forbidden() -> ApiError {
    ApiError::forbidden("Forbidden")
}
