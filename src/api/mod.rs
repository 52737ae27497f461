// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::gate::require_authentication,
    models::{CreateUserRequest, LoginRequest, UserPatch, UserResponse},
    state::AppState,
};

pub mod health;
pub mod sessions;
pub mod users;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/status", get(health::status))
        .route("/stats", get(health::stats))
        .route("/unauthorized", get(health::unauthorized))
        .route("/forbidden", get(health::forbidden))
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{user_id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/auth_session/login", post(sessions::login))
        .route("/auth_session/logout", delete(sessions::logout))
        .with_state(state.clone());

    Router::new()
        .nest("/api/v1", v1_routes)
        .layer(axum::middleware::from_fn_with_state(
            state,
            require_authentication,
        ))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::status,
        health::stats,
        health::unauthorized,
        health::forbidden,
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        sessions::login,
        sessions::logout
    ),
    components(
        schemas(
            UserResponse,
            CreateUserRequest,
            UserPatch,
            LoginRequest,
            health::StatusResponse,
            health::StatsResponse
        )
    ),
    tags(
        (name = "Index", description = "Service status and error probes"),
        (name = "Users", description = "User management"),
        (name = "Sessions", description = "Session login and logout")
    )
)]
struct ApiDoc;
