// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use gatehouse::api::router;
use gatehouse::config::{Config, LOG_FORMAT_ENV};
use gatehouse::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = Config::from_env();
    tracing::info!(
        "Starting gatehouse with auth_type={} session_name={}",
        config.auth_type,
        config.session_name
    );

    let host = config.host.clone();
    let port = config.port;

    let state = AppState::build(config).expect("Failed to initialize application state");
    let app = router(state);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");

    tracing::info!("Gatehouse listening on http://{addr} (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

/// Install the tracing subscriber per RUST_LOG / LOG_FORMAT.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|format| format == "json")
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
    }
}
