// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! LifeWheel API Server
//!
//! Serves the Wheel of Life, weekly planner, and habit tracker tools with
//! per-user data in Firestore and sessions delegated to the Firebase
//! Identity Toolkit.

use lifewheel::{
    config::Config, db::FirestoreDb, services::IdentityClient, services::SessionStore, AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting LifeWheel API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Identity Toolkit client for credential checks
    let identity = IdentityClient::new(&config).expect("Failed to initialize identity client");
    tracing::info!("Identity client initialized");

    // In-memory planner sessions, one per signed-in user within this instance.
    // Unsaved sessions are lost on restart; saving is always explicit.
    let sessions = SessionStore::new();

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        identity,
        sessions,
    });

    // Build router
    let app = lifewheel::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lifewheel=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
