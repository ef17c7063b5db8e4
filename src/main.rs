// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! LensCraft API Server
//!
//! Serves the caption, plan and quota API for a single local user profile.

use lenscraft::{config::Config, services::AppController, store::FileStore, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting LensCraft API");

    if config.api_key.is_none() {
        tracing::warn!("API_KEY is not set; caption requests will fail");
    }

    // Open the persisted profile
    let store = Arc::new(FileStore::open(&config.data_dir)?);

    let controller = AppController::from_config(&config, store);
    let snapshot = controller.initialize()?;
    tracing::info!(
        plan = %snapshot.plan,
        logged_in = snapshot.user.is_some(),
        "Session restored"
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        controller,
    });

    // Build router
    let app = lenscraft::routes::create_router(state);

    // Start server
    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("lenscraft=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
