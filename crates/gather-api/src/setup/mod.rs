//! Application setup and initialization
//!
//! Startup logic lives here instead of main.rs: configuration validation,
//! telemetry, the database pool and migrations, service wiring, and routes.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;

use std::sync::Arc;

use anyhow::{Context, Result};

use gather_core::AppConfig;

use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: AppConfig) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first, before anything starts.
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry();
    tracing::info!(environment = %config.environment, "Configuration loaded and validated");

    let pool = database::setup_database(&config).await?;

    let state = services::initialize_services(config, pool);

    let router = routes::setup_routes(state.clone())?;

    Ok((state, router))
}
