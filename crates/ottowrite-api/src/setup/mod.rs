//! Application setup and initialization.
//!
//! All startup logic lives here rather than in main.rs so the pieces stay
//! individually testable.

pub mod database;
pub mod routes;
pub mod server;
pub mod telemetry;

use crate::state::AppState;
use anyhow::{Context, Result};
use ottowrite_access::AccessTokenService;
use ottowrite_core::Config;
use std::sync::Arc;

/// Initialize the entire application: telemetry, database, state, routes.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration before touching the network.
    config
        .validate()
        .context("Configuration validation failed")?;

    telemetry::init_tracing(config.is_production())?;
    tracing::info!(
        environment = %config.environment,
        "Configuration loaded and validated"
    );

    let pool = database::setup_database(&config).await?;

    let token_service = AccessTokenService::new(&config.token_secret)
        .context("Failed to construct token service")?;

    let state = Arc::new(AppState::new(config.clone(), pool, token_service));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
