//! Route configuration and setup.

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::middleware::security_headers::{
    security_headers_middleware, SecurityHeadersConfig,
};
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, patch, post},
    Json, Router,
};
use ottowrite_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Assemble the application router: API routes, health probes, OpenAPI spec,
/// then the shared layers.
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;
    let security_config = Arc::new(SecurityHeadersConfig::new(config.is_production()));

    let api_routes = Router::new()
        .route("/api/v1/shares", post(handlers::shares::create_share))
        .route("/api/v1/shares/{id}", get(handlers::shares::get_share))
        .route(
            "/api/v1/submissions/{id}/shares",
            get(handlers::shares::list_shares_for_submission),
        )
        .route(
            "/api/v1/submissions/{id}/access-logs",
            get(handlers::access::list_access_logs),
        )
        .route(
            "/api/v1/access/validate",
            post(handlers::access::validate_access),
        )
        .route(
            "/api/v1/watermark/detect",
            post(handlers::watermark::detect_watermark),
        )
        .route("/api/v1/alerts", get(handlers::alerts::list_alerts))
        .route("/api/v1/alerts", post(handlers::alerts::create_alert))
        .route(
            "/api/v1/alerts/{id}",
            patch(handlers::alerts::update_alert_status),
        )
        .route(
            "/api/v1/verification",
            post(handlers::verification::verify_partner),
        );

    let health_routes = Router::new()
        .route("/health", get(handlers::health::liveness_check))
        .route("/health/ready", get(handlers::health::readiness_check));

    let router = api_routes
        .merge(health_routes)
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .layer(axum::middleware::from_fn_with_state(
            security_config,
            security_headers_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(router)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        // Wildcard is refused in production by config validation.
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PATCH])
            .allow_headers(Any)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins.iter().map(|o| o.parse()).collect();
        CorsLayer::new()
            .allow_origin(origins.map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?)
            .allow_methods([Method::GET, Method::POST, Method::PATCH])
            .allow_headers(Any)
    };
    Ok(cors)
}
