//! Suspicious-activity alert handlers.

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use ottowrite_core::models::{
    AlertSeverity, AlertStatus, AlertType, NewAlert, SuspiciousActivityAlert,
};
use ottowrite_core::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListAlertsQuery {
    pub status: Option<AlertStatus>,
    pub submission_id: Option<Uuid>,
    /// Maximum rows returned, newest first.
    pub limit: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/v1/alerts",
    tag = "alerts",
    params(ListAlertsQuery),
    responses(
        (status = 200, description = "Alerts matching the filter", body = [SuspiciousActivityAlert])
    )
)]
pub async fn list_alerts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListAlertsQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let limit = query.limit.unwrap_or(100).clamp(1, 1000);
    let alerts = state
        .alerts
        .list(query.status, query.submission_id, limit)
        .await?;
    Ok(Json(alerts))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAlertRequest {
    pub submission_id: Uuid,
    pub partner_id: Option<Uuid>,
    pub severity: AlertSeverity,
    pub description: String,
    #[serde(default)]
    pub access_log_ids: Vec<i64>,
}

#[utoipa::path(
    post,
    path = "/api/v1/alerts",
    tag = "alerts",
    request_body = CreateAlertRequest,
    responses(
        (status = 201, description = "Alert created", body = SuspiciousActivityAlert),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn create_alert(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateAlertRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    if request.description.trim().is_empty() {
        return Err(AppError::InvalidInput("description must not be empty".to_string()).into());
    }

    // Manual is the only type a reviewer can raise by hand; the detection
    // types are reserved for the heuristics.
    let alert = state
        .alerts
        .create(NewAlert {
            submission_id: request.submission_id,
            partner_id: request.partner_id,
            alert_type: AlertType::Manual,
            severity: request.severity,
            description: request.description,
            access_log_ids: request.access_log_ids,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(alert)))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAlertStatusRequest {
    pub status: AlertStatus,
}

#[utoipa::path(
    patch,
    path = "/api/v1/alerts/{id}",
    tag = "alerts",
    params(("id" = Uuid, Path, description = "Alert ID")),
    request_body = UpdateAlertStatusRequest,
    responses(
        (status = 200, description = "Alert updated", body = SuspiciousActivityAlert),
        (status = 404, description = "Alert not found", body = ErrorResponse)
    )
)]
pub async fn update_alert_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateAlertStatusRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let alert = state.alerts.update_status(id, request.status).await?;

    tracing::info!(alert_id = %id, status = ?alert.status, "Alert status updated");

    Ok(Json(alert))
}
