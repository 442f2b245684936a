//! Access validation and audit log handlers.

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use crate::utils::ip_extraction::extract_client_ip;
use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Utc};
use ottowrite_access::{rules, TokenError};
use ottowrite_audit::{device_fingerprint, evaluate_session, AnomalySignal};
use ottowrite_core::models::{
    AccessAction, AccessDecision, AccessLogEntry, AccessRequestContext, AlertSeverity, AlertType,
    ManuscriptShare, NewAccessLogEntry, NewAlert,
};
use ottowrite_core::AppError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// How far back the anomaly heuristics look.
const ANOMALY_WINDOW_HOURS: i64 = 24;
/// Cap on evidence rows attached to one alert.
const ALERT_EVIDENCE_LIMIT: i64 = 100;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateAccessRequest {
    pub token: String,
    pub action: AccessAction,
    /// Seconds the session lasted; only meaningful with `session_end`.
    pub session_duration_secs: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidateAccessResponse {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Severity policy for alerts raised from detection signals.
fn alert_severity(alert_type: AlertType) -> AlertSeverity {
    match alert_type {
        AlertType::SuspiciousUserAgent => AlertSeverity::Medium,
        AlertType::ExcessiveDuration => AlertSeverity::Low,
        AlertType::RapidAccess => AlertSeverity::High,
        AlertType::ExcessiveDownloads => AlertSeverity::High,
        AlertType::ExcessiveCopies => AlertSeverity::Medium,
        AlertType::Manual => AlertSeverity::Medium,
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/access/validate",
    tag = "access",
    request_body = ValidateAccessRequest,
    responses(
        (status = 200, description = "Decision for the requested action", body = ValidateAccessResponse),
        (status = 404, description = "Share no longer exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn validate_access(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<ValidateAccessRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    // A bad token is a routine denial, not an error: without a verified
    // payload there is no share to attribute the attempt to.
    let payload = match state.token_service.verify(&request.token) {
        Ok(payload) => payload,
        Err(TokenError::Expired) => {
            return Ok(Json(ValidateAccessResponse {
                allowed: false,
                reason: Some(TokenError::Expired.to_string()),
            }));
        }
        Err(TokenError::Invalid(_)) => {
            return Ok(Json(ValidateAccessResponse {
                allowed: false,
                reason: Some("Invalid access token".to_string()),
            }));
        }
    };

    let share = state
        .shares
        .get_by_watermark(&payload.watermark_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Share not found for token".to_string()))?;

    let ip_address = extract_client_ip(&headers, Some(&addr), state.config.trusted_proxy_count);
    let fingerprint = device_fingerprint(&headers);
    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let ctx = AccessRequestContext::now(ip_address.clone(), Some(fingerprint.clone()))
        .with_session_duration(request.session_duration_secs);

    let mut decision = rules::evaluate(&share.rules, &ctx);
    if decision.allowed {
        if let Some(missing) = rules::unauthorized_action(request.action, &share.permissions) {
            decision = AccessDecision::deny(format!("Permission not granted: {}", missing));
        } else if !rules::action_allowed_by_rules(&share.rules, request.action) {
            decision = AccessDecision::deny(rules::REASON_ACTION_DISABLED);
        }
    }

    let entry = state
        .access_logs
        .log_access(NewAccessLogEntry {
            submission_id: share.submission_id,
            partner_id: share.partner_id,
            action: request.action,
            granted: decision.allowed,
            denial_reason: decision.reason.clone(),
            ip_address,
            user_agent,
            device_fingerprint: Some(fingerprint),
            session_duration_secs: request.session_duration_secs,
        })
        .await?;

    scan_for_anomalies(&state, &share, &entry).await;

    Ok(Json(ValidateAccessResponse {
        allowed: decision.allowed,
        reason: decision.reason,
    }))
}

/// Run the anomaly heuristics over the partner's recent activity and raise
/// alerts for every signal. Detection failures are logged, never surfaced:
/// the access decision stands regardless.
async fn scan_for_anomalies(state: &AppState, share: &ManuscriptShare, entry: &AccessLogEntry) {
    let since = Utc::now() - Duration::hours(ANOMALY_WINDOW_HOURS);

    let stats = match state
        .access_logs
        .session_stats(share.submission_id, share.partner_id, since)
        .await
    {
        Ok(stats) => stats,
        Err(e) => {
            tracing::error!(error = %e, access_log_id = entry.id, "Failed to aggregate session stats");
            return;
        }
    };

    let signals = evaluate_session(&stats);
    if signals.is_empty() {
        return;
    }

    let log_ids = state
        .access_logs
        .recent_log_ids(
            share.submission_id,
            share.partner_id,
            since,
            ALERT_EVIDENCE_LIMIT,
        )
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to collect alert evidence ids");
            vec![entry.id]
        });

    for AnomalySignal {
        alert_type,
        description,
    } in signals
    {
        let result = state
            .alerts
            .create(NewAlert {
                submission_id: share.submission_id,
                partner_id: Some(share.partner_id),
                alert_type,
                severity: alert_severity(alert_type),
                description,
                access_log_ids: log_ids.clone(),
            })
            .await;

        if let Err(e) = result {
            tracing::error!(error = %e, ?alert_type, "Failed to create alert");
        }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct AccessLogQuery {
    /// Maximum rows returned, newest first.
    pub limit: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/v1/submissions/{id}/access-logs",
    tag = "access",
    params(
        ("id" = Uuid, Path, description = "Submission ID"),
        AccessLogQuery
    ),
    responses(
        (status = 200, description = "Access log entries", body = [AccessLogEntry])
    )
)]
pub async fn list_access_logs(
    State(state): State<Arc<AppState>>,
    Path(submission_id): Path<Uuid>,
    Query(query): Query<AccessLogQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let limit = query.limit.unwrap_or(100).clamp(1, 1000);
    let entries = state
        .access_logs
        .list_for_submission(submission_id, limit)
        .await?;
    Ok(Json(entries))
}
