//! Manuscript share handlers.

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use ottowrite_access::TokenGrant;
use ottowrite_core::models::{
    AccessControlRules, ManuscriptFormat, ManuscriptShare, NewManuscriptShare, Permission,
    WatermarkData,
};
use ottowrite_core::AppError;
use ottowrite_watermark::{applied_techniques, apply_watermark, generate_watermark_id};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateShareRequest {
    pub submission_id: Uuid,
    pub partner_id: Uuid,
    pub user_id: Uuid,
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub rules: AccessControlRules,
    #[serde(default)]
    pub manuscript_format: ManuscriptFormat,
    /// Plain text to watermark inline; the marked copy is returned in the
    /// response. Only valid for the text format.
    pub manuscript_text: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShareResponse {
    pub share: ManuscriptShare,
    pub watermark: WatermarkData,
    /// Signed access token for the partner. Shown once at creation.
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermarked_text: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/shares",
    tag = "shares",
    request_body = CreateShareRequest,
    responses(
        (status = 201, description = "Share created", body = ShareResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_share(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateShareRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    if request.permissions.is_empty() {
        return Err(AppError::InvalidInput(
            "A share must grant at least one permission".to_string(),
        )
        .into());
    }
    if request.manuscript_text.is_some() && request.manuscript_format != ManuscriptFormat::Text {
        return Err(AppError::InvalidInput(
            "Inline watermarking requires plain text; extract binary formats first".to_string(),
        )
        .into());
    }

    let watermark_id =
        generate_watermark_id(request.submission_id, request.partner_id, request.user_id);

    let issued = state.token_service.issue(
        TokenGrant {
            submission_id: request.submission_id,
            partner_id: request.partner_id,
            user_id: request.user_id,
            watermark_id: watermark_id.clone(),
            permissions: request.permissions.clone(),
        },
        state.config.token_expiry_days,
    )?;

    let share = state
        .shares
        .create(NewManuscriptShare {
            submission_id: request.submission_id,
            partner_id: request.partner_id,
            user_id: request.user_id,
            watermark_id: watermark_id.clone(),
            permissions: request.permissions,
            rules: request.rules,
            token_expires_at: issued.payload.expires_at,
        })
        .await?;

    let watermarked_text = request
        .manuscript_text
        .as_deref()
        .map(|text| apply_watermark(text, &watermark_id));

    let watermark = WatermarkData {
        watermark_id,
        partner_id: share.partner_id,
        submission_id: share.submission_id,
        user_id: share.user_id,
        timestamp: Utc::now(),
        format: request.manuscript_format,
        techniques: applied_techniques(),
    };

    tracing::info!(
        share_id = %share.id,
        submission_id = %share.submission_id,
        partner_id = %share.partner_id,
        "Manuscript share created"
    );

    Ok((
        StatusCode::CREATED,
        Json(ShareResponse {
            share,
            watermark,
            access_token: issued.token,
            watermarked_text,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/shares/{id}",
    tag = "shares",
    params(("id" = Uuid, Path, description = "Share ID")),
    responses(
        (status = 200, description = "Share found", body = ManuscriptShare),
        (status = 404, description = "Share not found", body = ErrorResponse)
    )
)]
pub async fn get_share(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let share = state
        .shares
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Share not found".to_string()))?;

    Ok(Json(share))
}

#[utoipa::path(
    get,
    path = "/api/v1/submissions/{id}/shares",
    tag = "shares",
    params(("id" = Uuid, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Shares for the submission", body = [ManuscriptShare])
    )
)]
pub async fn list_shares_for_submission(
    State(state): State<Arc<AppState>>,
    Path(submission_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let shares = state.shares.list_for_submission(submission_id).await?;
    Ok(Json(shares))
}
