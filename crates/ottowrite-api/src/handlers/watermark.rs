//! Watermark detection handlers.

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use ottowrite_core::models::ManuscriptShare;
use ottowrite_core::AppError;
use ottowrite_watermark::{fingerprint, ContentFingerprint, WatermarkDetection};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct DetectWatermarkRequest {
    /// Suspected leaked text, already reduced to plain text.
    pub text: String,
    /// Candidate watermark id to test against.
    pub watermark_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DetectWatermarkResponse {
    pub detection: WatermarkDetection,
    pub content_fingerprint: ContentFingerprint,
    /// The share the candidate id belongs to, when the id matched and the
    /// share still exists. This is who the leak traces back to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share: Option<ManuscriptShare>,
}

#[utoipa::path(
    post,
    path = "/api/v1/watermark/detect",
    tag = "watermark",
    request_body = DetectWatermarkRequest,
    responses(
        (status = 200, description = "Detection result", body = DetectWatermarkResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn detect_watermark(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<DetectWatermarkRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    if request.watermark_id.is_empty() {
        return Err(AppError::InvalidInput("watermark_id must not be empty".to_string()).into());
    }
    if request.text.is_empty() {
        return Err(AppError::InvalidInput("text must not be empty".to_string()).into());
    }

    let detection = ottowrite_watermark::detect_watermark(&request.text, &request.watermark_id);
    let content_fingerprint = fingerprint(&request.text);

    let share = if detection.detected {
        state.shares.get_by_watermark(&request.watermark_id).await?
    } else {
        None
    };

    tracing::info!(
        watermark_id = %request.watermark_id,
        detected = detection.detected,
        confidence = detection.confidence,
        "Watermark detection run"
    );

    Ok(Json(DetectWatermarkResponse {
        detection,
        content_fingerprint,
        share,
    }))
}
