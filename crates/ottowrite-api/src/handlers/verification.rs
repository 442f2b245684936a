//! Partner verification handlers.

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use ottowrite_core::models::VerificationRequest;
use ottowrite_verify::VerificationOutcome;
use std::sync::Arc;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/v1/verification",
    tag = "verification",
    request_body = VerificationRequest,
    responses(
        (status = 200, description = "Verification outcome", body = VerificationOutcome),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn verify_partner(
    State(_state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<VerificationRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;

    let outcome = ottowrite_verify::evaluate(&request);

    Ok(Json(outcome))
}
