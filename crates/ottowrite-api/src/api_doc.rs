//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use ottowrite_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "OttoWrite Access Control API",
        version = "0.1.0",
        description = "Manuscript access control and leak tracking: watermarked shares, \
            signed access tokens, per-request rule evaluation, an append-only audit \
            trail with anomaly alerts, and partner verification scoring. All endpoints \
            are versioned under /api/v1/."
    ),
    paths(
        handlers::shares::create_share,
        handlers::shares::get_share,
        handlers::shares::list_shares_for_submission,
        handlers::access::validate_access,
        handlers::access::list_access_logs,
        handlers::watermark::detect_watermark,
        handlers::alerts::list_alerts,
        handlers::alerts::create_alert,
        handlers::alerts::update_alert_status,
        handlers::verification::verify_partner,
    ),
    components(schemas(
        error::ErrorResponse,
        models::Permission,
        models::AccessControlRules,
        models::AccessAction,
        models::AccessLogEntry,
        models::AlertType,
        models::AlertSeverity,
        models::AlertStatus,
        models::SuspiciousActivityAlert,
        models::ManuscriptShare,
        models::VerificationRequest,
        models::VerificationCriteria,
        models::VerificationLevel,
        models::WatermarkTechnique,
        models::ManuscriptFormat,
        models::WatermarkData,
        ottowrite_watermark::WatermarkDetection,
        ottowrite_watermark::ContentFingerprint,
        ottowrite_watermark::CharacterFrequency,
        ottowrite_verify::VerificationOutcome,
        handlers::shares::CreateShareRequest,
        handlers::shares::ShareResponse,
        handlers::access::ValidateAccessRequest,
        handlers::access::ValidateAccessResponse,
        handlers::watermark::DetectWatermarkRequest,
        handlers::watermark::DetectWatermarkResponse,
        handlers::alerts::CreateAlertRequest,
        handlers::alerts::UpdateAlertStatusRequest,
    )),
    tags(
        (name = "shares", description = "Manuscript share creation and lookup"),
        (name = "access", description = "Access validation and audit logs"),
        (name = "watermark", description = "Watermark detection on suspected leaks"),
        (name = "alerts", description = "Suspicious activity alert review"),
        (name = "verification", description = "Partner verification scoring")
    )
)]
pub struct ApiDoc;
