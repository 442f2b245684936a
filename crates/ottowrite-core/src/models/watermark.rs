use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Manuscript container format. The text techniques operate on extracted plain
/// text; for binary containers a format-specific extractor must supply the text
/// first, with fingerprinting as the fallback signal.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ManuscriptFormat {
    #[default]
    Text,
    Pdf,
    Docx,
}

/// One of the redundant encodings of the watermark identifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum WatermarkTechnique {
    ZeroWidth,
    Homoglyph,
    Whitespace,
}

/// Watermark record created once per (submission, partner) share event.
/// The id is derived from a SHA-256 hash over the share identifiers, the
/// current time, and CSPRNG bytes; it is never reproducible from public inputs
/// and must be stored server-side to support later leak detection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct WatermarkData {
    /// 32 hex characters.
    pub watermark_id: String,
    pub partner_id: Uuid,
    pub submission_id: Uuid,
    pub user_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub format: ManuscriptFormat,
    pub techniques: Vec<WatermarkTechnique>,
}
