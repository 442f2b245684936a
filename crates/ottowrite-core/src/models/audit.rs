use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

/// Action recorded for one access attempt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "access_action", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum AccessAction {
    ViewQuery,
    ViewSynopsis,
    ViewSample,
    ViewFull,
    DownloadAttempted,
    PrintAttempted,
    CopyAttempted,
    ShareAttempted,
    SessionStart,
    SessionEnd,
}

impl AccessAction {
    /// Whether this action only views content. View actions are authorized by
    /// the token itself, not the per-action permission check.
    pub fn is_view(&self) -> bool {
        matches!(
            self,
            AccessAction::ViewQuery
                | AccessAction::ViewSynopsis
                | AccessAction::ViewSample
                | AccessAction::ViewFull
                | AccessAction::SessionStart
                | AccessAction::SessionEnd
        )
    }
}

impl Display for AccessAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = match self {
            AccessAction::ViewQuery => "view_query",
            AccessAction::ViewSynopsis => "view_synopsis",
            AccessAction::ViewSample => "view_sample",
            AccessAction::ViewFull => "view_full",
            AccessAction::DownloadAttempted => "download_attempted",
            AccessAction::PrintAttempted => "print_attempted",
            AccessAction::CopyAttempted => "copy_attempted",
            AccessAction::ShareAttempted => "share_attempted",
            AccessAction::SessionStart => "session_start",
            AccessAction::SessionEnd => "session_end",
        };
        write!(f, "{}", s)
    }
}

/// One row per access attempt. Append-only: rows are never updated or deleted,
/// which is what makes the anomaly heuristics trustworthy.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct AccessLogEntry {
    pub id: i64,
    pub submission_id: Uuid,
    pub partner_id: Uuid,
    pub action: AccessAction,
    pub granted: bool,
    pub denial_reason: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub device_fingerprint: Option<String>,
    pub session_duration_secs: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Input for an access-log append; id and timestamp are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewAccessLogEntry {
    pub submission_id: Uuid,
    pub partner_id: Uuid,
    pub action: AccessAction,
    pub granted: bool,
    pub denial_reason: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub device_fingerprint: Option<String>,
    pub session_duration_secs: Option<i64>,
}

/// Category of a suspicious-activity alert.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "alert_type", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    SuspiciousUserAgent,
    ExcessiveDuration,
    RapidAccess,
    ExcessiveDownloads,
    ExcessiveCopies,
    Manual,
}

/// Severity tier, assigned by the policy layer, not the detection rules.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "alert_severity", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
    Critical,
}

/// Review-workflow status: new -> investigating -> confirmed/false_positive ->
/// resolved. Terminal states are a workflow convention; the store does not
/// prevent re-opening.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "alert_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    New,
    Investigating,
    Confirmed,
    FalsePositive,
    Resolved,
}

/// Derived record referencing one or more access-log rows. Created by the
/// detection rules or manually by a reviewer; mutated only through status
/// updates; never deleted.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SuspiciousActivityAlert {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub partner_id: Option<Uuid>,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub description: String,
    pub access_log_ids: Vec<i64>,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for alert creation; status starts at `New`.
#[derive(Debug, Clone)]
pub struct NewAlert {
    pub submission_id: Uuid,
    pub partner_id: Option<Uuid>,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub description: String,
    pub access_log_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_actions_classified() {
        assert!(AccessAction::ViewFull.is_view());
        assert!(AccessAction::SessionStart.is_view());
        assert!(!AccessAction::DownloadAttempted.is_view());
        assert!(!AccessAction::ShareAttempted.is_view());
    }

    #[test]
    fn test_alert_status_serde_names() {
        assert_eq!(
            serde_json::to_string(&AlertStatus::FalsePositive).unwrap(),
            "\"false_positive\""
        );
        assert_eq!(
            serde_json::from_str::<AlertStatus>("\"investigating\"").unwrap(),
            AlertStatus::Investigating
        );
    }

    #[test]
    fn test_access_action_display_matches_serde() {
        let json = serde_json::to_string(&AccessAction::DownloadAttempted).unwrap();
        assert_eq!(json, format!("\"{}\"", AccessAction::DownloadAttempted));
    }
}
