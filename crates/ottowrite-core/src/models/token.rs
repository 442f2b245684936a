use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Capability granted by an access token. Checks are pure set membership;
/// there is no permission hierarchy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    View,
    ViewQuery,
    ViewSynopsis,
    ViewSample,
    ViewFull,
    Download,
    Print,
    Copy,
}

impl Display for Permission {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let s = match self {
            Permission::View => "view",
            Permission::ViewQuery => "view_query",
            Permission::ViewSynopsis => "view_synopsis",
            Permission::ViewSample => "view_sample",
            Permission::ViewFull => "view_full",
            Permission::Download => "download",
            Permission::Print => "print",
            Permission::Copy => "copy",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(Permission::View),
            "view_query" => Ok(Permission::ViewQuery),
            "view_synopsis" => Ok(Permission::ViewSynopsis),
            "view_sample" => Ok(Permission::ViewSample),
            "view_full" => Ok(Permission::ViewFull),
            "download" => Ok(Permission::Download),
            "print" => Ok(Permission::Print),
            "copy" => Ok(Permission::Copy),
            other => Err(format!("Unknown permission: {}", other)),
        }
    }
}

/// Claims carried by a signed access token. Immutable once signed; the HMAC
/// signature is the sole source of integrity. Granting broader access means
/// issuing a new token, never mutating an existing one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct AccessTokenPayload {
    pub submission_id: Uuid,
    pub partner_id: Uuid,
    pub user_id: Uuid,
    pub watermark_id: String,
    pub permissions: Vec<Permission>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AccessTokenPayload {
    /// Subject string for generic JWT tooling: `submission:<id>:partner:<id>`.
    pub fn subject(&self) -> String {
        format!(
            "submission:{}:partner:{}",
            self.submission_id, self.partner_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_display_round_trip() {
        for p in [
            Permission::View,
            Permission::ViewQuery,
            Permission::ViewSynopsis,
            Permission::ViewSample,
            Permission::ViewFull,
            Permission::Download,
            Permission::Print,
            Permission::Copy,
        ] {
            assert_eq!(p.to_string().parse::<Permission>().unwrap(), p);
        }
    }

    #[test]
    fn test_permission_unknown_string_rejected() {
        assert!("share".parse::<Permission>().is_err());
    }

    #[test]
    fn test_subject_format() {
        let submission_id = Uuid::new_v4();
        let partner_id = Uuid::new_v4();
        let payload = AccessTokenPayload {
            submission_id,
            partner_id,
            user_id: Uuid::new_v4(),
            watermark_id: "ab".repeat(16),
            permissions: vec![Permission::View],
            created_at: Utc::now(),
            expires_at: Utc::now(),
        };
        assert_eq!(
            payload.subject(),
            format!("submission:{}:partner:{}", submission_id, partner_id)
        );
    }
}
