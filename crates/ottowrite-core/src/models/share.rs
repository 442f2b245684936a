use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{AccessControlRules, Permission};

/// A share event: one manuscript made available to one partner. Owns the
/// watermark id and the access rules the rule evaluator runs against.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ManuscriptShare {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub partner_id: Uuid,
    pub user_id: Uuid,
    pub watermark_id: String,
    pub permissions: Vec<Permission>,
    pub rules: AccessControlRules,
    pub token_expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Input for share creation.
#[derive(Debug, Clone)]
pub struct NewManuscriptShare {
    pub submission_id: Uuid,
    pub partner_id: Uuid,
    pub user_id: Uuid,
    pub watermark_id: String,
    pub permissions: Vec<Permission>,
    pub rules: AccessControlRules,
    pub token_expires_at: DateTime<Utc>,
}
