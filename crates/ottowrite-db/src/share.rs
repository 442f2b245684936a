//! Manuscript share repository.

use chrono::{DateTime, Utc};
use ottowrite_core::models::{
    AccessControlRules, ManuscriptShare, NewManuscriptShare, Permission,
};
use ottowrite_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Flat row shape of the `manuscript_shares` table. Rules are stored as
/// individual columns rather than a JSON blob so they stay queryable.
#[derive(Debug, sqlx::FromRow)]
struct ShareRow {
    id: Uuid,
    submission_id: Uuid,
    partner_id: Uuid,
    user_id: Uuid,
    watermark_id: String,
    permissions: Vec<String>,
    allow_download: bool,
    allow_print: bool,
    allow_copy: bool,
    allow_screenshot: bool,
    max_session_minutes: Option<i64>,
    expiry_date: Option<DateTime<Utc>>,
    ip_restrictions: Vec<String>,
    device_restrictions: Vec<String>,
    token_expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl ShareRow {
    fn into_share(self) -> Result<ManuscriptShare, AppError> {
        let permissions = self
            .permissions
            .iter()
            .map(|s| s.parse::<Permission>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Corrupt permission in share {}: {}", self.id, e))?;

        Ok(ManuscriptShare {
            id: self.id,
            submission_id: self.submission_id,
            partner_id: self.partner_id,
            user_id: self.user_id,
            watermark_id: self.watermark_id,
            permissions,
            rules: AccessControlRules {
                allow_download: self.allow_download,
                allow_print: self.allow_print,
                allow_copy: self.allow_copy,
                allow_screenshot: self.allow_screenshot,
                max_session_minutes: self.max_session_minutes,
                expiry_date: self.expiry_date,
                ip_restrictions: self.ip_restrictions,
                device_restrictions: self.device_restrictions,
            },
            token_expires_at: self.token_expires_at,
            created_at: self.created_at,
        })
    }
}

const SHARE_COLUMNS: &str = "id, submission_id, partner_id, user_id, watermark_id, permissions, \
     allow_download, allow_print, allow_copy, allow_screenshot, max_session_minutes, \
     expiry_date, ip_restrictions, device_restrictions, token_expires_at, created_at";

/// Repository for manuscript shares.
#[derive(Clone)]
pub struct ShareRepository {
    pool: PgPool,
}

impl ShareRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a share. The watermark id is unique per share; a collision is a
    /// caller bug and surfaces as a database error.
    #[tracing::instrument(skip(self, share), fields(db.table = "manuscript_shares", db.operation = "insert"))]
    pub async fn create(&self, share: NewManuscriptShare) -> Result<ManuscriptShare, AppError> {
        let permissions: Vec<String> =
            share.permissions.iter().map(|p| p.to_string()).collect();

        let row = sqlx::query_as::<Postgres, ShareRow>(&format!(
            r#"
            INSERT INTO manuscript_shares (
                submission_id, partner_id, user_id, watermark_id, permissions,
                allow_download, allow_print, allow_copy, allow_screenshot,
                max_session_minutes, expiry_date, ip_restrictions,
                device_restrictions, token_expires_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {SHARE_COLUMNS}
            "#
        ))
        .bind(share.submission_id)
        .bind(share.partner_id)
        .bind(share.user_id)
        .bind(&share.watermark_id)
        .bind(&permissions)
        .bind(share.rules.allow_download)
        .bind(share.rules.allow_print)
        .bind(share.rules.allow_copy)
        .bind(share.rules.allow_screenshot)
        .bind(share.rules.max_session_minutes)
        .bind(share.rules.expiry_date)
        .bind(&share.rules.ip_restrictions)
        .bind(&share.rules.device_restrictions)
        .bind(share.token_expires_at)
        .fetch_one(&self.pool)
        .await?;

        row.into_share()
    }

    #[tracing::instrument(skip(self), fields(db.table = "manuscript_shares", db.operation = "select"))]
    pub async fn get(&self, id: Uuid) -> Result<Option<ManuscriptShare>, AppError> {
        let row = sqlx::query_as::<Postgres, ShareRow>(&format!(
            "SELECT {SHARE_COLUMNS} FROM manuscript_shares WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ShareRow::into_share).transpose()
    }

    /// Look a share up by its watermark id, the key leak investigation starts
    /// from.
    #[tracing::instrument(skip(self), fields(db.table = "manuscript_shares", db.operation = "select"))]
    pub async fn get_by_watermark(
        &self,
        watermark_id: &str,
    ) -> Result<Option<ManuscriptShare>, AppError> {
        let row = sqlx::query_as::<Postgres, ShareRow>(&format!(
            "SELECT {SHARE_COLUMNS} FROM manuscript_shares WHERE watermark_id = $1"
        ))
        .bind(watermark_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ShareRow::into_share).transpose()
    }

    #[tracing::instrument(skip(self), fields(db.table = "manuscript_shares", db.operation = "select"))]
    pub async fn list_for_submission(
        &self,
        submission_id: Uuid,
    ) -> Result<Vec<ManuscriptShare>, AppError> {
        let rows = sqlx::query_as::<Postgres, ShareRow>(&format!(
            "SELECT {SHARE_COLUMNS} FROM manuscript_shares \
             WHERE submission_id = $1 ORDER BY created_at DESC"
        ))
        .bind(submission_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ShareRow::into_share).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(permissions: Vec<String>) -> ShareRow {
        ShareRow {
            id: Uuid::new_v4(),
            submission_id: Uuid::new_v4(),
            partner_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            watermark_id: "ab".repeat(16),
            permissions,
            allow_download: true,
            allow_print: false,
            allow_copy: false,
            allow_screenshot: false,
            max_session_minutes: Some(90),
            expiry_date: None,
            ip_restrictions: vec!["10.0.0.1".to_string()],
            device_restrictions: Vec::new(),
            token_expires_at: Utc::now(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_conversion_parses_permissions() {
        let share = row(vec!["view_full".to_string(), "download".to_string()])
            .into_share()
            .unwrap();
        assert_eq!(
            share.permissions,
            vec![Permission::ViewFull, Permission::Download]
        );
        assert!(share.rules.allow_download);
        assert_eq!(share.rules.ip_restrictions, vec!["10.0.0.1".to_string()]);
    }

    #[test]
    fn test_row_conversion_rejects_unknown_permission() {
        assert!(row(vec!["teleport".to_string()]).into_share().is_err());
    }
}
