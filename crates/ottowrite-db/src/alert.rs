//! Suspicious-activity alert repository.

use ottowrite_core::models::{AlertStatus, NewAlert, SuspiciousActivityAlert};
use ottowrite_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

const ALERT_COLUMNS: &str = "id, submission_id, partner_id, alert_type, severity, description, \
     access_log_ids, status, created_at, updated_at";

/// Repository for alerts. Rows are created by detection or manually, mutated
/// only through status updates, never deleted.
#[derive(Clone)]
pub struct AlertRepository {
    pool: PgPool,
}

impl AlertRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, alert), fields(db.table = "suspicious_activity_alerts", db.operation = "insert"))]
    pub async fn create(&self, alert: NewAlert) -> Result<SuspiciousActivityAlert, AppError> {
        let created = sqlx::query_as::<Postgres, SuspiciousActivityAlert>(&format!(
            r#"
            INSERT INTO suspicious_activity_alerts (
                submission_id, partner_id, alert_type, severity, description, access_log_ids
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ALERT_COLUMNS}
            "#
        ))
        .bind(alert.submission_id)
        .bind(alert.partner_id)
        .bind(alert.alert_type)
        .bind(alert.severity)
        .bind(&alert.description)
        .bind(&alert.access_log_ids)
        .fetch_one(&self.pool)
        .await?;

        tracing::warn!(
            alert_id = %created.id,
            submission_id = %created.submission_id,
            alert_type = ?created.alert_type,
            severity = ?created.severity,
            "Suspicious activity alert created"
        );

        Ok(created)
    }

    #[tracing::instrument(skip(self), fields(db.table = "suspicious_activity_alerts", db.operation = "select"))]
    pub async fn get(&self, id: Uuid) -> Result<Option<SuspiciousActivityAlert>, AppError> {
        let alert = sqlx::query_as::<Postgres, SuspiciousActivityAlert>(&format!(
            "SELECT {ALERT_COLUMNS} FROM suspicious_activity_alerts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(alert)
    }

    /// List alerts, optionally narrowed by status and submission, newest
    /// first.
    #[tracing::instrument(skip(self), fields(db.table = "suspicious_activity_alerts", db.operation = "select"))]
    pub async fn list(
        &self,
        status: Option<AlertStatus>,
        submission_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<SuspiciousActivityAlert>, AppError> {
        let alerts = sqlx::query_as::<Postgres, SuspiciousActivityAlert>(&format!(
            r#"
            SELECT {ALERT_COLUMNS} FROM suspicious_activity_alerts
            WHERE ($1::alert_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR submission_id = $2)
            ORDER BY created_at DESC
            LIMIT $3
            "#
        ))
        .bind(status)
        .bind(submission_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(alerts)
    }

    /// Move an alert through the review workflow.
    #[tracing::instrument(skip(self), fields(db.table = "suspicious_activity_alerts", db.operation = "update"))]
    pub async fn update_status(
        &self,
        id: Uuid,
        status: AlertStatus,
    ) -> Result<SuspiciousActivityAlert, AppError> {
        let updated = sqlx::query_as::<Postgres, SuspiciousActivityAlert>(&format!(
            r#"
            UPDATE suspicious_activity_alerts
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {ALERT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Alert {} not found", id)))?;

        Ok(updated)
    }
}
