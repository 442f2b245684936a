//! Append-only access log repository.

use chrono::{DateTime, Utc};
use ottowrite_audit::SessionStats;
use ottowrite_core::models::{AccessLogEntry, NewAccessLogEntry};
use ottowrite_core::AppError;
use sqlx::{PgPool, Postgres, Row};
use uuid::Uuid;

/// Repository for the access log. Insert and read only; there is no update or
/// delete path by design of the table.
#[derive(Clone)]
pub struct AccessLogRepository {
    pool: PgPool,
}

impl AccessLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append one access attempt, granted or denied.
    #[tracing::instrument(skip(self, entry), fields(db.table = "access_logs", db.operation = "insert"))]
    pub async fn log_access(&self, entry: NewAccessLogEntry) -> Result<AccessLogEntry, AppError> {
        let logged = sqlx::query_as::<Postgres, AccessLogEntry>(
            r#"
            INSERT INTO access_logs (
                submission_id, partner_id, action, granted, denial_reason,
                ip_address, user_agent, device_fingerprint, session_duration_secs
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, submission_id, partner_id, action, granted, denial_reason,
                      ip_address, user_agent, device_fingerprint, session_duration_secs,
                      created_at
            "#,
        )
        .bind(entry.submission_id)
        .bind(entry.partner_id)
        .bind(entry.action)
        .bind(entry.granted)
        .bind(&entry.denial_reason)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .bind(&entry.device_fingerprint)
        .bind(entry.session_duration_secs)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(
                error = ?e,
                submission_id = %entry.submission_id,
                partner_id = %entry.partner_id,
                "Failed to append access log entry"
            );
            e
        })?;

        Ok(logged)
    }

    #[tracing::instrument(skip(self), fields(db.table = "access_logs", db.operation = "select"))]
    pub async fn list_for_submission(
        &self,
        submission_id: Uuid,
        limit: i64,
    ) -> Result<Vec<AccessLogEntry>, AppError> {
        let rows = sqlx::query_as::<Postgres, AccessLogEntry>(
            r#"
            SELECT id, submission_id, partner_id, action, granted, denial_reason,
                   ip_address, user_agent, device_fingerprint, session_duration_secs,
                   created_at
            FROM access_logs
            WHERE submission_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(submission_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Aggregate one partner's activity on one submission since `since`, in
    /// the shape the anomaly heuristics consume.
    #[tracing::instrument(skip(self), fields(db.table = "access_logs", db.operation = "aggregate"))]
    pub async fn session_stats(
        &self,
        submission_id: Uuid,
        partner_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<SessionStats, AppError> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total_actions,
                COUNT(*) FILTER (WHERE action = 'download_attempted') AS download_attempts,
                COUNT(*) FILTER (WHERE action = 'copy_attempted') AS copy_attempts,
                MAX(session_duration_secs) AS max_session_secs,
                MIN(created_at) AS first_action_at,
                MAX(created_at) AS last_action_at,
                COALESCE(ARRAY_AGG(DISTINCT user_agent)
                    FILTER (WHERE user_agent IS NOT NULL), '{}') AS user_agents
            FROM access_logs
            WHERE submission_id = $1 AND partner_id = $2 AND created_at >= $3
            "#,
        )
        .bind(submission_id)
        .bind(partner_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(SessionStats {
            total_actions: row.try_get("total_actions")?,
            download_attempts: row.try_get("download_attempts")?,
            copy_attempts: row.try_get("copy_attempts")?,
            max_session_secs: row.try_get("max_session_secs")?,
            first_action_at: row.try_get("first_action_at")?,
            last_action_at: row.try_get("last_action_at")?,
            user_agents: row.try_get("user_agents")?,
        })
    }

    /// Ids of the rows behind a set of session stats, newest first. Alerts
    /// reference these so a reviewer can replay the evidence.
    #[tracing::instrument(skip(self), fields(db.table = "access_logs", db.operation = "select"))]
    pub async fn recent_log_ids(
        &self,
        submission_id: Uuid,
        partner_id: Uuid,
        since: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<i64>, AppError> {
        let ids = sqlx::query_scalar::<Postgres, i64>(
            r#"
            SELECT id FROM access_logs
            WHERE submission_id = $1 AND partner_id = $2 AND created_at >= $3
            ORDER BY created_at DESC
            LIMIT $4
            "#,
        )
        .bind(submission_id)
        .bind(partner_id)
        .bind(since)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}
