use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::alert_dto::CreateAlertRequest;
use crate::error::{Error, Result};
use crate::models::alert::{MetricAlert, SEVERITIES};

#[derive(Clone)]
pub struct AlertService {
    pool: PgPool,
}

impl AlertService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The caller's unread alerts, newest first, capped at 10.
    pub async fn unread(&self, user_id: Uuid) -> Result<Vec<MetricAlert>> {
        let alerts = sqlx::query_as::<_, MetricAlert>(
            r#"
            SELECT * FROM metric_alerts
            WHERE user_id = $1 AND is_read = FALSE
            ORDER BY created_at DESC
            LIMIT 10
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(alerts)
    }

    pub async fn create(&self, user_id: Uuid, req: &CreateAlertRequest) -> Result<MetricAlert> {
        if !SEVERITIES.contains(&req.severity.as_str()) {
            return Err(Error::BadRequest(format!(
                "Invalid severity: {}",
                req.severity
            )));
        }

        if let Some(metric_id) = req.metric_id {
            let metric_exists: bool =
                sqlx::query_scalar(r#"SELECT EXISTS(SELECT 1 FROM metrics WHERE id = $1)"#)
                    .bind(metric_id)
                    .fetch_one(&self.pool)
                    .await?;
            if !metric_exists {
                return Err(Error::NotFound("Metric not found".to_string()));
            }
        }

        let alert = sqlx::query_as::<_, MetricAlert>(
            r#"
            INSERT INTO metric_alerts (user_id, metric_id, message, severity)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(req.metric_id)
        .bind(&req.message)
        .bind(&req.severity)
        .fetch_one(&self.pool)
        .await?;

        Ok(alert)
    }

    /// Marks one of the caller's alerts as read. Alerts belonging to another
    /// user are indistinguishable from unknown ids.
    pub async fn mark_read(&self, user_id: Uuid, alert_id: Uuid) -> Result<MetricAlert> {
        let alert = sqlx::query_as::<_, MetricAlert>(
            r#"
            UPDATE metric_alerts
            SET is_read = TRUE
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(alert_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Notification not found".to_string()))?;

        Ok(alert)
    }
}
