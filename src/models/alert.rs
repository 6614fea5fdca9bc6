use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const SEVERITIES: [&str; 3] = ["low", "medium", "high"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MetricAlert {
    pub id: Uuid,
    pub user_id: Uuid,
    pub metric_id: Option<Uuid>,
    pub message: String,
    pub severity: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
