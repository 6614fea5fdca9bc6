use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Metric {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub formula: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A timestamped observation of one metric. Read-only from the analytics
/// and export paths.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MetricSample {
    pub id: Uuid,
    pub metric_id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub value: f64,
}
