use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationItem {
    pub metric: String,
    pub description: String,
    pub reason: String,
    pub impact: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    pub metric_id: uuid::Uuid,
    pub name: String,
    pub category: String,
    pub current: f64,
    pub previous: f64,
    pub change_percent: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateRange {
    pub start: chrono::DateTime<chrono::Utc>,
    pub end: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportRequest {
    pub metric_ids: Vec<uuid::Uuid>,
    pub format: String,
    pub date_range: DateRange,
}
