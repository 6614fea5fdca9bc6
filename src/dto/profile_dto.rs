use serde::Serialize;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RecentResult {
    pub test_id: uuid::Uuid,
    pub test_title: String,
    pub score: i32,
    pub max_score: i32,
    pub passed: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressResponse {
    pub total_points: i32,
    pub completed_tasks: i32,
    pub total_tasks: i32,
    pub success_rate: f64,
    pub level: i32,
    pub next_level_points: i32,
    pub recent_results: Vec<RecentResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub tests_taken: i64,
    pub tests_passed: i64,
    pub total_points: i32,
    pub unread_alerts: i64,
    pub metrics_tracked: i64,
}
