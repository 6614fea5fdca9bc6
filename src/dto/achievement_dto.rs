use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AchievementView {
    pub id: uuid::Uuid,
    pub title: String,
    pub description: Option<String>,
    pub icon: String,
    pub criteria: Option<String>,
    pub unlocked: bool,
    pub unlocked_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnlockAchievementRequest {
    pub achievement_id: uuid::Uuid,
}
