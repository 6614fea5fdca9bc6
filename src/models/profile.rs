use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Cumulative per-user learning counters. Mutated only as a side effect of a
/// new test result, inside the same transaction as the result insert.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub total_points: i32,
    pub completed_tasks: i32,
    pub total_tasks: i32,
    pub success_rate: f64,
    pub level: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Points required to reach the next level (100 points per level).
    pub fn next_level_points(&self) -> i32 {
        self.level * 100
    }
}
