use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

/// One finished attempt. Created on submission, never mutated afterwards;
/// at most one row per (user, test) pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TestResult {
    pub id: Uuid,
    pub user_id: Uuid,
    pub test_id: Uuid,
    pub answers: JsonValue,
    pub score: i32,
    pub max_score: i32,
    pub time_spent_seconds: i32,
    pub passed: bool,
    pub created_at: DateTime<Utc>,
}
