use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::answer::SubmittedAnswer;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TestSummary {
    pub id: uuid::Uuid,
    pub topic_id: Option<uuid::Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub difficulty: String,
    pub time_limit_minutes: i32,
    pub passing_score: f64,
    pub question_count: i64,
}

/// Question as shown to a test taker: no answer key, no explanation.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: uuid::Uuid,
    pub position: i32,
    pub text: String,
    pub kind: String,
    pub options: Vec<String>,
    pub points: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestDetail {
    pub id: uuid::Uuid,
    pub topic_id: Option<uuid::Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub difficulty: String,
    pub time_limit_minutes: i32,
    pub passing_score: f64,
    pub questions: Vec<QuestionView>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitTestRequest {
    pub test_id: uuid::Uuid,
    pub answers: HashMap<uuid::Uuid, SubmittedAnswer>,
    #[validate(range(min = 0, message = "Time spent cannot be negative"))]
    pub time_spent_seconds: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitTestResponse {
    pub result_id: uuid::Uuid,
    pub score: i32,
    pub max_score: i32,
    pub percentage: f64,
    pub passed: bool,
    pub time_spent_seconds: i32,
}
