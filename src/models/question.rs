use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

pub const KIND_SINGLE_CHOICE: &str = "single_choice";
pub const KIND_MULTIPLE_CHOICE: &str = "multiple_choice";

/// One question of a test. `correct_key` holds the correct option index for
/// single choice, or a comma-joined index set for multiple choice ("0,2").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub test_id: Uuid,
    pub position: i32,
    pub text: String,
    pub kind: String,
    pub options: Json<Vec<String>>,
    pub correct_key: String,
    pub explanation: Option<String>,
    pub points: i32,
}
