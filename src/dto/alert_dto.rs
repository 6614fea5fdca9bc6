use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAlertRequest {
    pub metric_id: Option<uuid::Uuid>,
    #[validate(length(min = 1, message = "Message cannot be empty"))]
    pub message: String,
    pub severity: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarkReadRequest {
    pub alert_id: uuid::Uuid,
}
