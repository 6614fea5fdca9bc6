pub mod achievement_service;
pub mod alert_service;
pub mod analytics_service;
pub mod auth_service;
pub mod export_service;
pub mod knowledge_service;
pub mod metric_service;
pub mod progress_service;
pub mod scoring_service;
pub mod test_service;
