pub mod achievement_dto;
pub mod alert_dto;
pub mod auth_dto;
pub mod knowledge_dto;
pub mod metrics_dto;
pub mod profile_dto;
pub mod test_dto;
