pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod seed;
pub mod services;
pub mod utils;

use sqlx::PgPool;

use crate::services::{
    achievement_service::AchievementService, alert_service::AlertService,
    analytics_service::AnalyticsService, auth_service::AuthService,
    export_service::ExportService, knowledge_service::KnowledgeService,
    metric_service::MetricService, progress_service::ProgressService, test_service::TestService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth_service: AuthService,
    pub test_service: TestService,
    pub knowledge_service: KnowledgeService,
    pub progress_service: ProgressService,
    pub analytics_service: AnalyticsService,
    pub export_service: ExportService,
    pub metric_service: MetricService,
    pub alert_service: AlertService,
    pub achievement_service: AchievementService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let auth_service = AuthService::new(pool.clone());
        let test_service = TestService::new(pool.clone());
        let knowledge_service = KnowledgeService::new(pool.clone());
        let progress_service = ProgressService::new(pool.clone());
        let analytics_service = AnalyticsService::new(pool.clone());
        let export_service = ExportService::new(pool.clone());
        let metric_service = MetricService::new(pool.clone());
        let alert_service = AlertService::new(pool.clone());
        let achievement_service = AchievementService::new(pool.clone());

        Self {
            pool,
            auth_service,
            test_service,
            knowledge_service,
            progress_service,
            analytics_service,
            export_service,
            metric_service,
            alert_service,
            achievement_service,
        }
    }
}
