use academy_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware, routes, seed, AppState,
};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    if config.seed_demo_data {
        seed::run(&pool).await?;
    }

    let app_state = AppState::new(pool);

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let api = Router::new()
        .route(
            "/api/auth/register",
            post(routes::auth::register).fallback(routes::fallback::method_not_allowed),
        )
        .route(
            "/api/auth/login",
            post(routes::auth::login).fallback(routes::fallback::method_not_allowed),
        )
        .route(
            "/api/tests",
            get(routes::tests::list_tests).fallback(routes::fallback::method_not_allowed),
        )
        .route(
            "/api/tests/submit",
            post(routes::tests::submit_test).fallback(routes::fallback::method_not_allowed),
        )
        .route(
            "/api/tests/:id",
            get(routes::tests::get_test).fallback(routes::fallback::method_not_allowed),
        )
        .route(
            "/api/knowledge",
            get(routes::knowledge::list_knowledge).fallback(routes::fallback::method_not_allowed),
        )
        .route(
            "/api/knowledge/topics/:id",
            get(routes::knowledge::get_topic).fallback(routes::fallback::method_not_allowed),
        )
        .route(
            "/api/profile/progress",
            get(routes::profile::get_progress).fallback(routes::fallback::method_not_allowed),
        )
        .route(
            "/api/dashboard/stats",
            get(routes::profile::dashboard_stats).fallback(routes::fallback::method_not_allowed),
        )
        .route(
            "/api/metrics",
            get(routes::metrics::list_metrics).fallback(routes::fallback::method_not_allowed),
        )
        .route(
            "/api/metrics/recommendations",
            get(routes::metrics::recommendations).fallback(routes::fallback::method_not_allowed),
        )
        .route(
            "/api/metrics/comparison",
            get(routes::metrics::comparison).fallback(routes::fallback::method_not_allowed),
        )
        .route(
            "/api/export",
            post(routes::export::export_metrics).fallback(routes::fallback::method_not_allowed),
        )
        .route(
            "/api/notifications",
            get(routes::notifications::list_notifications)
                .post(routes::notifications::create_notification)
                .put(routes::notifications::mark_notification_read)
                .fallback(routes::fallback::method_not_allowed),
        )
        .route(
            "/api/achievements",
            get(routes::achievements::list_achievements)
                .post(routes::achievements::unlock_achievement)
                .fallback(routes::fallback::method_not_allowed),
        )
        .layer(axum::middleware::from_fn_with_state(
            middleware::rate_limit::new_rps_state(config.api_rps),
            middleware::rate_limit::rps_middleware,
        ));

    let app = base_routes
        .merge(api)
        .fallback(routes::fallback::not_found)
        .with_state(app_state)
        .layer(middleware::cors::permissive_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
