use axum::{routing::get, Router};
use dashboard::AnalyticsService;
use database::DbRepository;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};
use tracing;

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub db_repo: DbRepository,
    pub service: AnalyticsService,
}

/// The main function to configure and run the web server.
///
/// Tracing is initialized by the binary that calls this, not here, so the
/// subscriber is only installed once per process.
pub async fn run_server(
    addr: SocketAddr,
    database_settings: &configuration::Database,
) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let db_pool = database::connect(database_settings).await?;
    database::run_migrations(&db_pool).await?;
    let db_repo = DbRepository::new(db_pool);

    let app_state = Arc::new(AppState {
        db_repo,
        service: AnalyticsService::new(),
    });
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    // --- DEFINE THE APPLICATION ROUTES ---
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/events/:event_id/analytics", get(handlers::get_event_analytics))
        .route("/api/events/:event_id/analytics/revenue", get(handlers::get_event_revenue))
        .route("/api/events/:event_id/analytics/velocity", get(handlers::get_event_velocity))
        .route("/api/events/:event_id/analytics/projections", get(handlers::get_event_projections))
        .route("/api/dashboard/:user_id", get(handlers::get_account_overview))
        .with_state(app_state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http());

    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
