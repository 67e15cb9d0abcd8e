use analytics::{AmountSource, AnalyticsService};
use axum::{routing::get, Router};
use configuration::Settings;
use database::DbRepository;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
pub struct AppState {
    pub service: AnalyticsService<Arc<dyn AmountSource>>,
    pub default_window: i64,
}

/// Builds the application router around an already-prepared state.
pub fn router(state: Arc<AppState>) -> Router {
    // The dashboard is served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/analytics/moving-average/:user_id", get(handlers::get_moving_average))
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
///
/// Connects to the database, applies migrations and the index setting, then
/// serves until Ctrl-C. The pool is closed before returning.
pub async fn run_server(settings: &Settings, addr: SocketAddr) -> anyhow::Result<()> {
    // Note: Tracing is already initialized by the caller.
    let db_pool = database::connect(&settings.database).await?;
    database::run_migrations(&db_pool).await?;
    let db_repo = DbRepository::new(db_pool.clone());
    db_repo.apply_user_index_setting(settings.database.user_index).await?;

    let source: Arc<dyn AmountSource> = Arc::new(db_repo);
    let app_state = Arc::new(AppState {
        service: AnalyticsService::new(source),
        default_window: settings.analytics.default_window,
    });

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server started and listening on {}", addr);

    axum::serve(listener, router(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db_pool.close().await;
    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal.");
        std::future::pending::<()>().await;
    }
}
