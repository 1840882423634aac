#![allow(dead_code)]

mod config;
mod dashboard;
mod errors;
mod handlers;
mod models;
mod pipeline;
mod source;

use std::time::Duration;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::dashboard::DashboardService;
use crate::handlers::AppState;
use crate::source::HttpSummarySource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "costboard=info,tower_http=info".into()))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    tracing::info!("Configuration loaded");

    let source = HttpSummarySource::new(&config.source)?;
    tracing::info!(url = source.summary_url(), "Using collector summary endpoint");

    let dashboard = DashboardService::new(source, config.dashboard.items_per_page);

    if config.dashboard.load_on_start {
        let initial = dashboard.clone();
        tokio::spawn(async move {
            let status = initial.load().await;
            tracing::info!(phase = status.phase(), "Initial dashboard load finished");
        });
    }

    if config.dashboard.refresh_interval_secs > 0 {
        dashboard.spawn_periodic_refresh(Duration::from_secs(config.dashboard.refresh_interval_secs));
        tracing::info!(
            every_secs = config.dashboard.refresh_interval_secs,
            "Periodic dashboard refresh started"
        );
    }

    let state = AppState { dashboard };

    // CORS configuration
    let allow_origin = match config.server.allowed_origins() {
        None => AllowOrigin::any(),
        Some(origins) => {
            let origins = origins
                .iter()
                .map(|o| o.parse::<HeaderValue>())
                .collect::<Result<Vec<_>, _>>()?;
            AllowOrigin::list(origins)
        }
    };
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(handlers::health::health_check))
        // Dashboard
        .route("/api/v1/dashboard", get(handlers::dashboard::get_dashboard))
        .route("/api/v1/dashboard/refresh", post(handlers::dashboard::refresh))
        // Resource tables
        .route("/api/v1/resources", get(handlers::resources::get_view))
        .route("/api/v1/resources/tab", post(handlers::resources::switch_tab))
        .route("/api/v1/resources/sort", post(handlers::resources::sort))
        .route("/api/v1/resources/page", post(handlers::resources::set_page))
        .route("/api/v1/resources/page-size", post(handlers::resources::set_page_size))
        // Costs
        .route("/api/v1/costs/series", get(handlers::costs::get_series))
        .route("/api/v1/costs/export", get(handlers::costs::export_csv))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Starting costboard server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
