use laundry_service::{
    build_router,
    config::LaundryConfig,
    models::{Entity, User},
    services::{metrics, DocumentStore, MongoDb, DEFAULT_STORE_TIMEOUT},
    AppState,
};
use service_core::observability::init_tracing;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), service_core::error::AppError> {
    // Load configuration - fail fast if invalid
    let config = LaundryConfig::load()?;

    init_tracing(
        "laundry-service",
        &config.observability.log_level,
        config.observability.otlp_endpoint.as_deref(),
    );

    metrics::init_metrics().map_err(service_core::error::AppError::InternalError)?;

    tracing::info!(
        version = %env!("CARGO_PKG_VERSION"),
        environment = ?config.environment,
        "Starting laundry service"
    );

    if config.uses_default_secret() {
        tracing::warn!("JWT_SECRET not set, signing tokens with the built-in default secret");
    }

    let db = MongoDb::connect(
        &config.mongodb.uri,
        &config.mongodb.database,
        DEFAULT_STORE_TIMEOUT,
    )
    .await?;
    db.ensure_unique_index(User::COLLECTION, "username").await?;
    tracing::info!("Database initialized successfully");

    let port = config.common.port;
    let state = AppState::new(config, Arc::new(db));
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
