use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{dtos::HealthResponse, services::metrics::get_metrics, AppState};

/// Liveness plus a storage ping; 503 when the store does not answer.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let status = match state.store.health_check().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    };

    (
        status,
        Json(HealthResponse {
            status: if status.is_success() { "ok" } else { "unavailable" }.to_string(),
            service: "laundry-service".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Prometheus metrics endpoint.
pub async fn metrics() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
