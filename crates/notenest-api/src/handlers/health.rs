//! Health check handler.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::dto::response::{ApiResponse, ComponentHealth, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let store_ok = state.store.health_check().await.unwrap_or_else(|e| {
        warn!(error = %e, "Document store health check failed");
        false
    });
    let storage_ok = state.storage.health_check().await.unwrap_or_else(|e| {
        warn!(error = %e, "Storage health check failed");
        false
    });

    Json(ApiResponse::ok(HealthResponse {
        status: if store_ok && storage_ok { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: ComponentHealth {
            provider: state.store.provider_type().to_string(),
            healthy: store_ok,
        },
        storage: ComponentHealth {
            provider: state.storage.provider_type().to_string(),
            healthy: storage_ok,
        },
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}
