//! Health check handlers.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use diesel_async::RunQueryDsl;
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: String,
}

/// Routes:
/// - GET /health       - Basic health check
/// - GET /health/ready - Readiness probe (checks database connectivity)
/// - GET /health/live  - Liveness probe
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready))
        .route("/health/live", get(live))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: crate::pkg_version().to_string(),
    })
}

/// Readiness requires a working database round-trip.
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_ok = match state.db_pool.get().await {
        Ok(mut conn) => diesel::sql_query("SELECT 1").execute(&mut conn).await.is_ok(),
        Err(_) => false,
    };

    if db_ok {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ready",
                version: crate::pkg_version().to_string(),
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "degraded",
                version: crate::pkg_version().to_string(),
            }),
        )
    }
}

async fn live() -> StatusCode {
    StatusCode::OK
}
