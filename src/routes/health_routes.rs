//! Health check and status endpoints.

use crate::health::{HealthReport, StatusReport};
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::error;

/// Registers health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/status", get(status))
}

/// Health check endpoint.
///
/// Returns 200 with the individual checks, or 500 with
/// `{"status": "error", "message": ...}` if a check could not be computed.
async fn health_check(State(state): State<AppState>) -> Response {
    match state.health.health().await {
        Ok(report) => (StatusCode::OK, Json::<HealthReport>(report)).into_response(),
        Err(e) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "message": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Service status with task counts and the list of served endpoints.
async fn status(State(state): State<AppState>) -> Result<Json<StatusReport>, HTTPError> {
    Ok(Json(state.health.status().await?))
}
