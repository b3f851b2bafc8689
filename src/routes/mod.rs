//! HTTP route definitions and handlers.
//!
//! This module organizes all HTTP endpoints into logical groups:
//! task management, health/status reporting and metrics exposition.
//! Every route runs behind the request instrumentation middleware.

mod health_routes;
mod metrics_routes;
mod task_routes;

use crate::instrumentation::instrument_request;
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;
use axum::http::StatusCode;
use axum::{middleware, Router};

/// Every route served, as reported by `/status`.
pub const ENDPOINTS: &[&str] = &[
    "GET /health",
    "GET /metrics",
    "GET /status",
    "GET /tasks",
    "POST /tasks",
    "DELETE /tasks/{id}",
    "PUT /tasks/{id}/toggle",
];

/// Creates the application router with all configured routes.
///
/// Combines all route modules into a single router, wraps it in the
/// instrumentation layer and attaches the application state.
pub fn create_router(state: AppState) -> Router {
    routes()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            instrument_request,
        ))
        .with_state(state)
}

/// All routes, without instrumentation or state attached.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(task_routes::routes())
        .merge(health_routes::routes())
        .merge(metrics_routes::routes())
        .fallback(not_found)
}

async fn not_found() -> HTTPError {
    HTTPError::new(StatusCode::NOT_FOUND, "Not found")
}
