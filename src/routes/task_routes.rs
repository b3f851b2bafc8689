//! Task management endpoint handlers.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{
    routing::{delete, get, put},
    Json, Router,
};
use tracing::debug;

use crate::models::{NewTask, Task};
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

/// Registers task management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", delete(delete_task))
        .route("/tasks/{id}/toggle", put(toggle_task))
}

/// Parses the `{id}` path segment. Anything that is not a task id cannot
/// match a task, so it is reported the same way as an unknown id.
fn parse_id(raw: &str) -> Result<u64, HTTPError> {
    raw.parse::<u64>().map_err(|_| HTTPError::not_found())
}

/// Returns every task in insertion order. The task gauges are kept current
/// by the store itself.
async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, HTTPError> {
    Ok(Json(state.store.list().await?))
}

/// Creates a task from `{"title": ...}`.
///
/// The body is decoded leniently: a missing, empty or malformed body is
/// treated as a request without a title and rejected with 400.
async fn create_task(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Task>), HTTPError> {
    let new_task: NewTask = serde_json::from_slice(&body).unwrap_or_else(|e| {
        debug!("Unreadable task body: {}", e);
        NewTask::default()
    });

    let task = state.store.create(new_task.title()).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, HTTPError> {
    let id = parse_id(&id)?;
    if !state.store.delete(id).await? {
        return Err(HTTPError::not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Task>, HTTPError> {
    let id = parse_id(&id)?;
    let task = state.store.toggle(id).await?;
    Ok(Json(task))
}
