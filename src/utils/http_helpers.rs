use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::store::StoreError;

/// Message returned for every 500, whatever the cause.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Message returned when an id does not match any task.
pub const TASK_NOT_FOUND_MESSAGE: &str = "Task not found";

/// A general purpose HTTP error type that can be converted into an `IntoResponse`.
#[derive(Debug)]
pub struct HTTPError {
    status: StatusCode,
    message: String,
}

impl HTTPError {
    /// Creates a new HTTP error with the given status code and message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        HTTPError {
            status,
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        HTTPError::new(StatusCode::NOT_FOUND, TASK_NOT_FOUND_MESSAGE)
    }

    /// A 500 carrying only the generic message. Details belong in the logs.
    pub fn internal() -> Self {
        HTTPError::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<StoreError> for HTTPError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(message) => HTTPError::new(StatusCode::BAD_REQUEST, message),
            StoreError::NotFound(_) => HTTPError::not_found(),
            StoreError::Internal(detail) => {
                tracing::error!("Store error: {}", detail);
                HTTPError::internal()
            }
        }
    }
}

/// Converts our `HTTPError` into an HTTP response with a `{"error": ...}` body.
impl IntoResponse for HTTPError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
