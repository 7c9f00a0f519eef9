//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use orchestrator::OrchestratorError;

/// API-level error type that maps to HTTP responses.
///
/// Bodies are `{"error": <code>, "message": <text>}`, plus `order_id` and
/// `item_id` when the failure concerns a specific order or item.
#[derive(Debug)]
pub enum ApiError {
    /// The request body could not be read.
    BadRequest(String),
    /// Orchestration failure.
    Orchestrator(OrchestratorError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            ApiError::Orchestrator(err) => orchestrator_error_status(err),
        };
        let message = match &self {
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Orchestrator(err) => err.to_string(),
        };

        if status.is_server_error() {
            tracing::error!(%status, error = %message, "request failed");
        }

        let mut body = serde_json::json!({ "error": code, "message": message });
        if let ApiError::Orchestrator(err) = &self {
            if let Some(order_id) = err.order_id() {
                body["order_id"] = serde_json::json!(order_id);
            }
            if let OrchestratorError::ItemNotFound { item_id, .. }
            | OrchestratorError::MalformedItem { item_id, .. } = err
            {
                body["item_id"] = serde_json::json!(item_id);
            }
        }
        (status, axum::Json(body)).into_response()
    }
}

fn orchestrator_error_status(err: &OrchestratorError) -> (StatusCode, &'static str) {
    match err {
        OrchestratorError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
        OrchestratorError::ItemNotFound { .. } => (StatusCode::NOT_FOUND, "item_not_found"),
        OrchestratorError::ResourceNotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        OrchestratorError::AlreadyExists { .. } => (StatusCode::CONFLICT, "already_exists"),
        OrchestratorError::MalformedItem { .. } => (StatusCode::BAD_GATEWAY, "malformed_item"),
        OrchestratorError::UpstreamUnavailable { .. } => {
            (StatusCode::SERVICE_UNAVAILABLE, "upstream_unavailable")
        }
        OrchestratorError::StorageUnavailable(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, "storage_unavailable")
        }
    }
}

impl From<OrchestratorError> for ApiError {
    fn from(err: OrchestratorError) -> Self {
        ApiError::Orchestrator(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
