// src/server/handlers.rs

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engine::ScanPipeline;
use crate::errors::RequestError;
use crate::types::ExecutionResult;

/// Shared application state.
pub type AppState = Arc<ScanPipeline>;

/// `POST /run` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub in_flight: usize,
    pub capacity: usize,
}

fn message(status: StatusCode, text: &str) -> Response {
    (
        status,
        Json(MessageResponse {
            message: text.to_string(),
        }),
    )
        .into_response()
}

fn error(status: StatusCode, text: String) -> Response {
    (status, Json(ErrorResponse { error: text })).into_response()
}

/// Map an execution outcome onto the HTTP response.
pub fn execution_response(result: ExecutionResult) -> Response {
    match result {
        ExecutionResult::Success { .. } => message(StatusCode::OK, "Command executed successfully"),
        ExecutionResult::Timeout => message(StatusCode::GATEWAY_TIMEOUT, "Command timed out"),
        ExecutionResult::Error(desc) => error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("An error occurred: {desc}"),
        ),
    }
}

/// Map a request that never reached execution onto the HTTP response.
pub fn request_error_response(err: RequestError) -> Response {
    match err {
        RequestError::MissingLocator | RequestError::MalformedBody(_) => {
            error(StatusCode::BAD_REQUEST, format!("An error occurred: {err}"))
        }
        RequestError::QueueFull => error(StatusCode::TOO_MANY_REQUESTS, err.to_string()),
        RequestError::QueueEmpty => error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to process the request".to_string(),
        ),
    }
}

/// POST /run
pub async fn run_scan(
    State(pipeline): State<AppState>,
    payload: Result<Json<RunRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let reason = rejection.body_text();
            warn!(error = %reason, "rejecting malformed /run body");
            return request_error_response(RequestError::MalformedBody(reason));
        }
    };

    info!(url = ?request.url, "REST run request");

    match pipeline.submit(request.url.as_deref()).await {
        Ok(result) => execution_response(result),
        Err(err) => request_error_response(err),
    }
}

/// GET /health
pub async fn health(State(pipeline): State<AppState>) -> Json<HealthResponse> {
    let queue = pipeline.queue();
    Json(HealthResponse {
        status: "ok".to_string(),
        in_flight: queue.in_flight(),
        capacity: queue.capacity(),
    })
}
