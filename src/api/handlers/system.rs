//! System health and status handlers, plus the JSON fallbacks.

use axum::{Json, http::StatusCode};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::api::v1::{ErrorResponse, error_response};

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    #[schema(example = "ok")]
    pub status: String,
}

/// Liveness banner
#[utoipa::path(
    get,
    path = "/",
    tag = "system",
    responses(
        (status = 200, description = "Service banner", body = String, content_type = "text/plain")
    )
)]
#[instrument]
pub async fn root() -> &'static str {
    crate::banner()
}

/// Health check endpoint
///
/// Returns the current health status of the API
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Health check successful", body = HealthResponse)
    )
)]
#[instrument]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Fallback for paths no route matches.
pub async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

/// Fallback for a known path hit with the wrong verb.
pub async fn method_not_allowed() -> (StatusCode, Json<ErrorResponse>) {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
