//! V1 API handlers.
//!
//! Every handler answers with a JSON body. Failures are wrapped as
//! `{"error": "<message>"}` with the status code chosen by
//! [`db_error_response`].

mod articles;
mod feeds;

#[cfg(test)]
mod articles_test;

pub use articles::*;
pub use feeds::*;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{Method, StatusCode},
};
use serde::Serialize;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::db::{DbError, Id};

/// Error response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    #[schema(example = "Feed not found")]
    pub error: String,
}

/// Plain acknowledgement DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Feed deleted")]
    pub message: String,
}

/// Result type shared by all v1 handlers.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

/// Build an error tuple with the JSON envelope.
pub fn error_response(
    status: StatusCode,
    message: impl Into<String>,
) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// Translate a repository error for `entity` into a status code and message.
///
/// | DbError | Status |
/// |---|---|
/// | `Validation` | 400 |
/// | `NotFound` | 404 |
/// | `Constraint` | 409 |
/// | anything else | 500 |
pub fn db_error_response(entity: &str, e: DbError) -> (StatusCode, Json<ErrorResponse>) {
    match e {
        DbError::Validation { message } => error_response(StatusCode::BAD_REQUEST, message),
        DbError::NotFound { .. } => {
            error_response(StatusCode::NOT_FOUND, format!("{} not found", entity))
        }
        DbError::Constraint { .. } => {
            warn!(entity, error = %e, "Constraint violation");
            error_response(StatusCode::CONFLICT, e.to_string())
        }
        other => {
            error!(entity, error = %other, "Storage failure");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

/// Reject requests whose verb does not match the route.
///
/// The router already dispatches by method; this keeps handlers safe when
/// mounted or invoked some other way.
pub fn ensure_method(actual: &Method, expected: Method) -> ApiResult<()> {
    if *actual == expected {
        Ok(())
    } else {
        Err(error_response(
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed",
        ))
    }
}

/// Unwrap a JSON body, turning any rejection into a 400.
pub fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| {
            error_response(
                StatusCode::BAD_REQUEST,
                format!("Invalid request body: {}", rejection.body_text()),
            )
        })
}

/// Parse an entity id path segment.
pub fn parse_id(entity: &str, raw: &str) -> ApiResult<Id> {
    raw.parse::<Id>().map_err(|_| {
        error_response(
            StatusCode::BAD_REQUEST,
            format!("Invalid {} id '{}'", entity.to_lowercase(), raw),
        )
    })
}
