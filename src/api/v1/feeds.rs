//! Feed management handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{Method, StatusCode},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::api::AppState;
use crate::db::{Database, Feed, FeedPatch, FeedRepository, NewFeed};

use super::{
    ApiResult, ErrorResponse, MessageResponse, db_error_response, ensure_method, parse_body,
    parse_id,
};

// =============================================================================
// DTOs (Data Transfer Objects)
// =============================================================================

/// Feed response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct FeedResponse {
    /// Unique identifier
    #[schema(example = 1)]
    pub id: i64,
    /// Display name
    #[schema(example = "Tech News")]
    pub name: String,
    /// Feed location
    #[schema(example = "https://example.com/rss")]
    pub url: String,
    /// Owning user, if any
    #[schema(example = 1)]
    pub user_id: Option<i64>,
    /// Creation timestamp (ms since epoch)
    #[schema(example = 1735689600000_i64)]
    pub created_at: i64,
    /// Last update timestamp (ms since epoch)
    #[schema(example = 1735689600000_i64)]
    pub updated_at: i64,
}

impl From<Feed> for FeedResponse {
    fn from(f: Feed) -> Self {
        Self {
            id: f.id,
            name: f.name,
            url: f.url,
            user_id: f.user_id,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

/// Create feed request DTO
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFeedRequest {
    /// Display name (required)
    #[schema(example = "Tech News")]
    #[serde(default)]
    pub name: String,
    /// Feed location (required)
    #[schema(example = "https://example.com/rss")]
    #[serde(default)]
    pub url: String,
    /// Owning user
    #[schema(example = 1)]
    pub user_id: Option<i64>,
}

impl From<CreateFeedRequest> for NewFeed {
    fn from(req: CreateFeedRequest) -> Self {
        Self {
            name: req.name,
            url: req.url,
            user_id: req.user_id,
        }
    }
}

/// Update feed request DTO
///
/// Omitted or empty fields keep their stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateFeedRequest {
    #[schema(example = "Tech News Daily")]
    pub name: Option<String>,
    #[schema(example = "https://example.com/atom")]
    pub url: Option<String>,
    #[schema(example = 2)]
    pub user_id: Option<i64>,
}

impl From<UpdateFeedRequest> for FeedPatch {
    fn from(req: UpdateFeedRequest) -> Self {
        Self {
            name: req.name,
            url: req.url,
            user_id: req.user_id,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// List all feeds
#[utoipa::path(
    get,
    path = "/v1/feeds",
    tag = "feeds",
    responses(
        (status = 200, description = "All feeds", body = Vec<FeedResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_feeds<D: Database>(
    method: Method,
    State(state): State<AppState<D>>,
) -> ApiResult<Json<Vec<FeedResponse>>> {
    ensure_method(&method, Method::GET)?;

    let feeds = state
        .db()
        .feeds()
        .list()
        .await
        .map_err(|e| db_error_response("Feed", e))?;

    Ok(Json(feeds.into_iter().map(FeedResponse::from).collect()))
}

/// Get a feed by ID
#[utoipa::path(
    get,
    path = "/v1/feeds/{id}",
    tag = "feeds",
    params(
        ("id" = i64, Path, description = "Feed ID")
    ),
    responses(
        (status = 200, description = "Feed found", body = FeedResponse),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 404, description = "Feed not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_feed<D: Database>(
    method: Method,
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> ApiResult<Json<FeedResponse>> {
    ensure_method(&method, Method::GET)?;
    let id = parse_id("Feed", &id)?;

    let feed = state
        .db()
        .feeds()
        .get(id)
        .await
        .map_err(|e| db_error_response("Feed", e))?;

    Ok(Json(FeedResponse::from(feed)))
}

/// Create a new feed
///
/// `name` and `url` are required and must be non-empty.
#[utoipa::path(
    post,
    path = "/v1/feeds",
    tag = "feeds",
    request_body = CreateFeedRequest,
    responses(
        (status = 201, description = "Feed created", body = FeedResponse),
        (status = 400, description = "Malformed body or missing field", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, payload))]
pub async fn create_feed<D: Database>(
    method: Method,
    State(state): State<AppState<D>>,
    payload: Result<Json<CreateFeedRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<FeedResponse>)> {
    ensure_method(&method, Method::POST)?;
    let new_feed = NewFeed::from(parse_body(payload)?);

    new_feed
        .validate()
        .map_err(|e| db_error_response("Feed", e))?;

    let feed = state
        .db()
        .feeds()
        .create(&new_feed)
        .await
        .map_err(|e| db_error_response("Feed", e))?;

    Ok((StatusCode::CREATED, Json(FeedResponse::from(feed))))
}

/// Update a feed
///
/// Only supplied, non-empty fields overwrite the stored feed.
#[utoipa::path(
    put,
    path = "/v1/feeds/{id}",
    tag = "feeds",
    params(
        ("id" = i64, Path, description = "Feed ID")
    ),
    request_body = UpdateFeedRequest,
    responses(
        (status = 200, description = "Feed updated", body = FeedResponse),
        (status = 400, description = "Malformed ID or body", body = ErrorResponse),
        (status = 404, description = "Feed not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, payload))]
pub async fn update_feed<D: Database>(
    method: Method,
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateFeedRequest>, JsonRejection>,
) -> ApiResult<Json<FeedResponse>> {
    ensure_method(&method, Method::PUT)?;
    let id = parse_id("Feed", &id)?;
    let patch = FeedPatch::from(parse_body(payload)?);

    let feed = state
        .db()
        .feeds()
        .update(id, &patch)
        .await
        .map_err(|e| db_error_response("Feed", e))?;

    Ok(Json(FeedResponse::from(feed)))
}

/// Delete a feed
///
/// Deleting an ID that does not exist still succeeds. Articles of the feed
/// are left in place.
#[utoipa::path(
    delete,
    path = "/v1/feeds/{id}",
    tag = "feeds",
    params(
        ("id" = i64, Path, description = "Feed ID")
    ),
    responses(
        (status = 200, description = "Feed deleted", body = MessageResponse),
        (status = 400, description = "Malformed ID", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_feed<D: Database>(
    method: Method,
    State(state): State<AppState<D>>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    ensure_method(&method, Method::DELETE)?;
    let id = parse_id("Feed", &id)?;

    let removed = state
        .db()
        .feeds()
        .delete(id)
        .await
        .map_err(|e| db_error_response("Feed", e))?;

    if !removed {
        debug!(feed_id = id, "Delete of unknown feed");
    }

    Ok(Json(MessageResponse {
        message: "Feed deleted".to_string(),
    }))
}
