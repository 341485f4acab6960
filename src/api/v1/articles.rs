//! Article listing handlers.
//!
//! Articles are written by an external ingester; the API only reads them.

use axum::{
    Json,
    extract::{Path, State},
    http::Method,
};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::api::AppState;
use crate::db::{Article, ArticleQuery, ArticleRepository, Database};

use super::{ApiResult, ErrorResponse, db_error_response, ensure_method, parse_id};

/// Article response DTO
///
/// Carries the owning feed's id only, never the feed itself.
#[derive(Debug, Serialize, ToSchema)]
pub struct ArticleResponse {
    #[schema(example = 10)]
    pub id: i64,
    #[schema(example = "Announcing Rust 1.85")]
    pub title: String,
    #[schema(example = "The Rust team is happy to announce a new version")]
    pub description: String,
    #[schema(example = "https://blog.rust-lang.org/2025/02/20/Rust-1.85.0.html")]
    pub url: String,
    /// Publication timestamp supplied by the ingester (ms since epoch)
    #[schema(example = 1740009600000_i64)]
    pub published_at: i64,
    #[schema(example = 1)]
    pub feed_id: i64,
    /// Creation timestamp (ms since epoch)
    #[schema(example = 1740009600500_i64)]
    pub created_at: i64,
}

impl From<Article> for ArticleResponse {
    fn from(a: Article) -> Self {
        Self {
            id: a.id,
            title: a.title,
            description: a.description,
            url: a.url,
            published_at: a.published_at,
            feed_id: a.feed_id,
            created_at: a.created_at,
        }
    }
}

/// List all articles
#[utoipa::path(
    get,
    path = "/v1/articles",
    tag = "articles",
    responses(
        (status = 200, description = "All articles", body = Vec<ArticleResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_articles<D: Database>(
    method: Method,
    State(state): State<AppState<D>>,
) -> ApiResult<Json<Vec<ArticleResponse>>> {
    ensure_method(&method, Method::GET)?;

    let articles = state
        .db()
        .articles()
        .list(None)
        .await
        .map_err(|e| db_error_response("Article", e))?;

    Ok(Json(
        articles.into_iter().map(ArticleResponse::from).collect(),
    ))
}

/// List the articles of one feed
///
/// An unknown feed yields an empty list.
#[utoipa::path(
    get,
    path = "/v1/feeds/{id}/articles",
    tag = "articles",
    params(
        ("id" = i64, Path, description = "Feed ID")
    ),
    responses(
        (status = 200, description = "Articles of the feed", body = Vec<ArticleResponse>),
        (status = 400, description = "Malformed feed ID", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_feed_articles<D: Database>(
    method: Method,
    State(state): State<AppState<D>>,
    Path(feed_id): Path<String>,
) -> ApiResult<Json<Vec<ArticleResponse>>> {
    ensure_method(&method, Method::GET)?;
    let feed_id = parse_id("Feed", &feed_id)?;

    let articles = state
        .db()
        .articles()
        .list(Some(&ArticleQuery::for_feed(feed_id)))
        .await
        .map_err(|e| db_error_response("Article", e))?;

    Ok(Json(
        articles.into_iter().map(ArticleResponse::from).collect(),
    ))
}
