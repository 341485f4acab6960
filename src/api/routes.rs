//! API route configuration.

use axum::Router;
use axum::routing::{delete, get, post, put};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use super::handlers::{self, HealthResponse};
use super::state::AppState;
use super::v1::{
    self, ArticleResponse, CreateFeedRequest, ErrorResponse, FeedResponse, MessageResponse,
    UpdateFeedRequest,
};
use crate::db::Database;

/// Build routes with generic database type.
///
/// This macro reduces boilerplate when registering handlers that are generic
/// over the Database trait. It applies the turbofish operator automatically.
macro_rules! routes {
    ($D:ty => {
        $($method:ident $path:literal => $($handler:ident)::+),* $(,)?
    }) => {{
        let router = Router::new();
        $(
            let router = router.route($path, $method($($handler)::+::<$D>));
        )*
        router
    }};
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "RSS Aggregator API",
        version = "0.1.0",
        description = "CRUD backend for users, feeds and articles of a feed-aggregation client",
        license(name = "GPL-2.0")
    ),
    paths(
        handlers::root,
        handlers::health,
        v1::list_feeds,
        v1::get_feed,
        v1::create_feed,
        v1::update_feed,
        v1::delete_feed,
        v1::list_articles,
        v1::list_feed_articles,
    ),
    components(
        schemas(
            HealthResponse,
            FeedResponse,
            CreateFeedRequest,
            UpdateFeedRequest,
            ArticleResponse,
            MessageResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "system", description = "System health and status endpoints"),
        (name = "feeds", description = "Feed management endpoints"),
        (name = "articles", description = "Article listing endpoints")
    )
)]
pub struct ApiDoc;

/// Create the API router, optionally serving OpenAPI docs at `/docs`.
pub fn create_router<D: Database + 'static>(state: AppState<D>, enable_docs: bool) -> Router {
    // System routes (non-generic)
    let system_routes = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health));

    // Feed routes (generic over Database)
    let feed_routes = routes!(D => {
        get "/v1/feeds" => v1::list_feeds,
        post "/v1/feeds" => v1::create_feed,
        get "/v1/feeds/{id}" => v1::get_feed,
        put "/v1/feeds/{id}" => v1::update_feed,
        delete "/v1/feeds/{id}" => v1::delete_feed,
    });

    // Article routes (generic over Database)
    let article_routes = routes!(D => {
        get "/v1/articles" => v1::list_articles,
        get "/v1/feeds/{id}/articles" => v1::list_feed_articles,
    });

    let mut router = system_routes.merge(feed_routes).merge(article_routes);

    if enable_docs {
        router = router.merge(Scalar::with_url("/docs", ApiDoc::openapi()));
    }

    router
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .with_state(state)
}
