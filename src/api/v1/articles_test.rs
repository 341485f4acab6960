//! Integration tests for the article endpoints.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::api::{AppState, routes};
use crate::db::{
    ArticleRepository, Database, FeedRepository, NewArticle, NewFeed, SqliteDatabase,
};

async fn test_state() -> AppState<SqliteDatabase> {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");
    AppState::new(db)
}

async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Two feeds; the first has two articles, the second one.
async fn seed(state: &AppState<SqliteDatabase>) -> (i64, i64) {
    let db = state.db();
    let mut feed_ids = Vec::new();
    for name in ["rust", "go"] {
        let feed = db
            .feeds()
            .create(&NewFeed {
                name: name.to_string(),
                url: format!("https://{}.example.com/rss", name),
                user_id: None,
            })
            .await
            .unwrap();
        feed_ids.push(feed.id);
    }

    for (feed_id, title, published_at) in [
        (feed_ids[0], "ownership", 1_000),
        (feed_ids[0], "lifetimes", 2_000),
        (feed_ids[1], "goroutines", 1_500),
    ] {
        db.articles()
            .create(&NewArticle {
                title: title.to_string(),
                description: format!("All about {}", title),
                url: format!("https://example.com/{}", title),
                published_at,
                feed_id,
            })
            .await
            .unwrap();
    }

    (feed_ids[0], feed_ids[1])
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_articles_empty() {
    let app = routes::create_router(test_state().await, false);

    let response = app.oneshot(get("/v1/articles")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_articles_returns_all() {
    let state = test_state().await;
    seed(&state).await;
    let app = routes::create_router(state, false);

    let response = app.oneshot(get("/v1/articles")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let articles = body.as_array().unwrap();
    assert_eq!(articles.len(), 3);

    let first = &articles[0];
    assert!(first["id"].as_i64().unwrap() > 0);
    assert!(first["feed_id"].as_i64().unwrap() > 0);
    assert!(first.get("feed").is_none(), "feed must not be embedded");
    assert!(first["created_at"].as_i64().unwrap() > 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_feed_articles_filters_by_feed() {
    let state = test_state().await;
    let (rust_feed, go_feed) = seed(&state).await;
    let app = routes::create_router(state, false);

    let response = app
        .clone()
        .oneshot(get(&format!("/v1/feeds/{}/articles", rust_feed)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    // Newest first
    assert_eq!(titles, vec!["lifetimes", "ownership"]);

    let response = app
        .oneshot(get(&format!("/v1/feeds/{}/articles", go_feed)))
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["feed_id"], go_feed);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_feed_articles_unknown_feed_is_empty() {
    let state = test_state().await;
    seed(&state).await;
    let app = routes::create_router(state, false);

    let response = app.oneshot(get("/v1/feeds/999/articles")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_feed_articles_invalid_id() {
    let app = routes::create_router(test_state().await, false);

    let response = app.oneshot(get("/v1/feeds/rust/articles")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({"error": "Invalid feed id 'rust'"})
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_articles_survive_feed_delete() {
    let state = test_state().await;
    let (rust_feed, _) = seed(&state).await;
    let app = routes::create_router(state, false);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/feeds/{}", rust_feed))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get(&format!("/v1/feeds/{}/articles", rust_feed)))
        .await
        .unwrap();
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_post_articles_is_405() {
    let app = routes::create_router(test_state().await, false);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/articles")
                .header("content-type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
