//! Integration tests for the JSON API routes.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use conflict_monitor::graphql::HttpGraphqlClient;
use conflict_monitor::posts::PostService;
use conflict_monitor::web::{create_app, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Create a test app backed by the mock CMS.
fn create_test_app(server: &MockServer) -> Router {
    let client = HttpGraphqlClient::new(
        format!("{}/graphql", server.uri()),
        std::time::Duration::from_secs(5),
    )
    .expect("Failed to create GraphQL client");

    let state = AppState {
        posts: PostService::new(Arc::new(client), "cms.example.com", false),
    };
    create_app(state)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
    };
    (status, value)
}

async fn mount_all_posts(server: &MockServer) {
    Mock::given(method("POST"))
        .and(body_string_contains("query AllPosts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "posts": {
                    "edges": [
                        { "node": { "slug": "a", "date": "2021-01-01T00:00:00" } },
                        { "node": {
                            "slug": "b",
                            "date": "2023-05-01T00:00:00",
                            "author": {
                                "node": { "name": "Olena", "avatar": { "url": "http://g.com/o" } }
                            }
                        } },
                        { "node": { "slug": "c", "date": "2022-03-01T00:00:00" } }
                    ]
                }
            }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    let app = create_test_app(&server);

    let (status, body) = get(app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));
}

#[tokio::test]
async fn test_all_posts_route() {
    let server = MockServer::start().await;
    mount_all_posts(&server).await;
    let app = create_test_app(&server);

    let (status, body) = get(app, "/api/posts").await;

    assert_eq!(status, StatusCode::OK);
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 3);
    assert_eq!(posts[0]["slug"], "a");
    assert_eq!(
        posts[1]["author"],
        json!({ "name": "Olena", "avatar": "https://g.com/o" })
    );
    // Absent fields are omitted, not null
    assert!(posts[0].get("featuredImage").is_none());
}

#[tokio::test]
async fn test_recent_posts_route() {
    let server = MockServer::start().await;
    mount_all_posts(&server).await;
    let app = create_test_app(&server);

    let (status, body) = get(app, "/api/posts/recent?count=2").await;

    assert_eq!(status, StatusCode::OK);
    let slugs: Vec<_> = body["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, ["b", "c"]);
}

#[tokio::test]
async fn test_recent_posts_rejects_bad_count() {
    let server = MockServer::start().await;
    let app = create_test_app(&server);

    let (status, _) = get(app, "/api/posts/recent?count=many").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_post_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("query PostBySlug"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "post": null } })),
        )
        .mount(&server)
        .await;
    let app = create_test_app(&server);

    let (status, body) = get(app, "/api/posts/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Post not found" }));
}

#[tokio::test]
async fn test_post_by_slug_route() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("query PostBySlug"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "post": {
                    "slug": "kyiv",
                    "featuredImage": { "node": { "sourceUrl": "https://x/i.png" } }
                }
            }
        })))
        .mount(&server)
        .await;
    let app = create_test_app(&server);

    let (status, body) = get(app, "/api/posts/kyiv").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "post": { "slug": "kyiv", "featuredImage": { "sourceUrl": "https://x/i.png" } } })
    );
}

#[tokio::test]
async fn test_cms_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let app = create_test_app(&server);

    let (status, body) = get(app, "/api/authors/olena/posts").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({ "error": "CMS request failed" }));
}

#[tokio::test]
async fn test_comment_route() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("mutation CreateComment"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": { "createComment": { "success": true } } })),
        )
        .expect(1)
        .mount(&server)
        .await;
    let app = create_test_app(&server);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/comments")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"content":"Stay safe"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, body) = read_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));
}

#[tokio::test]
async fn test_last_update_route() {
    let server = MockServer::start().await;
    let app = create_test_app(&server);

    let (status, body) = get(app.clone(), "/api/last-update?at=2020-01-01").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["label"].as_str().unwrap().ends_with(" days"));

    let (status, body) = get(app, "/api/last-update?at=yesterday").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "invalid date: yesterday" }));
}
