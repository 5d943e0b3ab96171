use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::datetime::{last_update_label, parse_date};
use crate::posts::{CommentResult, PagedPosts, Post, PostError, DEFAULT_PAGE_SIZE};

const DEFAULT_RECENT_COUNT: usize = 5;

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(health))
        .route("/api/posts", get(all_posts))
        .route("/api/posts/paged", get(paged_posts))
        .route("/api/posts/recent", get(recent_posts))
        .route("/api/posts/:slug", get(post_by_slug))
        .route("/api/authors/:slug/posts", get(posts_by_author))
        .route("/api/comments", post(create_comment))
        .route("/api/last-update", get(last_update))
}

/// Errors returned to API callers as `{ "error": ... }`.
#[derive(Debug)]
enum ApiError {
    Upstream(PostError),
    NotFound(&'static str),
    BadRequest(String),
}

impl From<PostError> for ApiError {
    fn from(e: PostError) -> Self {
        Self::Upstream(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Upstream(e) => {
                tracing::error!("CMS request failed: {e}");
                (StatusCode::BAD_GATEWAY, "CMS request failed".to_string())
            }
            Self::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct PostsBody {
    posts: Vec<Post>,
}

#[derive(Debug, Serialize)]
struct PostBody {
    post: Post,
}

async fn health() -> &'static str {
    "OK"
}

async fn all_posts(State(state): State<AppState>) -> Result<Json<PostsBody>, ApiError> {
    let posts = state.posts.get_all_posts().await?;
    Ok(Json(PostsBody { posts }))
}

#[derive(Debug, Deserialize)]
struct PagedParams {
    offset: Option<u32>,
    size: Option<u32>,
}

async fn paged_posts(
    State(state): State<AppState>,
    Query(params): Query<PagedParams>,
) -> Result<Json<PagedPosts>, ApiError> {
    let page = state
        .posts
        .get_paged_posts(
            params.offset.unwrap_or(0),
            params.size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
        .await?;
    Ok(Json(page))
}

#[derive(Debug, Deserialize)]
struct RecentParams {
    count: Option<usize>,
}

async fn recent_posts(
    State(state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> Result<Json<PostsBody>, ApiError> {
    let count = params.count.unwrap_or(DEFAULT_RECENT_COUNT);
    let posts = state.posts.get_recent_posts(count).await?;
    Ok(Json(PostsBody { posts }))
}

async fn post_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PostBody>, ApiError> {
    match state.posts.get_post_by_slug(&slug).await? {
        Some(post) => Ok(Json(PostBody { post })),
        None => Err(ApiError::NotFound("Post")),
    }
}

async fn posts_by_author(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PostsBody>, ApiError> {
    let posts = state.posts.get_posts_by_author_slug(&slug).await?;
    Ok(Json(PostsBody { posts }))
}

#[derive(Debug, Deserialize)]
struct CommentRequest {
    #[serde(default)]
    content: String,
}

async fn create_comment(
    State(state): State<AppState>,
    Json(request): Json<CommentRequest>,
) -> Result<Json<CommentResult>, ApiError> {
    let result = state.posts.set_comment(&request.content).await?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
struct LastUpdateParams {
    at: String,
}

#[derive(Debug, Serialize)]
struct LastUpdateBody {
    label: String,
}

async fn last_update(
    Query(params): Query<LastUpdateParams>,
) -> Result<Json<LastUpdateBody>, ApiError> {
    let updated_at = parse_date(&params.at)
        .ok_or_else(|| ApiError::BadRequest(format!("invalid date: {}", params.at)))?;
    Ok(Json(LastUpdateBody {
        label: last_update_label(updated_at, Utc::now()),
    }))
}
