use std::sync::Arc;

use anyhow::Context;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use super::mapping::{map_post_data, map_posts};
use super::model::{Edge, Pagination, Post, RawPost, SeoRaw};
use super::recent::recent_posts;
use super::seo::apply_seo;
use super::PostError;
use crate::config::Config;
use crate::graphql::queries::{
    MUTATION_CREATE_COMMENT, QUERY_ALL_POSTS, QUERY_PAGED_POSTS, QUERY_POSTS_BY_AUTHOR_SLUG,
    QUERY_POST_BY_SLUG, QUERY_POST_SEO_BY_SLUG,
};
use crate::graphql::{GraphqlError, GraphqlTransport, HttpGraphqlClient};

pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Source of the numeric suffix for anonymous comment authors.
pub trait AuthorIdGenerator: Send + Sync {
    /// A number in `0..10_000`.
    fn next_id(&self) -> u32;
}

/// Draws author ids from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAuthorIds;

impl AuthorIdGenerator for RandomAuthorIds {
    fn next_id(&self) -> u32 {
        rand::thread_rng().gen_range(0..10_000)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentResult {
    pub success: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PagedPosts {
    pub posts: Vec<Post>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
struct PostData {
    post: Option<RawPost>,
}

#[derive(Debug, Deserialize)]
struct SeoData {
    post: Option<SeoPost>,
}

#[derive(Debug, Deserialize)]
struct SeoPost {
    seo: Option<SeoRaw>,
}

#[derive(Debug, Deserialize)]
struct PostsData {
    posts: PostConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostConnection {
    #[serde(default)]
    edges: Vec<Edge<RawPost>>,
    page_info: Option<PageInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    offset_pagination: Option<Pagination>,
}

impl PostConnection {
    /// Unwrap `edges[].node`, keeping one entry per edge.
    fn into_raw_posts(self) -> Vec<RawPost> {
        self.edges
            .into_iter()
            .map(|edge| edge.node.unwrap_or_default())
            .collect()
    }
}

/// Fetches posts from the CMS and returns them normalized.
#[derive(Clone)]
pub struct PostService {
    transport: Arc<dyn GraphqlTransport>,
    api_host: String,
    seo_enabled: bool,
    author_ids: Arc<dyn AuthorIdGenerator>,
}

impl PostService {
    /// Create a service over an existing transport.
    ///
    /// `api_host` is the CMS endpoint host used to recognise default SEO
    /// canonical links.
    #[must_use]
    pub fn new(
        transport: Arc<dyn GraphqlTransport>,
        api_host: impl Into<String>,
        seo_enabled: bool,
    ) -> Self {
        Self {
            transport,
            api_host: api_host.into(),
            seo_enabled,
            author_ids: Arc::new(RandomAuthorIds),
        }
    }

    /// Create a service talking HTTP to the configured CMS endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is invalid or the HTTP client cannot
    /// be built.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_host = config.api_host().context("Invalid CMS endpoint")?;
        let client = HttpGraphqlClient::new(&config.graphql_endpoint, config.request_timeout)
            .context("Failed to create GraphQL client")?;
        Ok(Self::new(
            Arc::new(client),
            api_host,
            config.seo_plugin_enabled,
        ))
    }

    /// Replace the generator used for anonymous comment authors.
    #[must_use]
    pub fn with_author_ids(mut self, author_ids: Arc<dyn AuthorIdGenerator>) -> Self {
        self.author_ids = author_ids;
        self
    }

    /// Fetch one post by slug, with SEO fields when the plugin is enabled.
    ///
    /// Returns `None` when the CMS has no post with that slug.
    ///
    /// # Errors
    ///
    /// Returns an error if either query fails or returns an unexpected shape.
    pub async fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>, PostError> {
        let data = self
            .transport
            .query(&QUERY_POST_BY_SLUG, json!({ "slug": slug }))
            .await
            .map_err(|e| {
                error!(operation = "get_post_by_slug", slug, "Failed to query post data: {e}");
                e
            })?;

        let Some(raw) = decode::<PostData>("post", data)?.post else {
            debug!(slug, "Post not found");
            return Ok(None);
        };
        let mut post = map_post_data(raw);

        if self.seo_enabled {
            let data = self
                .transport
                .query(QUERY_POST_SEO_BY_SLUG, json!({ "slug": slug }))
                .await
                .map_err(|e| {
                    error!(
                        operation = "get_post_by_slug",
                        slug,
                        "Failed to query SEO plugin: {e}"
                    );
                    warn!("Is the SEO plugin installed? If not, set WORDPRESS_PLUGIN_SEO=false");
                    e
                })?;

            let seo = decode::<SeoData>("post SEO", data)?
                .post
                .and_then(|p| p.seo)
                .unwrap_or_default();
            apply_seo(&mut post, seo, &self.api_host);
        }

        Ok(Some(post))
    }

    /// Fetch every post.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or returns an unexpected shape.
    pub async fn get_all_posts(&self) -> Result<Vec<Post>, PostError> {
        let data = self
            .transport
            .query(&QUERY_ALL_POSTS, json!({}))
            .await
            .map_err(log_query_failure("get_all_posts"))?;

        let connection = decode::<PostsData>("posts", data)?.posts;
        Ok(map_posts(connection.into_raw_posts()))
    }

    /// Fetch one page of posts together with the CMS pagination block.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or returns an unexpected shape.
    pub async fn get_paged_posts(&self, offset: u32, size: u32) -> Result<PagedPosts, PostError> {
        let data = self
            .transport
            .query(
                &QUERY_PAGED_POSTS,
                json!({ "offset": offset, "size": size }),
            )
            .await
            .map_err(log_query_failure("get_paged_posts"))?;

        let mut connection = decode::<PostsData>("paged posts", data)?.posts;
        let pagination = connection
            .page_info
            .take()
            .and_then(|info| info.offset_pagination)
            .unwrap_or_default();

        Ok(PagedPosts {
            posts: map_posts(connection.into_raw_posts()),
            pagination,
        })
    }

    /// Fetch every post by one author.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or returns an unexpected shape.
    pub async fn get_posts_by_author_slug(&self, slug: &str) -> Result<Vec<Post>, PostError> {
        let data = self
            .transport
            .query(&QUERY_POSTS_BY_AUTHOR_SLUG, json!({ "slug": slug }))
            .await
            .map_err(|e| {
                error!(
                    operation = "get_posts_by_author_slug",
                    slug,
                    "Failed to query post data: {e}"
                );
                e
            })?;

        let connection = decode::<PostsData>("author posts", data)?.posts;
        Ok(map_posts(connection.into_raw_posts()))
    }

    /// The `count` newest posts.
    ///
    /// # Errors
    ///
    /// Returns an error if fetching all posts fails.
    pub async fn get_recent_posts(&self, count: usize) -> Result<Vec<Post>, PostError> {
        let posts = self.get_all_posts().await?;
        Ok(recent_posts(posts, count))
    }

    /// Post a comment under an anonymous author handle.
    ///
    /// Content is passed through as-is; the CMS validates it. A response that
    /// lacks `createComment.success` counts as a failed submission.
    ///
    /// # Errors
    ///
    /// Returns an error if the mutation request itself fails.
    pub async fn set_comment(&self, content: &str) -> Result<CommentResult, PostError> {
        let author = format!("anonymous-{}", self.author_ids.next_id());

        let data = self
            .transport
            .mutate(
                MUTATION_CREATE_COMMENT,
                json!({ "author": author, "content": content }),
            )
            .await
            .map_err(|e| {
                error!(operation = "set_comment", "Failed to create comment: {e}");
                e
            })?;

        let success = data.pointer("/createComment/success").and_then(Value::as_bool);
        if success.is_none() {
            warn!(response = %data, "createComment response missing success flag");
        }

        Ok(CommentResult {
            success: success.unwrap_or(false),
        })
    }
}

fn log_query_failure(operation: &'static str) -> impl Fn(GraphqlError) -> GraphqlError {
    move |e| {
        error!(operation, "Failed to query posts: {e}");
        e
    }
}

fn decode<T: DeserializeOwned>(operation: &'static str, data: Value) -> Result<T, PostError> {
    serde_json::from_value(data).map_err(|source| PostError::UnexpectedShape { operation, source })
}
