//! Blog posts from the CMS and their normalization into dashboard-ready form.
//!
//! The pure pipeline ([`map_post_data`], [`sanitize_excerpt`], [`apply_seo`],
//! [`recent_posts`]) does no I/O. [`PostService`] fetches through a
//! [`GraphqlTransport`](crate::graphql::GraphqlTransport) and runs responses
//! through it.

mod excerpt;
mod mapping;
pub mod model;
mod recent;
mod seo;
mod service;

use thiserror::Error;

use crate::graphql::GraphqlError;

pub use excerpt::{sanitize_excerpt, sanitize_excerpt_value};
pub use mapping::{map_post_data, map_posts, update_user_avatar};
pub use model::{Post, RawPost, SeoRaw};
pub use recent::{recent_posts, sort_posts_by_date};
pub use seo::apply_seo;
pub use service::{
    AuthorIdGenerator, CommentResult, PagedPosts, PostService, RandomAuthorIds,
    DEFAULT_PAGE_SIZE,
};

#[derive(Debug, Error)]
pub enum PostError {
    #[error("failed to sanitize excerpt: invalid type {0}")]
    InvalidExcerptType(&'static str),

    #[error(transparent)]
    Graphql(#[from] GraphqlError),

    #[error("unexpected {operation} response: {source}")]
    UnexpectedShape {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Site-relative path of a post page.
#[must_use]
pub fn post_path_by_slug(slug: &str) -> String {
    format!("/blog/{slug}")
}
