//! Typed shapes for CMS post records, both as returned by WPGraphQL and after
//! normalization.
//!
//! Every field is optional: the CMS omits anything the query did not select
//! and returns `null` for unset values. Fields the queries select but that are
//! not modeled here land in `extra` and are carried through unchanged.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The `{ node: ... }` wrapper WPGraphQL puts around connected objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Edge<T> {
    pub node: Option<T>,
}

/// A post exactly as returned by the CMS.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPost {
    pub id: Option<String>,
    pub database_id: Option<i64>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub date: Option<String>,
    pub modified: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub uri: Option<String>,
    pub is_sticky: Option<bool>,
    pub categories: Option<Value>,
    pub author: Option<Edge<Author>>,
    pub featured_image: Option<Edge<FeaturedImage>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Gravatar URL. WordPress hands these out over plain http.
    ///
    /// WPGraphQL returns an `Avatar` object; only its `url` is kept.
    #[serde(
        default,
        deserialize_with = "avatar_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AvatarField {
    Url(String),
    Object { url: Option<String> },
}

fn avatar_url<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let field = Option::<AvatarField>::deserialize(deserializer)?;
    Ok(field.and_then(|field| match field {
        AvatarField::Url(url) => Some(url),
        AvatarField::Object { url } => url,
    }))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src_set: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizes: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fields exposed by the Yoast SEO extension for WPGraphQL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoRaw {
    pub title: Option<String>,
    pub meta_desc: Option<String>,
    /// Minutes. Declared as a GraphQL `Float`, so `4.0` is as likely as `4`.
    pub reading_time: Option<f64>,
    pub canonical: Option<String>,
    pub opengraph_author: Option<String>,
    pub opengraph_description: Option<String>,
    pub opengraph_image: Option<Value>,
    pub opengraph_modified_time: Option<String>,
    pub opengraph_published_time: Option<String>,
    pub opengraph_publisher: Option<String>,
    pub opengraph_title: Option<String>,
    pub opengraph_type: Option<String>,
    pub meta_robots_nofollow: Option<String>,
    pub meta_robots_noindex: Option<String>,
    pub twitter_description: Option<String>,
    pub twitter_image: Option<Value>,
    pub twitter_title: Option<String>,
}

/// A normalized, UI-ready post.
///
/// `author` and `featured_image` are the inner nodes with the wrapper removed.
/// The SEO fields are only populated when the SEO plugin is enabled; renderers
/// fall back to their own defaults when they are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_sticky: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<FeaturedImage>,

    // SEO
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<f64>,
    /// Only set when the SEO plugin supplied a canonical URL on a host other
    /// than the CMS itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og: Option<OpenGraph>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article: Option<ArticleMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub robots: Option<Robots>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<TwitterCard>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraph {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub og_type: Option<String>,
}

/// `article:*` meta tags. Always derived from [`OpenGraph`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Robots {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nofollow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noindex: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TwitterCard {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Offset pagination block from the WPGraphQL offset-pagination extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_more: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_previous: Option<bool>,
}
