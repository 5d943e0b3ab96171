use super::model::{Post, RawPost};

/// Keys owned by the SEO projection. Raw values under these names would
/// serialize next to the typed fields, so they are dropped.
const SEO_KEYS: [&str; 8] = [
    "metaTitle",
    "metaDescription",
    "readingTime",
    "canonical",
    "og",
    "article",
    "robots",
    "twitter",
];

/// Flatten a CMS post into a [`Post`].
///
/// The `{ node }` wrappers around `author` and `featuredImage` are removed so
/// renderers address fields directly, and the author avatar is moved to https.
/// A missing author or image (or a wrapper without a node) stays absent.
#[must_use]
pub fn map_post_data(raw: RawPost) -> Post {
    let mut extra = raw.extra;
    extra.retain(|key, _| !SEO_KEYS.contains(&key.as_str()));

    let author = raw.author.and_then(|edge| edge.node).map(|mut author| {
        // Gravatar URLs come back as http and trigger mixed content warnings
        author.avatar = author.avatar.as_deref().map(update_user_avatar);
        author
    });

    Post {
        id: raw.id,
        database_id: raw.database_id,
        title: raw.title,
        slug: raw.slug,
        date: raw.date,
        modified: raw.modified,
        content: raw.content,
        excerpt: raw.excerpt,
        uri: raw.uri,
        is_sticky: raw.is_sticky,
        categories: raw.categories,
        author,
        featured_image: raw.featured_image.and_then(|edge| edge.node),
        extra,
        ..Post::default()
    }
}

/// Map a list of CMS posts, keeping order and length.
#[must_use]
pub fn map_posts(raw: Vec<RawPost>) -> Vec<Post> {
    raw.into_iter().map(map_post_data).collect()
}

/// Rewrite an `http://` avatar URL to `https://`.
///
/// Everything after the scheme is left byte-for-byte intact. Any other input
/// is returned unchanged.
#[must_use]
pub fn update_user_avatar(url: &str) -> String {
    const INSECURE: &str = "http://";

    match url.get(..INSECURE.len()) {
        Some(scheme) if scheme.eq_ignore_ascii_case(INSECURE) => {
            format!("https://{}", &url[INSECURE.len()..])
        }
        _ => url.to_string(),
    }
}
