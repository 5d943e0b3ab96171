use super::model::Post;
use crate::datetime::parse_date;

/// Sort posts newest first by `date`.
///
/// The sort is stable, so posts sharing a date keep their relative order.
/// Posts with a missing or unparseable date go after all dated posts.
pub fn sort_posts_by_date(posts: &mut [Post]) {
    posts.sort_by_cached_key(|post| std::cmp::Reverse(post.date.as_deref().and_then(parse_date)));
}

/// The `count` most recent posts.
#[must_use]
pub fn recent_posts(mut posts: Vec<Post>, count: usize) -> Vec<Post> {
    sort_posts_by_date(&mut posts);
    posts.truncate(count);
    posts
}
