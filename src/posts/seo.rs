use url::Url;

use super::model::{ArticleMeta, OpenGraph, Post, Robots, SeoRaw, TwitterCard};
use crate::config::host_with_port;

/// Merge SEO plugin data onto a mapped post.
///
/// `api_host` is the host of the CMS GraphQL endpoint. The plugin always fills
/// in a canonical link pointing at the CMS itself; that one is dropped so the
/// site's own canonical logic applies, and only a real override is kept.
pub fn apply_seo(post: &mut Post, seo: SeoRaw, api_host: &str) {
    post.meta_title = seo.title;
    post.meta_description = seo.meta_desc;
    post.reading_time = seo.reading_time;
    post.canonical = seo
        .canonical
        .filter(|canonical| is_custom_canonical(canonical, api_host));

    let og = OpenGraph {
        author: seo.opengraph_author,
        description: seo.opengraph_description,
        image: seo.opengraph_image,
        modified_time: seo.opengraph_modified_time,
        published_time: seo.opengraph_published_time,
        publisher: seo.opengraph_publisher,
        title: seo.opengraph_title,
        og_type: seo.opengraph_type,
    };
    post.article = Some(article_from_og(&og));
    post.og = Some(og);

    post.robots = Some(Robots {
        nofollow: seo.meta_robots_nofollow,
        noindex: seo.meta_robots_noindex,
    });

    post.twitter = Some(TwitterCard {
        description: seo.twitter_description,
        image: seo.twitter_image,
        title: seo.twitter_title,
    });
}

fn article_from_og(og: &OpenGraph) -> ArticleMeta {
    ArticleMeta {
        author: og.author.clone(),
        modified_time: og.modified_time.clone(),
        published_time: og.published_time.clone(),
        publisher: og.publisher.clone(),
    }
}

/// A canonical URL without a host (relative, or unparseable) is never the
/// CMS default, so it counts as custom.
fn is_custom_canonical(canonical: &str, api_host: &str) -> bool {
    if canonical.is_empty() {
        return false;
    }
    match Url::parse(canonical).ok().as_ref().and_then(host_with_port) {
        Some(host) => !host.eq_ignore_ascii_case(api_host),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const API_HOST: &str = "cms.example.com";

    fn full_seo() -> SeoRaw {
        serde_json::from_value(json!({
            "title": "Front line update | Monitor",
            "metaDesc": "Daily summary",
            "readingTime": 4.0,
            "canonical": "https://cms.example.com/front-line-update/",
            "opengraphAuthor": "Olena",
            "opengraphDescription": "OG description",
            "opengraphImage": { "sourceUrl": "https://cms.example.com/og.png" },
            "opengraphModifiedTime": "2022-03-02T10:00:00+00:00",
            "opengraphPublishedTime": "2022-03-01T10:00:00+00:00",
            "opengraphPublisher": "Monitor",
            "opengraphTitle": "OG title",
            "opengraphType": "article",
            "metaRobotsNofollow": "follow",
            "metaRobotsNoindex": "index",
            "twitterDescription": "Tw description",
            "twitterImage": null,
            "twitterTitle": "Tw title",
        }))
        .unwrap()
    }

    #[test]
    fn test_apply_seo_projects_fields() {
        let mut post = Post::default();
        apply_seo(&mut post, full_seo(), API_HOST);

        assert_eq!(post.meta_title.as_deref(), Some("Front line update | Monitor"));
        assert_eq!(post.meta_description.as_deref(), Some("Daily summary"));
        assert_eq!(post.reading_time, Some(4.0));

        let og = post.og.as_ref().unwrap();
        assert_eq!(og.title.as_deref(), Some("OG title"));
        assert_eq!(og.og_type.as_deref(), Some("article"));
        assert_eq!(
            og.image,
            Some(json!({ "sourceUrl": "https://cms.example.com/og.png" }))
        );

        assert_eq!(
            post.robots,
            Some(Robots {
                nofollow: Some("follow".to_string()),
                noindex: Some("index".to_string()),
            })
        );

        let twitter = post.twitter.as_ref().unwrap();
        assert_eq!(twitter.title.as_deref(), Some("Tw title"));
        assert!(twitter.image.is_none());
    }

    #[test]
    fn test_article_mirrors_og() {
        let mut post = Post::default();
        apply_seo(&mut post, full_seo(), API_HOST);

        let og = post.og.as_ref().unwrap();
        let article = post.article.as_ref().unwrap();
        assert_eq!(article.author, og.author);
        assert_eq!(article.modified_time, og.modified_time);
        assert_eq!(article.published_time, og.published_time);
        assert_eq!(article.publisher, og.publisher);
    }

    #[test]
    fn test_canonical_on_api_host_is_omitted() {
        let mut post = Post::default();
        apply_seo(&mut post, full_seo(), API_HOST);

        assert!(post.canonical.is_none());
        let value = serde_json::to_value(&post).unwrap();
        assert!(value.get("canonical").is_none());
    }

    #[test]
    fn test_canonical_on_other_host_is_kept() {
        let seo = SeoRaw {
            canonical: Some("https://news.example.org/original-story?ref=1".to_string()),
            ..SeoRaw::default()
        };
        let mut post = Post::default();
        apply_seo(&mut post, seo, API_HOST);

        assert_eq!(
            post.canonical.as_deref(),
            Some("https://news.example.org/original-story?ref=1")
        );
    }

    #[test]
    fn test_canonical_host_comparison() {
        assert!(!is_custom_canonical("https://CMS.example.com/a", API_HOST));
        assert!(!is_custom_canonical("http://cms.example.com/a", API_HOST));
        assert!(is_custom_canonical("https://cms.example.com:8443/a", API_HOST));
        assert!(!is_custom_canonical("http://localhost:8000/a", "localhost:8000"));
        // Substring of the API host in the path is not the API host
        assert!(is_custom_canonical("https://mirror.org/cms.example.com", API_HOST));
        assert!(is_custom_canonical("/relative/path", API_HOST));
        assert!(!is_custom_canonical("", API_HOST));
    }

    #[test]
    fn test_empty_seo_leaves_sub_objects_empty() {
        let mut post = Post::default();
        apply_seo(&mut post, SeoRaw::default(), API_HOST);

        assert!(post.meta_title.is_none());
        assert!(post.canonical.is_none());
        assert_eq!(post.og, Some(OpenGraph::default()));
        assert_eq!(post.article, Some(ArticleMeta::default()));
    }
}
