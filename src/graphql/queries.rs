//! WPGraphQL documents used by the post layer.

const POST_FIELDS: &str = r"
  fragment PostFields on Post {
    id
    databaseId
    title
    slug
    date
    modified
    excerpt
    uri
    isSticky
    author {
      node {
        id
        name
        slug
        avatar {
          url
        }
        description
      }
    }
    categories {
      edges {
        node {
          databaseId
          id
          name
          slug
        }
      }
    }
    featuredImage {
      node {
        id
        altText
        caption
        sourceUrl
        srcSet
        sizes
      }
    }
  }
";

/// Every published post, newest first.
pub static QUERY_ALL_POSTS: std::sync::LazyLock<String> = std::sync::LazyLock::new(|| {
    format!(
        "{POST_FIELDS}
  query AllPosts {{
    posts(first: 10000, where: {{ hasPassword: false }}) {{
      edges {{
        node {{
          ...PostFields
          content
        }}
      }}
    }}
  }}"
    )
});

/// One page of posts via the offset-pagination extension.
pub static QUERY_PAGED_POSTS: std::sync::LazyLock<String> = std::sync::LazyLock::new(|| {
    format!(
        "{POST_FIELDS}
  query PagedPosts($offset: Int, $size: Int) {{
    posts(where: {{ hasPassword: false, offsetPagination: {{ offset: $offset, size: $size }} }}) {{
      edges {{
        node {{
          ...PostFields
        }}
      }}
      pageInfo {{
        offsetPagination {{
          hasMore
          hasPrevious
          total
        }}
      }}
    }}
  }}"
    )
});

pub static QUERY_POST_BY_SLUG: std::sync::LazyLock<String> = std::sync::LazyLock::new(|| {
    format!(
        "{POST_FIELDS}
  query PostBySlug($slug: ID!) {{
    post(id: $slug, idType: SLUG) {{
      ...PostFields
      content
    }}
  }}"
    )
});

pub static QUERY_POSTS_BY_AUTHOR_SLUG: std::sync::LazyLock<String> =
    std::sync::LazyLock::new(|| {
        format!(
            "{POST_FIELDS}
  query PostsByAuthorSlug($slug: String!) {{
    posts(where: {{ authorName: $slug, hasPassword: false }}) {{
      edges {{
        node {{
          ...PostFields
        }}
      }}
    }}
  }}"
        )
    });

/// Yoast SEO fields for one post. Only valid when the plugin is installed.
pub const QUERY_POST_SEO_BY_SLUG: &str = r"
  query PostSEOBySlug($slug: ID!) {
    post(id: $slug, idType: SLUG) {
      id
      seo {
        canonical
        metaDesc
        metaRobotsNofollow
        metaRobotsNoindex
        opengraphAuthor
        opengraphDescription
        opengraphModifiedTime
        opengraphPublishedTime
        opengraphPublisher
        opengraphTitle
        opengraphType
        readingTime
        title
        twitterDescription
        twitterTitle
        twitterImage {
          altText
          sourceUrl
          mediaDetails {
            width
            height
          }
        }
        opengraphImage {
          altText
          sourceUrl
          mediaDetails {
            height
            width
          }
        }
      }
    }
  }
";

pub const MUTATION_CREATE_COMMENT: &str = r"
  mutation CreateComment($author: String, $content: String) {
    createComment(input: { commentOn: 1, content: $content, author: $author }) {
      success
    }
  }
";
