//! Clean-up of auto-generated WordPress excerpts.
//!
//! Themes append a `[&hellip;]` marker and often a "Continue reading" link to
//! generated excerpts. Neither reads well on the dashboard, so they are
//! rewritten by a fixed, ordered list of rules. Later rules rely on the output
//! of earlier ones.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::PostError;

const ELLIPSIS: &str = "&hellip;";

static BRACKETED_ELLIPSIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s?\[&hellip;\]").unwrap());

static MORE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)\s*\w*<a\b[^>]*\bclass="(?:[^"]*\s)?more-link(?:\s[^"]*)?"[^>]*>.*?</a>"#,
    )
    .unwrap()
});

type Rule = fn(&str) -> String;

/// Applied in this order on every pass.
const RULES: [Rule; 4] = [
    collapse_bracketed_ellipsis,
    collapse_four_dots,
    collapse_period_ellipsis,
    strip_more_link,
];

/// Sanitize an excerpt string.
///
/// The rule list is re-applied until a pass changes nothing, so the result is
/// a fixed point: sanitizing it again returns it unchanged. Every rule
/// shortens the text, which bounds the number of passes.
#[must_use]
pub fn sanitize_excerpt(excerpt: &str) -> String {
    let mut current = excerpt.to_string();
    loop {
        let next = RULES.iter().fold(current.clone(), |text, rule| rule(&text));
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Sanitize an excerpt taken straight from a JSON response.
///
/// # Errors
///
/// Returns [`PostError::InvalidExcerptType`] if the value is not a string.
pub fn sanitize_excerpt_value(excerpt: &Value) -> Result<String, PostError> {
    match excerpt {
        Value::String(text) => Ok(sanitize_excerpt(text)),
        other => Err(PostError::InvalidExcerptType(json_type_name(other))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// ` [&hellip;]` becomes a bare `&hellip;`.
fn collapse_bracketed_ellipsis(text: &str) -> String {
    BRACKETED_ELLIPSIS.replace_all(text, ELLIPSIS).into_owned()
}

/// Four dots are a sentence end that ran into an ellipsis.
fn collapse_four_dots(text: &str) -> String {
    text.replace("....", ".")
}

fn collapse_period_ellipsis(text: &str) -> String {
    text.replace(".&hellip;", ".")
}

/// Drop the theme's "Continue reading" anchor and the word glued to it.
fn strip_more_link(text: &str) -> String {
    MORE_LINK.replace_all(text, "").into_owned()
}
