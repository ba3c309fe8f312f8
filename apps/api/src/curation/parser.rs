//! Strict parse-or-reject for curation responses.
//!
//! The model's output is untrusted free text. A response that is not a JSON object,
//! or that yields no usable resource, is an `Err` so the caller can move on to the
//! next tier. Inside a valid object, a category that is not a list or an entry that
//! is not an object is skipped on its own.

use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::llm_client::strip_json_fences;
use crate::models::resource::{Category, CategoryMap, Resource};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CurationError {
    #[error("response contained no JSON object")]
    NoJsonObject,

    #[error("response did not match the curation schema: {0}")]
    Malformed(String),

    #[error("response contained no usable resources")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct RawCuration {
    #[serde(default, alias = "documentation")]
    docs: Value,
    #[serde(default)]
    blogs: Value,
    #[serde(default, alias = "youtube")]
    videos: Value,
    #[serde(default)]
    free_courses: Value,
    #[serde(default)]
    paid_courses: Value,
}

/// Fields stay loosely typed; models emit prices as `49.99` as often as `"$49.99"`.
#[derive(Debug, Deserialize)]
struct RawResource {
    title: Option<Value>,
    url: Option<Value>,
    description: Option<Value>,
    platform: Option<Value>,
    price: Option<Value>,
}

fn text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl RawResource {
    /// Entries without a title or an absolute http(s) URL are dropped.
    fn into_resource(self) -> Option<Resource> {
        let title = text(self.title).filter(|t| !t.trim().is_empty())?;
        let url = text(self.url).filter(|u| is_web_url(u.trim()))?;

        Some(
            Resource::new(title, url)
                .with_description(text(self.description).unwrap_or_default())
                .with_platform(text(self.platform).unwrap_or_default())
                .with_price(text(self.price).unwrap_or_default()),
        )
    }
}

/// Non-list categories and non-object entries yield nothing.
fn category_resources(value: Value) -> Vec<Resource> {
    let Value::Array(entries) = value else {
        return Vec::new();
    };
    entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<RawResource>(entry).ok())
        .filter_map(RawResource::into_resource)
        .collect()
}

fn is_web_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
        .unwrap_or(false)
}

/// Narrows model output to the outermost `{ ... }` after removing code fences.
fn extract_json_object(text: &str) -> Option<&str> {
    let text = strip_json_fences(text);
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parses a curation response into categorized resources.
///
/// Category order and in-category order are preserved; the per-category cap is
/// applied later by `LearningPath::new`.
pub fn parse_curation(text: &str) -> Result<CategoryMap, CurationError> {
    let json = extract_json_object(text).ok_or(CurationError::NoJsonObject)?;

    let raw: RawCuration =
        serde_json::from_str(json).map_err(|e| CurationError::Malformed(e.to_string()))?;

    let mut categories = CategoryMap::default();
    let buckets = [
        (Category::Docs, raw.docs),
        (Category::Blogs, raw.blogs),
        (Category::Videos, raw.videos),
        (Category::FreeCourses, raw.free_courses),
        (Category::PaidCourses, raw.paid_courses),
    ];
    for (category, entries) in buckets {
        *categories.get_mut(category) = category_resources(entries);
    }

    if categories.is_empty() {
        return Err(CurationError::Empty);
    }

    Ok(categories)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "docs": [
            {"title": "The Rust Book", "url": "https://doc.rust-lang.org/book/", "description": "Official book", "platform": "Official", "price": "Free"}
        ],
        "blogs": [
            {"title": "This Week in Rust", "url": "https://this-week-in-rust.org"}
        ],
        "videos": [],
        "free_courses": [],
        "paid_courses": [
            {"title": "Ultimate Rust Crash Course", "url": "https://www.udemy.com/course/ultimate-rust-crash-course/", "price": "$19.99"}
        ]
    }"#;

    #[test]
    fn test_parse_valid_response() {
        let categories = parse_curation(VALID).unwrap();
        assert_eq!(categories.docs.len(), 1);
        assert_eq!(categories.docs[0].title, "The Rust Book");
        assert_eq!(categories.docs[0].price.as_deref(), Some("Free"));
        assert_eq!(categories.blogs[0].description, None);
        assert_eq!(categories.paid_courses[0].price.as_deref(), Some("$19.99"));
        assert_eq!(categories.total(), 3);
    }

    #[test]
    fn test_parse_fenced_response() {
        let fenced = format!("```json\n{VALID}\n```");
        assert_eq!(parse_curation(&fenced).unwrap().total(), 3);
    }

    #[test]
    fn test_parse_response_wrapped_in_prose() {
        let chatty = format!("Sure! Here are some great resources:\n{VALID}\nHappy learning!");
        assert_eq!(parse_curation(&chatty).unwrap().total(), 3);
    }

    #[test]
    fn test_truncated_json_is_malformed() {
        let truncated = &VALID[..VALID.len() / 2];
        // A truncated body may still contain a '}' from an inner object.
        let err = parse_curation(truncated).unwrap_err();
        assert!(
            matches!(err, CurationError::Malformed(_) | CurationError::NoJsonObject),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn test_plain_text_has_no_json_object() {
        assert_eq!(
            parse_curation("I'm sorry, I can't help with that."),
            Err(CurationError::NoJsonObject)
        );
        assert_eq!(parse_curation(""), Err(CurationError::NoJsonObject));
    }

    #[test]
    fn test_non_object_json_is_malformed() {
        let err = parse_curation(r#"{"docs": [}"#).unwrap_err();
        assert!(matches!(err, CurationError::Malformed(_)));
    }

    #[test]
    fn test_non_list_category_is_skipped() {
        let json = r#"{
            "docs": [{"title": "A", "url": "https://a.dev"}],
            "videos": null,
            "blogs": "https://react.dev/blog"
        }"#;
        let categories = parse_curation(json).unwrap();
        assert_eq!(categories.docs[0].title, "A");
        assert!(categories.videos.is_empty());
        assert!(categories.blogs.is_empty());
    }

    #[test]
    fn test_non_object_entry_is_skipped() {
        let json = r#"{
            "docs": ["https://a.dev", 42, {"title": "A", "url": "https://a.dev"}]
        }"#;
        let categories = parse_curation(json).unwrap();
        assert_eq!(categories.docs.len(), 1);
        assert_eq!(categories.docs[0].title, "A");
    }

    #[test]
    fn test_numeric_price_is_kept_as_text() {
        let json = r#"{
            "paid_courses": [{"title": "Course", "url": "https://course.dev", "price": 49.99}],
            "free_courses": [{"title": "Free", "url": "https://free.dev", "price": true}]
        }"#;
        let categories = parse_curation(json).unwrap();
        assert_eq!(categories.paid_courses[0].price.as_deref(), Some("49.99"));
        assert_eq!(categories.free_courses[0].price, None);
    }

    #[test]
    fn test_only_a_string_category_is_empty() {
        assert_eq!(
            parse_curation(r#"{"docs": "https://react.dev"}"#),
            Err(CurationError::Empty)
        );
    }

    #[test]
    fn test_entries_without_title_or_valid_url_are_dropped() {
        let json = r#"{
            "docs": [
                {"title": "", "url": "https://empty-title.dev"},
                {"title": "No URL"},
                {"title": "Relative", "url": "/docs/intro"},
                {"title": "FTP", "url": "ftp://files.example.com"},
                {"title": "Kept", "url": "https://kept.dev"}
            ]
        }"#;
        let categories = parse_curation(json).unwrap();
        assert_eq!(categories.docs.len(), 1);
        assert_eq!(categories.docs[0].title, "Kept");
    }

    #[test]
    fn test_no_usable_entries_is_empty() {
        assert_eq!(
            parse_curation(r#"{"docs": [{"title": "x"}], "blogs": []}"#),
            Err(CurationError::Empty)
        );
        assert_eq!(parse_curation("{}"), Err(CurationError::Empty));
    }

    #[test]
    fn test_legacy_keys_and_unknown_categories() {
        let json = r#"{
            "documentation": [{"title": "MDN", "url": "https://developer.mozilla.org"}],
            "youtube": [{"title": "Fireship", "url": "https://www.youtube.com/@Fireship"}],
            "books": [{"title": "Eloquent JavaScript", "url": "https://eloquentjavascript.net"}]
        }"#;
        let categories = parse_curation(json).unwrap();
        assert_eq!(categories.docs[0].title, "MDN");
        assert_eq!(categories.videos[0].title, "Fireship");
        assert_eq!(categories.total(), 2);
    }

    #[test]
    fn test_order_is_preserved() {
        let items: Vec<String> = (0..8)
            .map(|i| format!(r#"{{"title": "Post {i}", "url": "https://blog.dev/{i}"}}"#))
            .collect();
        let json = format!(r#"{{"blogs": [{}]}}"#, items.join(","));
        let categories = parse_curation(&json).unwrap();
        let titles: Vec<_> = categories.blogs.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles[0], "Post 0");
        assert_eq!(titles[7], "Post 7");
    }
}
