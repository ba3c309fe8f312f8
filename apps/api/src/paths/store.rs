use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::path::{ActionKind, PathStats, PathSummary, PersistedPath};
use crate::models::resource::LearningPath;

pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const MAX_LIST_LIMIT: i64 = 100;
pub const POPULAR_TOPICS_LIMIT: i64 = 5;

const SLUG_TOPIC_MAX_CHARS: usize = 15;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Learning path {0} not found")]
    NotFound(Uuid),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Listing filter. `limit` is clamped to `1..=MAX_LIST_LIMIT`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: Option<i64>,
    /// Case-insensitive substring match on the topic.
    pub topic: Option<String>,
}

impl ListQuery {
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .clamp(1, MAX_LIST_LIMIT)
    }

    pub fn topic_filter(&self) -> Option<&str> {
        self.topic.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

/// Persistence for generated learning paths and their usage actions.
#[async_trait]
pub trait PathStore: Send + Sync {
    async fn save(&self, path: &LearningPath) -> Result<PersistedPath, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<PersistedPath>, StoreError>;

    /// Newest first.
    async fn list(&self, query: &ListQuery) -> Result<Vec<PathSummary>, StoreError>;

    /// Returns `false` when no path had that id.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Fails with `StoreError::NotFound` if the path does not exist.
    async fn record_action(&self, id: Uuid, action: ActionKind) -> Result<(), StoreError>;

    async fn stats(&self) -> Result<PathStats, StoreError>;

    /// Backend label for the health endpoint.
    fn backend(&self) -> &'static str;
}

/// Builds `<topic-slug>_res_<day>_<month>`, e.g. `react_res_19_october`.
pub fn path_slug(topic: &str, at: DateTime<Utc>) -> String {
    let mut slug = String::new();
    for c in topic.trim().to_lowercase().chars() {
        let mapped = if c.is_alphanumeric() || c == '_' {
            Some(c)
        } else if c.is_whitespace() || c == '-' {
            Some('_')
        } else {
            None
        };
        if let Some(c) = mapped {
            if !(c == '_' && slug.ends_with('_')) {
                slug.push(c);
            }
        }
    }

    let cropped: String = slug
        .trim_matches('_')
        .chars()
        .take(SLUG_TOPIC_MAX_CHARS)
        .collect();
    let mut base = cropped.trim_end_matches('_').to_string();
    if base.is_empty() {
        base.push_str("path");
    }

    format!(
        "{base}_res_{}_{}",
        at.format("%d"),
        at.format("%B").to_string().to_lowercase()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn oct19() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_path_slug_simple_topic() {
        assert_eq!(path_slug("React", oct19()), "react_res_19_october");
    }

    #[test]
    fn test_path_slug_normalizes_separators_and_punctuation() {
        assert_eq!(
            path_slug("  C++ / Data-Structures ", oct19()),
            "c_data_structur_res_19_october"
        );
        assert_eq!(path_slug("node.js", oct19()), "nodejs_res_19_october");
    }

    #[test]
    fn test_path_slug_crops_without_trailing_underscore() {
        // Cropping can leave a trailing separator, which is dropped.
        assert_eq!(path_slug("Machine Learning", oct19()), "machine_learnin_res_19_october");
        assert_eq!(path_slug("advanced rustac xyz", oct19()), "advanced_rustac_res_19_october");
        assert_eq!(path_slug("advanced rusta xyz", oct19()), "advanced_rusta_res_19_october");
    }

    #[test]
    fn test_path_slug_empty_after_normalization() {
        assert_eq!(path_slug("+++", oct19()), "path_res_19_october");
    }

    #[test]
    fn test_path_slug_pads_day() {
        let at = Utc.with_ymd_and_hms(2026, 3, 7, 0, 0, 0).unwrap();
        assert_eq!(path_slug("Go", at), "go_res_07_march");
    }

    #[test]
    fn test_list_query_limit_is_clamped() {
        assert_eq!(ListQuery::default().effective_limit(), DEFAULT_LIST_LIMIT);
        let q = |limit| ListQuery { limit: Some(limit), topic: None };
        assert_eq!(q(0).effective_limit(), 1);
        assert_eq!(q(500).effective_limit(), MAX_LIST_LIMIT);
        assert_eq!(q(7).effective_limit(), 7);
    }

    #[test]
    fn test_list_query_blank_topic_is_no_filter() {
        let query = ListQuery { limit: None, topic: Some("   ".to_string()) };
        assert_eq!(query.topic_filter(), None);
    }
}
