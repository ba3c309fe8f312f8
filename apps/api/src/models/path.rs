use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::resource::{CategoryMap, LearningPath};

/// Kinds of action recorded against a persisted path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Viewed,
    DownloadedPdf,
    DownloadedDoc,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Viewed => "viewed",
            ActionKind::DownloadedPdf => "downloaded_pdf",
            ActionKind::DownloadedDoc => "downloaded_doc",
        }
    }

    pub fn is_download(&self) -> bool {
        matches!(self, ActionKind::DownloadedPdf | ActionKind::DownloadedDoc)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "viewed" => Ok(ActionKind::Viewed),
            "downloaded_pdf" => Ok(ActionKind::DownloadedPdf),
            "downloaded_doc" => Ok(ActionKind::DownloadedDoc),
            other => Err(format!(
                "unknown action '{other}' (expected viewed, downloaded_pdf or downloaded_doc)"
            )),
        }
    }
}

/// A learning path as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersistedPath {
    pub id: Uuid,
    /// Human-readable key: `<topic-slug>_res_<day>_<month>`.
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub action_count: i64,
    #[serde(flatten)]
    pub path: LearningPath,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PathSummary {
    pub id: Uuid,
    pub slug: String,
    pub topic: String,
    pub resource_count: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TopicCount {
    pub topic: String,
    pub count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStats {
    pub total_learning_paths: i64,
    pub total_downloads: i64,
    pub total_views: i64,
    pub popular_topics: Vec<TopicCount>,
}

#[derive(Debug, Clone, FromRow)]
pub struct LearningPathRow {
    pub id: Uuid,
    pub slug: String,
    pub topic: String,
    pub data: Json<CategoryMap>,
    pub created_at: DateTime<Utc>,
    pub action_count: i64,
}

impl From<LearningPathRow> for PersistedPath {
    fn from(row: LearningPathRow) -> Self {
        PersistedPath {
            id: row.id,
            slug: row.slug,
            created_at: row.created_at,
            action_count: row.action_count,
            path: LearningPath::new(row.topic, row.data.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_kind_parses_known_values() {
        assert_eq!("viewed".parse::<ActionKind>(), Ok(ActionKind::Viewed));
        assert_eq!(
            " downloaded_pdf ".parse::<ActionKind>(),
            Ok(ActionKind::DownloadedPdf)
        );
        assert_eq!(
            "downloaded_doc".parse::<ActionKind>(),
            Ok(ActionKind::DownloadedDoc)
        );
        assert!("shared".parse::<ActionKind>().is_err());
    }

    #[test]
    fn test_action_kind_round_trips_through_as_str() {
        for kind in [
            ActionKind::Viewed,
            ActionKind::DownloadedPdf,
            ActionKind::DownloadedDoc,
        ] {
            assert_eq!(kind.as_str().parse::<ActionKind>(), Ok(kind));
        }
        assert!(!ActionKind::Viewed.is_download());
        assert!(ActionKind::DownloadedDoc.is_download());
    }
}
