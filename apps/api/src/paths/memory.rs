//! Process-local `PathStore`, used when no database is configured and in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{path_slug, ListQuery, PathStore, StoreError, POPULAR_TOPICS_LIMIT};
use crate::models::path::{ActionKind, PathStats, PathSummary, PersistedPath, TopicCount};
use crate::models::resource::LearningPath;

#[derive(Debug, Default)]
struct Inner {
    paths: HashMap<Uuid, PersistedPath>,
    actions: HashMap<Uuid, Vec<ActionKind>>,
}

#[derive(Debug, Default)]
pub struct InMemoryPathStore {
    inner: RwLock<Inner>,
}

impl InMemoryPathStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn summary(path: &PersistedPath) -> PathSummary {
    PathSummary {
        id: path.id,
        slug: path.slug.clone(),
        topic: path.path.topic().to_string(),
        resource_count: i32::try_from(path.path.resource_count()).unwrap_or(i32::MAX),
        created_at: path.created_at,
    }
}

#[async_trait]
impl PathStore for InMemoryPathStore {
    async fn save(&self, path: &LearningPath) -> Result<PersistedPath, StoreError> {
        let created_at = Utc::now();
        let persisted = PersistedPath {
            id: Uuid::new_v4(),
            slug: path_slug(path.topic(), created_at),
            created_at,
            action_count: 0,
            path: path.clone(),
        };
        self.inner
            .write()
            .await
            .paths
            .insert(persisted.id, persisted.clone());
        Ok(persisted)
    }

    async fn get(&self, id: Uuid) -> Result<Option<PersistedPath>, StoreError> {
        Ok(self.inner.read().await.paths.get(&id).cloned())
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<PathSummary>, StoreError> {
        let needle = query.topic_filter().map(str::to_lowercase);
        let inner = self.inner.read().await;

        let mut matching: Vec<&PersistedPath> = inner
            .paths
            .values()
            .filter(|p| {
                needle
                    .as_deref()
                    .map_or(true, |n| p.path.topic().to_lowercase().contains(n))
            })
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let limit = usize::try_from(query.effective_limit()).unwrap_or(usize::MAX);
        Ok(matching.into_iter().take(limit).map(summary).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        inner.actions.remove(&id);
        Ok(inner.paths.remove(&id).is_some())
    }

    async fn record_action(&self, id: Uuid, action: ActionKind) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let path = inner.paths.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        path.action_count += 1;
        inner.actions.entry(id).or_default().push(action);
        Ok(())
    }

    async fn stats(&self) -> Result<PathStats, StoreError> {
        let inner = self.inner.read().await;

        let all_actions = inner.actions.values().flatten();
        let total_downloads = all_actions.clone().filter(|a| a.is_download()).count();
        let total_views = all_actions
            .filter(|a| **a == ActionKind::Viewed)
            .count();

        let mut by_topic: HashMap<&str, i64> = HashMap::new();
        for path in inner.paths.values() {
            *by_topic.entry(path.path.topic()).or_default() += 1;
        }
        let mut popular_topics: Vec<TopicCount> = by_topic
            .into_iter()
            .map(|(topic, count)| TopicCount {
                topic: topic.to_string(),
                count,
            })
            .collect();
        popular_topics.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.topic.cmp(&b.topic)));
        popular_topics.truncate(POPULAR_TOPICS_LIMIT as usize);

        Ok(PathStats {
            total_learning_paths: inner.paths.len() as i64,
            total_downloads: total_downloads as i64,
            total_views: total_views as i64,
            popular_topics,
        })
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
