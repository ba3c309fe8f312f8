use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::store::{path_slug, ListQuery, PathStore, StoreError, POPULAR_TOPICS_LIMIT};
use crate::models::path::{
    ActionKind, LearningPathRow, PathStats, PathSummary, PersistedPath, TopicCount,
};
use crate::models::resource::LearningPath;

/// PostgreSQL-backed `PathStore`. Schema lives in `migrations/`.
#[derive(Clone)]
pub struct PgPathStore {
    pool: PgPool,
}

impl PgPathStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escapes LIKE wildcards so the topic filter is a plain substring match.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl PathStore for PgPathStore {
    async fn save(&self, path: &LearningPath) -> Result<PersistedPath, StoreError> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();
        let slug = path_slug(path.topic(), created_at);
        let data = serde_json::to_value(path.categories())?;
        let resource_count = i32::try_from(path.resource_count()).unwrap_or(i32::MAX);

        sqlx::query(
            r#"
            INSERT INTO learning_paths (id, slug, topic, data, resource_count, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(&slug)
        .bind(path.topic())
        .bind(&data)
        .bind(resource_count)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        info!("Saved learning path {id} ({slug})");

        Ok(PersistedPath {
            id,
            slug,
            created_at,
            action_count: 0,
            path: path.clone(),
        })
    }

    async fn get(&self, id: Uuid) -> Result<Option<PersistedPath>, StoreError> {
        let row = sqlx::query_as::<_, LearningPathRow>(
            r#"
            SELECT p.id, p.slug, p.topic, p.data, p.created_at,
                   (SELECT COUNT(*) FROM path_actions a WHERE a.path_id = p.id) AS action_count
            FROM learning_paths p
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PersistedPath::from))
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<PathSummary>, StoreError> {
        let pattern = query.topic_filter().map(like_pattern);

        let rows = sqlx::query_as::<_, PathSummary>(
            r#"
            SELECT id, slug, topic, resource_count, created_at
            FROM learning_paths
            WHERE $1::TEXT IS NULL OR topic ILIKE $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(pattern)
        .bind(query.effective_limit())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM learning_paths WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_action(&self, id: Uuid, action: ActionKind) -> Result<(), StoreError> {
        // Inserting through a SELECT keeps the existence check and the write atomic.
        let result = sqlx::query(
            r#"
            INSERT INTO path_actions (path_id, action_type)
            SELECT id, $2 FROM learning_paths WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(action.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn stats(&self) -> Result<PathStats, StoreError> {
        let (total_learning_paths, total_downloads, total_views): (i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM learning_paths),
                    (SELECT COUNT(*) FROM path_actions
                        WHERE action_type IN ('downloaded_pdf', 'downloaded_doc')),
                    (SELECT COUNT(*) FROM path_actions WHERE action_type = 'viewed')
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        let popular_topics = sqlx::query_as::<_, TopicCount>(
            r#"
            SELECT topic, COUNT(*) AS count
            FROM learning_paths
            GROUP BY topic
            ORDER BY count DESC, topic ASC
            LIMIT $1
            "#,
        )
        .bind(POPULAR_TOPICS_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(PathStats {
            total_learning_paths,
            total_downloads,
            total_views,
            popular_topics,
        })
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
