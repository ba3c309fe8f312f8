use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::curation::Tier;
use crate::errors::AppError;
use crate::models::path::{ActionKind, PathStats, PathSummary, PersistedPath};
use crate::models::resource::{LearningPath, Resource};
use crate::paths::store::ListQuery;
use crate::state::AppState;

pub const MAX_TOPIC_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
pub struct CreatePathRequest {
    pub topic: String,
}

/// `id` and `slug` are absent when the path could not be saved.
#[derive(Debug, Serialize)]
pub struct CreatePathResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub source: Tier,
    #[serde(flatten)]
    pub path: LearningPath,
}

/// Response shape of the original `/generate-learning-path` endpoint, which
/// named the video category `youtube`.
#[derive(Debug, Serialize)]
pub struct LegacyPathResponse {
    pub topic: String,
    pub learning_path: LegacyCategories,
}

#[derive(Debug, Serialize)]
pub struct LegacyCategories {
    pub docs: Vec<Resource>,
    pub blogs: Vec<Resource>,
    pub youtube: Vec<Resource>,
    pub free_courses: Vec<Resource>,
    pub paid_courses: Vec<Resource>,
}

impl From<LearningPath> for LegacyPathResponse {
    fn from(path: LearningPath) -> Self {
        let categories = path.categories().clone();
        LegacyPathResponse {
            topic: path.topic().to_string(),
            learning_path: LegacyCategories {
                docs: categories.docs,
                blogs: categories.blogs,
                youtube: categories.videos,
                free_courses: categories.free_courses,
                paid_courses: categories.paid_courses,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub topic: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub action: String,
}

fn validate_topic(raw: &str) -> Result<&str, AppError> {
    let topic = raw.trim();
    if topic.is_empty() {
        return Err(AppError::Validation("Topic must not be empty".to_string()));
    }
    if topic.chars().count() > MAX_TOPIC_CHARS {
        return Err(AppError::Validation(format!(
            "Topic must be at most {MAX_TOPIC_CHARS} characters"
        )));
    }
    Ok(topic)
}

/// POST /api/v1/learning-paths
pub async fn handle_create_path(
    State(state): State<AppState>,
    Json(req): Json<CreatePathRequest>,
) -> Result<Json<CreatePathResponse>, AppError> {
    Ok(Json(create_path(&state, &req.topic).await?))
}

/// POST /generate-learning-path
pub async fn handle_legacy_generate(
    State(state): State<AppState>,
    Json(req): Json<CreatePathRequest>,
) -> Result<Json<LegacyPathResponse>, AppError> {
    let created = create_path(&state, &req.topic).await?;
    Ok(Json(LegacyPathResponse::from(created.path)))
}

async fn create_path(state: &AppState, raw_topic: &str) -> Result<CreatePathResponse, AppError> {
    let topic = validate_topic(raw_topic)?;
    let curation = state.curator.curate(topic).await;

    let (id, slug) = match state.store.save(&curation.path).await {
        Ok(saved) => (Some(saved.id), Some(saved.slug)),
        Err(e) => {
            error!("Failed to persist learning path for '{topic}': {e}");
            (None, None)
        }
    };

    info!(
        "Generated learning path for '{topic}' from {:?} tier",
        curation.tier
    );

    Ok(CreatePathResponse {
        id,
        slug,
        source: curation.tier,
        path: curation.path,
    })
}

/// GET /api/v1/paths
pub async fn handle_list_paths(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<PathSummary>>, AppError> {
    let query = ListQuery {
        limit: params.limit,
        topic: params.topic,
    };
    Ok(Json(state.store.list(&query).await?))
}

/// GET /api/v1/paths/:id
pub async fn handle_get_path(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PersistedPath>, AppError> {
    let path = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Learning path {id} not found")))?;

    state.notifier.notify(id, ActionKind::Viewed);
    Ok(Json(path))
}

/// DELETE /api/v1/paths/:id
pub async fn handle_delete_path(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.store.delete(id).await? {
        info!("Deleted learning path {id}");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Learning path {id} not found")))
    }
}

/// POST /api/v1/paths/:id/actions
pub async fn handle_record_action(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ActionRequest>,
) -> Result<StatusCode, AppError> {
    let action: ActionKind = req.action.parse().map_err(AppError::Validation)?;
    state.store.record_action(id, action).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/stats
pub async fn handle_stats(State(state): State<AppState>) -> Result<Json<PathStats>, AppError> {
    Ok(Json(state.store.stats().await?))
}
