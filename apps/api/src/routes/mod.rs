pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::paths::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::welcome_handler))
        .route("/health", get(health::health_handler))
        // Learning paths
        .route("/api/v1/learning-paths", post(handlers::handle_create_path))
        .route("/api/v1/paths", get(handlers::handle_list_paths))
        .route(
            "/api/v1/paths/:id",
            get(handlers::handle_get_path).delete(handlers::handle_delete_path),
        )
        .route(
            "/api/v1/paths/:id/actions",
            post(handlers::handle_record_action),
        )
        .route("/api/v1/stats", get(handlers::handle_stats))
        // Original endpoint and response shape (`youtube` instead of `videos`)
        .route(
            "/generate-learning-path",
            post(handlers::handle_legacy_generate),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::config::Config;
    use crate::curation::{Curator, FailureGate};
    use crate::models::path::{ActionKind, PathStats, PathSummary, PersistedPath};
    use crate::models::resource::LearningPath;
    use crate::paths::memory::InMemoryPathStore;
    use crate::paths::store::{ListQuery, PathStore, StoreError};

    fn app_with_store(store: Arc<dyn PathStore>) -> Router {
        let curator = Curator::new(None, FailureGate::default(), Duration::from_secs(1));
        build_router(AppState::new(curator, store, Config::default()))
    }

    fn app() -> (Router, Arc<InMemoryPathStore>) {
        let store = Arc::new(InMemoryPathStore::new());
        (app_with_store(store.clone()), store)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        app.clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn create(app: &Router, topic: &str) -> Value {
        let response = send(
            app,
            Method::POST,
            "/api/v1/learning-paths",
            Some(json!({ "topic": topic })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await
    }

    #[tokio::test]
    async fn test_health_reports_tiers() {
        let (app, _) = app();
        let response = send(&app, Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["llm_configured"], false);
        assert_eq!(body["ai_timeout_secs"], 30);
        assert_eq!(body["store"], "memory");
    }

    #[tokio::test]
    async fn test_welcome() {
        let (app, _) = app();
        let response = send(&app, Method::GET, "/", None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_path_uses_template_and_persists() {
        let (app, store) = app();
        let body = create(&app, "  React ").await;

        assert_eq!(body["topic"], "React");
        assert_eq!(body["source"], "template");
        assert!(body["learning_path"]["docs"]
            .as_array()
            .unwrap()
            .iter()
            .any(|r| r["url"] == "https://react.dev"));

        let id: Uuid = body["id"].as_str().unwrap().parse().unwrap();
        let saved = store.get(id).await.unwrap().unwrap();
        assert_eq!(saved.path.topic(), "React");
        assert_eq!(body["slug"], saved.slug);
    }

    #[tokio::test]
    async fn test_create_path_has_every_category_for_unknown_topic() {
        let (app, _) = app();
        let body = create(&app, "Underwater Basket Weaving").await;

        assert_eq!(body["source"], "generic");
        for key in ["docs", "blogs", "videos", "free_courses", "paid_courses"] {
            let list = body["learning_path"][key].as_array().unwrap();
            assert!(!list.is_empty() && list.len() <= 5, "bad {key}");
        }
    }

    #[tokio::test]
    async fn test_legacy_route_uses_original_category_keys() {
        let (app, store) = app();
        let response = send(
            &app,
            Method::POST,
            "/generate-learning-path",
            Some(json!({ "topic": "Elm" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["topic"], "Elm");
        let categories = body["learning_path"].as_object().unwrap();
        let mut keys: Vec<_> = categories.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["blogs", "docs", "free_courses", "paid_courses", "youtube"]);
        assert!(!categories["youtube"].as_array().unwrap().is_empty());
        assert_eq!(store.stats().await.unwrap().total_learning_paths, 1);
    }

    #[tokio::test]
    async fn test_legacy_route_rejects_blank_topic() {
        let (app, _) = app();
        let response = send(
            &app,
            Method::POST,
            "/generate-learning-path",
            Some(json!({ "topic": "  " })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_and_long_topics() {
        let (app, store) = app();
        for topic in ["   ".to_string(), "x".repeat(201)] {
            let response = send(
                &app,
                Method::POST,
                "/api/v1/learning-paths",
                Some(json!({ "topic": topic })),
            )
            .await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
        }
        assert_eq!(store.stats().await.unwrap().total_learning_paths, 0);
    }

    struct BrokenStore;

    #[async_trait]
    impl PathStore for BrokenStore {
        async fn save(&self, _path: &LearningPath) -> Result<PersistedPath, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn get(&self, _id: Uuid) -> Result<Option<PersistedPath>, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn list(&self, _query: &ListQuery) -> Result<Vec<PathSummary>, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn delete(&self, _id: Uuid) -> Result<bool, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn record_action(&self, _id: Uuid, _action: ActionKind) -> Result<(), StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn stats(&self) -> Result<PathStats, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
        fn backend(&self) -> &'static str {
            "broken"
        }
    }

    #[tokio::test]
    async fn test_create_survives_store_failure_without_id() {
        let app = app_with_store(Arc::new(BrokenStore));
        let body = create(&app, "Python").await;

        assert_eq!(body["topic"], "Python");
        assert!(body.get("id").is_none());
        assert!(body.get("slug").is_none());
        assert!(body["learning_path"]["docs"].is_array());
    }

    #[tokio::test]
    async fn test_store_failure_on_read_is_500() {
        let app = app_with_store(Arc::new(BrokenStore));
        let response = send(&app, Method::GET, "/api/v1/stats", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_get_path_round_trip_and_missing() {
        let (app, _) = app();
        let created = create(&app, "Scala").await;
        let id = created["id"].as_str().unwrap();

        let response = send(&app, Method::GET, &format!("/api/v1/paths/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let fetched = body_json(response).await;
        assert_eq!(fetched["topic"], "Scala");
        assert_eq!(fetched["learning_path"], created["learning_path"]);

        let missing = Uuid::new_v4();
        let response = send(&app, Method::GET, &format!("/api/v1/paths/{missing}"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_list_filters_by_topic() {
        let (app, _) = app();
        create(&app, "React").await;
        create(&app, "Go").await;

        let response = send(&app, Method::GET, "/api/v1/paths?topic=rea&limit=10", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["topic"], "React");
    }

    #[tokio::test]
    async fn test_delete_then_missing() {
        let (app, _) = app();
        let id = create(&app, "Vue").await["id"].as_str().unwrap().to_string();
        let uri = format!("/api/v1/paths/{id}");

        assert_eq!(
            send(&app, Method::DELETE, &uri, None).await.status(),
            StatusCode::NO_CONTENT
        );
        assert_eq!(
            send(&app, Method::DELETE, &uri, None).await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_record_action_and_stats() {
        let (app, _) = app();
        let id = create(&app, "Rust").await["id"].as_str().unwrap().to_string();
        let uri = format!("/api/v1/paths/{id}/actions");

        let body = json!({ "action": "downloaded_pdf" });
        let response = send(&app, Method::POST, &uri, Some(body)).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, Method::POST, &uri, Some(json!({ "action": "shared" }))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let missing = format!("/api/v1/paths/{}/actions", Uuid::new_v4());
        let body = json!({ "action": "viewed" });
        let response = send(&app, Method::POST, &missing, Some(body)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let stats = body_json(send(&app, Method::GET, "/api/v1/stats", None).await).await;
        assert_eq!(stats["total_learning_paths"], 1);
        assert_eq!(stats["total_downloads"], 1);
        assert_eq!(stats["popular_topics"][0]["topic"], "Rust");
    }
}
