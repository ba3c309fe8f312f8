use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use super::store::PathStore;
use crate::models::path::ActionKind;

/// Fire-and-forget action recording. The caller never waits on the write and a
/// failure only produces a log line.
#[derive(Clone)]
pub struct ActionNotifier {
    store: Arc<dyn PathStore>,
}

impl ActionNotifier {
    pub fn new(store: Arc<dyn PathStore>) -> Self {
        Self { store }
    }

    pub fn notify(&self, id: Uuid, action: ActionKind) {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            match store.record_action(id, action).await {
                Ok(()) => debug!("Recorded '{action}' for path {id}"),
                Err(e) => warn!("Failed to record '{action}' for path {id}: {e}"),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resource::{CategoryMap, LearningPath};
    use crate::paths::memory::InMemoryPathStore;
    use std::time::Duration;

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    #[tokio::test]
    async fn test_notify_records_in_background() {
        let store = Arc::new(InMemoryPathStore::new());
        let saved = store
            .save(&LearningPath::new("Rust", CategoryMap::default()))
            .await
            .unwrap();

        ActionNotifier::new(store.clone()).notify(saved.id, ActionKind::Viewed);
        settle().await;

        let loaded = store.get(saved.id).await.unwrap().unwrap();
        assert_eq!(loaded.action_count, 1);
    }

    #[tokio::test]
    async fn test_notify_unknown_path_does_not_panic() {
        let store = Arc::new(InMemoryPathStore::new());
        ActionNotifier::new(store.clone()).notify(Uuid::new_v4(), ActionKind::DownloadedPdf);
        settle().await;

        assert_eq!(store.stats().await.unwrap().total_downloads, 0);
    }
}
