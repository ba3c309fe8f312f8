use std::sync::Arc;

use crate::config::Config;
use crate::curation::Curator;
use crate::paths::notifier::ActionNotifier;
use crate::paths::store::PathStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub curator: Arc<Curator>,
    /// Postgres when `DATABASE_URL` is set, otherwise in-memory.
    pub store: Arc<dyn PathStore>,
    pub notifier: ActionNotifier,
    pub config: Config,
}

impl AppState {
    pub fn new(curator: Curator, store: Arc<dyn PathStore>, config: Config) -> Self {
        let notifier = ActionNotifier::new(Arc::clone(&store));
        Self {
            curator: Arc::new(curator),
            store,
            notifier,
            config,
        }
    }
}
