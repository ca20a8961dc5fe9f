//! API module - HTTP handlers and routing.

pub mod handlers;
pub mod routes;

use std::sync::Arc;

use crate::config::Config;
use crate::services::publish_service::PublishService;
use crate::storage::StorageBackend;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn StorageBackend>,
    pub publisher: PublishService,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn StorageBackend>) -> Self {
        Self {
            config,
            publisher: PublishService::new(storage.clone()),
            storage,
        }
    }
}

pub type SharedState = Arc<AppState>;
