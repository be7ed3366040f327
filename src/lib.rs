// Library exports for the API server, the export CLI and tests
pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use config::Config;
use db::SnapshotStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: SnapshotStore,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            store: SnapshotStore::new(config.data_dir.clone()),
            config: Arc::new(config),
        }
    }
}
