use std::sync::Arc;

use sprintboard_core::cascade::CascadeDeletionEngine;
use sprintboard_core::recalculation::RecalculationCoordinator;
use sprintboard_core::store::Store;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Document store backing every collection.
    pub store: Arc<dyn Store>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: ServerConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn cascade(&self) -> CascadeDeletionEngine<dyn Store> {
        CascadeDeletionEngine::new(Arc::clone(&self.store))
    }

    pub fn recalculation(&self) -> RecalculationCoordinator<dyn Store> {
        RecalculationCoordinator::new(Arc::clone(&self.store))
    }
}
