//! Application state for the HTTP server.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::db::repository::TaskRepository;
use crate::services::schedule_state::ScheduleState;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for task backend operations
    pub repository: Arc<dyn TaskRepository>,
    /// Last loaded events and list filter
    pub schedule: Arc<RwLock<ScheduleState>>,
}

impl AppState {
    /// Create a new application state with the given repository.
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self {
            repository,
            schedule: Arc::new(RwLock::new(ScheduleState::new())),
        }
    }
}
