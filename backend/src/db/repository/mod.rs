//! Repository trait for abstracting the task backend.
//!
//! The calendar never owns task data. Every implementation reads the
//! backend's cleaning and production records and forwards placement and
//! status changes back to it, so the in-memory store and the REST client can
//! be swapped via dependency injection.

pub mod error;

use async_trait::async_trait;

use crate::models::{
    CleaningTaskRecord, DateRange, EventKey, EventStatus, ProductionLineRecord,
    ProductionTaskRecord, ScheduleChange, UserRecord,
};

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

/// Repository trait for calendar task operations.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so one instance can be shared by
/// all HTTP handlers.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check whether the backing store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if healthy
    /// - `Ok(false)` if unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Task Records ====================

    /// List cleaning task instances, optionally limited to a window.
    async fn list_cleaning_tasks(
        &self,
        range: Option<DateRange>,
    ) -> RepositoryResult<Vec<CleaningTaskRecord>>;

    /// List production tasks, optionally limited to a window.
    async fn list_production_tasks(
        &self,
        range: Option<DateRange>,
    ) -> RepositoryResult<Vec<ProductionTaskRecord>>;

    // ==================== Resources ====================

    async fn list_users(&self) -> RepositoryResult<Vec<UserRecord>>;

    async fn list_production_lines(&self) -> RepositoryResult<Vec<ProductionLineRecord>>;

    // ==================== Updates ====================

    /// Move or resize a task.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the task doesn't exist
    /// * `Err(RepositoryError::ValidationError)` - If the backend rejects the placement
    async fn update_schedule(&self, key: EventKey, change: &ScheduleChange)
        -> RepositoryResult<()>;

    /// Change a task's status.
    async fn update_status(&self, key: EventKey, status: EventStatus) -> RepositoryResult<()>;
}
