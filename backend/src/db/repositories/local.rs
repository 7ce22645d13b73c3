//! In-memory local repository implementation.
//!
//! Stores backend-shaped records in memory so the calendar can run without
//! the task backend, and so tests get fast, deterministic, isolated data.

use async_trait::async_trait;
use log::warn;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::db::repository::*;
use crate::models::{
    AssigneeRef, CleaningTaskRecord, DateRange, EventKey, EventKind, EventStatus,
    ProductionLineRecord, ProductionTaskRecord, ResourceId, ScheduleChange, UserRecord,
};
use crate::services::normalize::EventSource;

/// In-memory local repository.
///
/// Records are kept in `BTreeMap`s keyed by id so listings come back in a
/// stable order.
///
/// # Example
/// ```
/// use kitchen_calendar::db::repositories::LocalRepository;
/// use kitchen_calendar::models::CleaningTaskRecord;
///
/// let repo = LocalRepository::new();
/// repo.insert_cleaning_task(CleaningTaskRecord {
///     id: 1,
///     title: Some("Clean Floor".to_string()),
///     ..Default::default()
/// });
/// assert_eq!(repo.task_count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    cleaning_tasks: BTreeMap<i64, CleaningTaskRecord>,
    production_tasks: BTreeMap<i64, ProductionTaskRecord>,
    users: BTreeMap<i64, UserRecord>,
    production_lines: BTreeMap<i64, ProductionLineRecord>,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            cleaning_tasks: BTreeMap::new(),
            production_tasks: BTreeMap::new(),
            users: BTreeMap::new(),
            production_lines: BTreeMap::new(),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_cleaning_task(&self, record: CleaningTaskRecord) {
        self.data.write().cleaning_tasks.insert(record.id, record);
    }

    pub fn insert_production_task(&self, record: ProductionTaskRecord) {
        self.data.write().production_tasks.insert(record.id, record);
    }

    pub fn insert_user(&self, user: UserRecord) {
        self.data.write().users.insert(user.id, user);
    }

    pub fn insert_production_line(&self, line: ProductionLineRecord) {
        self.data.write().production_lines.insert(line.id, line);
    }

    pub fn cleaning_task(&self, id: i64) -> Option<CleaningTaskRecord> {
        self.data.read().cleaning_tasks.get(&id).cloned()
    }

    pub fn production_task(&self, id: i64) -> Option<ProductionTaskRecord> {
        self.data.read().production_tasks.get(&id).cloned()
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Number of cleaning and production tasks stored.
    pub fn task_count(&self) -> usize {
        let data = self.data.read();
        data.cleaning_tasks.len() + data.production_tasks.len()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("Task store is not healthy"));
        }
        Ok(())
    }

    fn task_not_found(key: EventKey, operation: &str) -> RepositoryError {
        RepositoryError::not_found_with_context(
            format!("{} task {} not found", key.kind, key.id),
            ErrorContext::new(operation)
                .with_entity(format!("{}_task", key.kind))
                .with_entity_id(key.id),
        )
    }
}

fn in_range(range: Option<DateRange>, start: Option<chrono::DateTime<chrono::Utc>>) -> bool {
    match (range, start) {
        (None, _) => true,
        (Some(range), Some(start)) => range.contains(start),
        // Undated records are left for the caller to report.
        (Some(_), None) => true,
    }
}

fn validate_change(key: EventKey, change: &ScheduleChange) -> RepositoryResult<()> {
    if let Some(end) = change.end {
        if end < change.start {
            return Err(RepositoryError::validation_with_context(
                "End time must not be before start time",
                ErrorContext::new("update_schedule")
                    .with_entity(format!("{}_task", key.kind))
                    .with_entity_id(key.id),
            ));
        }
    }
    Ok(())
}

fn assignee_for(resource: &ResourceId) -> Option<AssigneeRef> {
    if resource.is_unassigned() {
        return None;
    }
    match resource.as_str().parse::<i64>() {
        Ok(id) => Some(AssigneeRef::Id(id)),
        Err(_) => Some(AssigneeRef::Username(resource.as_str().to_string())),
    }
}

fn line_id_for(resource: &ResourceId) -> Option<i64> {
    resource
        .as_str()
        .strip_prefix("line-")
        .and_then(|id| id.parse().ok())
}

#[async_trait]
impl TaskRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn list_cleaning_tasks(
        &self,
        range: Option<DateRange>,
    ) -> RepositoryResult<Vec<CleaningTaskRecord>> {
        self.check_health()?;
        let data = self.data.read();
        Ok(data
            .cleaning_tasks
            .values()
            .filter(|t| in_range(range, t.start()))
            .cloned()
            .collect())
    }

    async fn list_production_tasks(
        &self,
        range: Option<DateRange>,
    ) -> RepositoryResult<Vec<ProductionTaskRecord>> {
        self.check_health()?;
        let data = self.data.read();
        Ok(data
            .production_tasks
            .values()
            .filter(|t| in_range(range, t.start()))
            .cloned()
            .collect())
    }

    async fn list_users(&self) -> RepositoryResult<Vec<UserRecord>> {
        self.check_health()?;
        Ok(self.data.read().users.values().cloned().collect())
    }

    async fn list_production_lines(&self) -> RepositoryResult<Vec<ProductionLineRecord>> {
        self.check_health()?;
        Ok(self.data.read().production_lines.values().cloned().collect())
    }

    async fn update_schedule(
        &self,
        key: EventKey,
        change: &ScheduleChange,
    ) -> RepositoryResult<()> {
        self.check_health()?;
        validate_change(key, change)?;

        let mut data = self.data.write();
        match key.kind {
            EventKind::Cleaning => {
                let task = data
                    .cleaning_tasks
                    .get_mut(&key.id.value())
                    .ok_or_else(|| Self::task_not_found(key, "update_schedule"))?;
                task.start_time = Some(change.start);
                task.end_time = change.end;
                match &change.resource_id {
                    Some(resource) if line_id_for(resource).is_some() => {
                        warn!("Ignoring production line {} for cleaning task", resource);
                    }
                    Some(resource) => task.assigned_to = assignee_for(resource),
                    None => {}
                }
            }
            EventKind::Production => {
                let task = data
                    .production_tasks
                    .get_mut(&key.id.value())
                    .ok_or_else(|| Self::task_not_found(key, "update_schedule"))?;
                task.scheduled_start = Some(change.start);
                task.scheduled_end = change.end;
                if let Some(resource) = &change.resource_id {
                    match line_id_for(resource) {
                        Some(line) => {
                            task.production_line = Some(line);
                            task.assigned_to = None;
                        }
                        None if resource.is_unassigned() => {
                            task.production_line = None;
                            task.assigned_to = None;
                        }
                        None => task.assigned_to = assignee_for(resource),
                    }
                }
            }
        }
        Ok(())
    }

    async fn update_status(&self, key: EventKey, status: EventStatus) -> RepositoryResult<()> {
        self.check_health()?;

        let mut data = self.data.write();
        let slot = match key.kind {
            EventKind::Cleaning => data
                .cleaning_tasks
                .get_mut(&key.id.value())
                .map(|t| &mut t.status),
            EventKind::Production => data
                .production_tasks
                .get_mut(&key.id.value())
                .map(|t| &mut t.status),
        };
        let slot = slot.ok_or_else(|| Self::task_not_found(key, "update_status"))?;
        *slot = Some(status.as_str().to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn seeded() -> LocalRepository {
        let repo = LocalRepository::new();
        repo.insert_cleaning_task(CleaningTaskRecord {
            id: 1,
            title: Some("Clean Floor".to_string()),
            start_time: Some(Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap()),
            ..Default::default()
        });
        repo.insert_production_task(ProductionTaskRecord {
            id: 1,
            recipe_name: Some("Sourdough".to_string()),
            scheduled_start: Some(Utc.with_ymd_and_hms(2024, 3, 5, 4, 0, 0).unwrap()),
            ..Default::default()
        });
        repo
    }

    #[tokio::test]
    async fn test_range_filtering() {
        let repo = seeded();
        let range = DateRange {
            start: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap(),
        };
        assert_eq!(repo.list_cleaning_tasks(Some(range)).await.unwrap().len(), 1);
        assert!(repo.list_production_tasks(Some(range)).await.unwrap().is_empty());
        assert_eq!(repo.list_production_tasks(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_schedule_moves_and_reassigns() {
        let repo = seeded();
        let change = ScheduleChange {
            start: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            end: Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()),
            resource_id: Some(ResourceId::new("7")),
        };
        repo.update_schedule(EventKey::new(EventKind::Cleaning, 1), &change)
            .await
            .unwrap();

        let task = repo.cleaning_task(1).unwrap();
        assert_eq!(task.start_time, Some(change.start));
        assert_eq!(task.end_time, change.end);
        assert_eq!(task.assigned_to, Some(AssigneeRef::Id(7)));
    }

    #[tokio::test]
    async fn test_update_schedule_to_production_line() {
        let repo = seeded();
        let change = ScheduleChange {
            start: Utc.with_ymd_and_hms(2024, 3, 5, 5, 0, 0).unwrap(),
            end: None,
            resource_id: Some(ResourceId::new("line-3")),
        };
        repo.update_schedule(EventKey::new(EventKind::Production, 1), &change)
            .await
            .unwrap();
        assert_eq!(repo.production_task(1).unwrap().production_line, Some(3));
    }

    #[tokio::test]
    async fn test_update_schedule_unassigned_clears_line() {
        let repo = seeded();
        let key = EventKey::new(EventKind::Production, 1);
        let mut change = ScheduleChange {
            start: Utc.with_ymd_and_hms(2024, 3, 5, 5, 0, 0).unwrap(),
            end: None,
            resource_id: Some(ResourceId::new("line-3")),
        };
        repo.update_schedule(key, &change).await.unwrap();

        change.resource_id = Some(ResourceId::unassigned());
        repo.update_schedule(key, &change).await.unwrap();

        let task = repo.production_task(1).unwrap();
        assert_eq!(task.production_line, None);
        assert_eq!(task.assigned_to, None);
        assert!(task.resource_id().is_unassigned());
    }

    #[tokio::test]
    async fn test_cleaning_task_ignores_line_row() {
        let repo = seeded();
        let key = EventKey::new(EventKind::Cleaning, 1);
        let mut change = ScheduleChange {
            start: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            end: None,
            resource_id: Some(ResourceId::new("7")),
        };
        repo.update_schedule(key, &change).await.unwrap();

        change.resource_id = Some(ResourceId::new("line-2"));
        change.start = Utc.with_ymd_and_hms(2024, 3, 1, 11, 0, 0).unwrap();
        repo.update_schedule(key, &change).await.unwrap();

        let task = repo.cleaning_task(1).unwrap();
        assert_eq!(task.start_time, Some(change.start));
        assert_eq!(task.assigned_to, Some(AssigneeRef::Id(7)));
    }

    #[tokio::test]
    async fn test_update_schedule_rejects_inverted_span() {
        let repo = seeded();
        let change = ScheduleChange {
            start: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            end: Some(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()),
            resource_id: None,
        };
        let err = repo
            .update_schedule(EventKey::new(EventKind::Cleaning, 1), &change)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
    }

    #[tokio::test]
    async fn test_update_missing_task_is_not_found() {
        let repo = seeded();
        let err = repo
            .update_status(EventKey::new(EventKind::Cleaning, 99), EventStatus::Completed)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_status_stores_wire_name() {
        let repo = seeded();
        repo.update_status(EventKey::new(EventKind::Production, 1), EventStatus::InProgress)
            .await
            .unwrap();
        assert_eq!(
            repo.production_task(1).unwrap().status.as_deref(),
            Some("in_progress")
        );
    }

    #[tokio::test]
    async fn test_unhealthy_store_fails_reads() {
        let repo = seeded();
        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
        assert!(repo.list_cleaning_tasks(None).await.is_err());

        repo.clear();
        repo.set_healthy(true);
        assert_eq!(repo.task_count(), 0);
    }
}
