//! High-level service layer over the task repository.
//!
//! These functions work with any `TaskRepository` implementation and hold
//! the logic that should not depend on where tasks are stored: turning raw
//! records into calendar events and assembling the resource list.
//!
//! # Usage
//!
//! ```ignore
//! use kitchen_calendar::db::{services, LocalRepository};
//!
//! let repo = LocalRepository::new();
//! let events = services::load_calendar_events(&repo, None).await?;
//! ```

use log::{debug, info};

use super::repository::{RepositoryResult, TaskRepository};
use crate::models::{CalendarEvent, DateRange, EventKey, EventStatus, Resource};
use crate::services::normalize::normalize_all;

// ==================== Health & Connection ====================

/// Check if the task backend is reachable.
pub async fn health_check<R: TaskRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Calendar Events ====================

/// Fetch cleaning and production tasks concurrently and normalize them.
///
/// Cleaning events come first, then production events, each in backend
/// order. Records that cannot be placed on the calendar are skipped.
pub async fn load_calendar_events<R: TaskRepository + ?Sized>(
    repo: &R,
    range: Option<DateRange>,
) -> RepositoryResult<Vec<CalendarEvent>> {
    let (cleaning, production) = tokio::try_join!(
        repo.list_cleaning_tasks(range),
        repo.list_production_tasks(range)
    )?;

    debug!(
        "Fetched {} cleaning and {} production records",
        cleaning.len(),
        production.len()
    );

    let mut events = normalize_all(&cleaning);
    events.extend(normalize_all(&production));

    info!("Loaded {} calendar events", events.len());
    Ok(events)
}

// ==================== Resources ====================

/// List the resources events can be grouped and filtered by.
///
/// The unassigned resource always comes first, followed by staff and then
/// production lines.
pub async fn list_resources<R: TaskRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<Resource>> {
    let (users, lines) = tokio::try_join!(repo.list_users(), repo.list_production_lines())?;

    let mut resources = Vec::with_capacity(users.len() + lines.len() + 1);
    resources.push(Resource::unassigned());
    resources.extend(users.into_iter().map(Resource::from));
    resources.extend(lines.into_iter().map(|line| {
        let name = line
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("Line {}", line.id));
        Resource::production_line(line.id, name)
    }));

    Ok(resources)
}

// ==================== Updates ====================

/// Change a task's status.
pub async fn change_status<R: TaskRepository + ?Sized>(
    repo: &R,
    key: EventKey,
    status: EventStatus,
) -> RepositoryResult<()> {
    info!("Changing status of {} to {}", key, status.as_str());
    repo.update_status(key, status)
        .await
        .map_err(|e| e.with_operation("change_status"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::LocalRepository;
    use crate::models::{
        CleaningTaskRecord, EventKind, ProductionLineRecord, ProductionTaskRecord, ResourceKind,
        UserRecord,
    };
    use chrono::{NaiveDate, TimeZone, Utc};

    fn seeded() -> LocalRepository {
        let repo = LocalRepository::new();
        repo.insert_cleaning_task(CleaningTaskRecord {
            id: 1,
            title: Some("Clean Floor".into()),
            start_time: Some(Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap()),
            ..Default::default()
        });
        // No start and no due date: cannot be placed.
        repo.insert_cleaning_task(CleaningTaskRecord {
            id: 2,
            ..Default::default()
        });
        repo.insert_production_task(ProductionTaskRecord {
            id: 1,
            recipe_name: Some("Sourdough".into()),
            due_date: NaiveDate::from_ymd_opt(2024, 3, 2),
            ..Default::default()
        });
        repo.insert_user(UserRecord {
            id: 4,
            username: Some("sam".into()),
            ..Default::default()
        });
        repo.insert_production_line(ProductionLineRecord { id: 2, name: None });
        repo
    }

    #[tokio::test]
    async fn test_load_calendar_events_skips_unplaceable() {
        let repo = seeded();
        let events = load_calendar_events(&repo, None).await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, EventKind::Cleaning);
        assert_eq!(events[1].title, "Sourdough");
        assert_ne!(events[0].key(), events[1].key());
    }

    #[tokio::test]
    async fn test_list_resources_starts_with_unassigned() {
        let repo = seeded();
        let resources = list_resources(&repo).await.unwrap();

        assert_eq!(resources.len(), 3);
        assert_eq!(resources[0].kind, ResourceKind::Unassigned);
        assert_eq!(resources[1].name, "sam");
        assert_eq!(resources[2].id.as_str(), "line-2");
        assert_eq!(resources[2].name, "Line 2");
    }

    #[tokio::test]
    async fn test_change_status_unknown_task() {
        let repo = seeded();
        let err = change_status(
            &repo,
            EventKey::new(EventKind::Production, 99),
            EventStatus::Completed,
        )
        .await
        .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.context().operation.as_deref(), Some("change_status"));
    }
}
