//! Calendar drag/drop adapter.
//!
//! Turns drop and resize payloads from the calendar widget into repository
//! updates. On success the whole event list is refetched. When the backend
//! rejects the change the widget is told to put the event back where it was
//! and the schedule state is left alone.

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::db::repository::{RepositoryError, TaskRepository};
use crate::db::services::load_calendar_events;
use crate::models::{CalendarEvent, EventKey, ResourceId, ScheduleChange};
use crate::services::schedule_state::ScheduleState;

/// Where an event sat on the calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSpan {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub resource_id: ResourceId,
}

impl EventSpan {
    pub fn of(event: &CalendarEvent) -> Self {
        Self {
            start: event.start,
            end: event.end,
            resource_id: event.resource_id.clone(),
        }
    }
}

/// A drop or resize reported by the calendar widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDrop {
    pub key: EventKey,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    /// Target resource row; `None` for a resize, which never changes rows.
    #[serde(default)]
    pub resource_id: Option<ResourceId>,
    /// Placement before the gesture, handed back to the widget on failure.
    pub previous: EventSpan,
}

impl EventDrop {
    /// Event dragged to a new time and possibly a new resource row.
    pub fn moved(
        event: &CalendarEvent,
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
        resource_id: ResourceId,
    ) -> Self {
        Self {
            key: event.key(),
            start,
            end,
            resource_id: Some(resource_id),
            previous: EventSpan::of(event),
        }
    }

    /// Event stretched or shrunk in place.
    pub fn resized(event: &CalendarEvent, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            key: event.key(),
            start,
            end: Some(end),
            resource_id: None,
            previous: EventSpan::of(event),
        }
    }

    pub fn change(&self) -> ScheduleChange {
        ScheduleChange {
            start: self.start,
            end: self.end,
            resource_id: self.resource_id.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DropError {
    #[error("end {end} is before start {start}")]
    InvalidSpan {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// The backend refused the new placement.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    /// The placement was saved but the event list could not be refetched.
    #[error("saved, but refresh failed: {0}")]
    Refresh(RepositoryError),
}

impl DropError {
    /// Whether the calendar should snap the event back.
    ///
    /// False once the backend has accepted the new placement.
    pub fn reverts(&self) -> bool {
        !matches!(self, DropError::Refresh(_))
    }

    /// Short message for the toast shown after the drop.
    pub fn toast(&self) -> String {
        match self {
            DropError::InvalidSpan { .. } => {
                "Failed to update task: end time must be after start time".to_string()
            }
            DropError::Repository(e) => format!("Failed to update task: {}", e.message()),
            DropError::Refresh(e) => format!(
                "Task updated, but the calendar could not be refreshed: {}",
                e.message()
            ),
        }
    }
}

/// Push a drop to the backend and fetch the refreshed event list.
///
/// Does not touch any schedule state, so callers holding state behind a
/// lock can apply the result without keeping the lock across the request.
pub async fn reschedule<R: TaskRepository + ?Sized>(
    repo: &R,
    drop: &EventDrop,
) -> Result<Vec<CalendarEvent>, DropError> {
    if let Some(end) = drop.end {
        if end < drop.start {
            return Err(DropError::InvalidSpan {
                start: drop.start,
                end,
            });
        }
    }

    repo.update_schedule(drop.key, &drop.change()).await?;
    info!("Rescheduled {} to {}", drop.key, drop.start);

    load_calendar_events(repo, None)
        .await
        .map_err(DropError::Refresh)
}

/// Apply a drop or resize end to end.
///
/// On success the state's events are replaced with a fresh fetch. When the
/// backend rejects the change `revert` receives the prior placement. The
/// state is left unchanged on any error, including a failed refetch after
/// a saved change, which does not revert.
pub async fn handle_drop<R, F>(
    repo: &R,
    state: &mut ScheduleState,
    drop: EventDrop,
    revert: F,
) -> Result<(), DropError>
where
    R: TaskRepository + ?Sized,
    F: FnOnce(&EventSpan),
{
    match reschedule(repo, &drop).await {
        Ok(events) => {
            state.set_events(events);
            Ok(())
        }
        Err(e) if e.reverts() => {
            warn!("Drop of {} failed, reverting: {}", drop.key, e);
            revert(&drop.previous);
            Err(e)
        }
        Err(e) => {
            warn!("Drop of {} saved but not reloaded: {}", drop.key, e);
            Err(e)
        }
    }
}
