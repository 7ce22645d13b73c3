//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer and the calendar core for the actual work.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::dto::{
    EventListResponse, EventUpdateResponse, EventsQuery, HealthResponse, RescheduleRequest,
    ResourceListResponse, StatusUpdateRequest,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::models::{EventKey, EventKind, EventStatus};
use crate::services::calendar_adapter::{handle_drop, DropError, EventDrop, EventSpan};
use crate::services::filter::filter_events;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn parse_key(kind: &str, id: i64) -> Result<EventKey, AppError> {
    let kind: EventKind = kind.parse().map_err(AppError::BadRequest)?;
    Ok(EventKey::new(kind, id))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the task
/// backend is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let repo_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        repository: repo_status,
    }))
}

// =============================================================================
// Calendar
// =============================================================================

/// GET /v1/calendar/events
///
/// Refetch events, store them with the requested list filter and return the
/// visible events narrowed by the toolbar filters.
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> HandlerResult<EventListResponse> {
    let list_filter = query.list_filter().map_err(AppError::BadRequest)?;
    let criteria = query.criteria().map_err(AppError::BadRequest)?;
    let range = query.range().map_err(AppError::BadRequest)?;

    let events = db_services::load_calendar_events(state.repository.as_ref(), range).await?;

    let visible = {
        let mut schedule = state.schedule.write();
        schedule.set_events(events);
        schedule.set_list_filter(list_filter);
        filter_events(schedule.visible_events(), &criteria)
    };

    tracing::debug!(
        "Returning {} events (list_filter={})",
        visible.len(),
        list_filter
    );

    Ok(Json(EventListResponse {
        total: visible.len(),
        events: visible,
        list_filter,
    }))
}

/// PUT /v1/calendar/events/{kind}/{id}/schedule
///
/// Apply a drop or resize. When the backend rejects it the error body carries
/// the placement the calendar should revert to.
pub async fn reschedule_event(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i64)>,
    Json(request): Json<RescheduleRequest>,
) -> HandlerResult<EventUpdateResponse> {
    let key = parse_key(&kind, id)?;
    let drop = EventDrop {
        key,
        start: request.start,
        end: request.end,
        resource_id: request.resource_id,
        previous: request.previous,
    };

    // Work on a copy so the lock is not held across the backend calls.
    let mut schedule = state.schedule.read().clone();
    let mut revert: Option<EventSpan> = None;
    let result = handle_drop(state.repository.as_ref(), &mut schedule, drop, |span| {
        revert = Some(span.clone())
    })
    .await;

    match result {
        Ok(()) => {
            let event = schedule.find(&key).cloned();
            *state.schedule.write() = schedule;
            Ok(Json(EventUpdateResponse {
                key: key.to_string(),
                message: "Task rescheduled".to_string(),
                event,
            }))
        }
        // Saved upstream, so there is nothing for the calendar to undo.
        Err(DropError::Refresh(e)) => Err(AppError::Repository(e)),
        Err(error) => {
            tracing::warn!("Reschedule of {} failed: {}", key, error);
            match revert {
                Some(revert) => Err(AppError::DropFailed { error, revert }),
                None => Err(AppError::Internal(error.to_string())),
            }
        }
    }
}

/// PUT /v1/calendar/events/{kind}/{id}/status
///
/// Change a task's status and refetch the events.
pub async fn update_event_status(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, i64)>,
    Json(request): Json<StatusUpdateRequest>,
) -> HandlerResult<EventUpdateResponse> {
    let key = parse_key(&kind, id)?;
    let status: EventStatus = request.status.parse().map_err(AppError::BadRequest)?;

    db_services::change_status(state.repository.as_ref(), key, status).await?;
    let events = db_services::load_calendar_events(state.repository.as_ref(), None).await?;

    let event = {
        let mut schedule = state.schedule.write();
        schedule.set_events(events);
        schedule.find(&key).cloned()
    };

    Ok(Json(EventUpdateResponse {
        key: key.to_string(),
        message: format!("Status changed to {}", status.label()),
        event,
    }))
}

// =============================================================================
// Resources
// =============================================================================

/// GET /v1/resources
///
/// Staff and production lines, led by the unassigned resource.
pub async fn list_resources(
    State(state): State<AppState>,
) -> HandlerResult<ResourceListResponse> {
    let resources = db_services::list_resources(state.repository.as_ref()).await?;

    Ok(Json(ResourceListResponse {
        total: resources.len(),
        resources,
    }))
}
