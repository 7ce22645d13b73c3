//! Data Transfer Objects for the HTTP API.
//!
//! Calendar events and resources are serialized as-is; the types here are
//! the query strings and request/response envelopes around them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::models::{CalendarEvent, EventKey, EventStatus, Resource, ResourceId};
pub use crate::services::calendar_adapter::EventSpan;

use crate::models::DateRange;
use crate::services::filter::FilterCriteria;
use crate::services::schedule_state::ListFilter;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Task backend reachability
    pub repository: String,
}

/// Query string for `GET /v1/calendar/events`.
///
/// List parameters are comma separated, e.g. `resource_ids=4,unassigned`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventsQuery {
    #[serde(default)]
    pub list_filter: Option<String>,
    #[serde(default)]
    pub resource_ids: Option<String>,
    #[serde(default)]
    pub statuses: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub departments: Option<String>,
    /// Visible window start; both ends must be given to limit the fetch
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
}

impl EventsQuery {
    pub fn list_filter(&self) -> Result<ListFilter, String> {
        self.list_filter.as_deref().unwrap_or_default().parse()
    }

    pub fn criteria(&self) -> Result<FilterCriteria, String> {
        let statuses = split_list(self.statuses.as_deref())
            .map(str::parse::<EventStatus>)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FilterCriteria {
            resource_ids: split_list(self.resource_ids.as_deref())
                .map(ResourceId::from)
                .collect(),
            statuses,
            search_term: self.search.clone().unwrap_or_default(),
            departments: split_list(self.departments.as_deref())
                .map(str::to_string)
                .collect(),
        })
    }

    pub fn range(&self) -> Result<Option<DateRange>, String> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if end < start => {
                Err(format!("Invalid range: end {} is before start {}", end, start))
            }
            (Some(start), Some(end)) => Ok(Some(DateRange { start, end })),
            _ => Ok(None),
        }
    }
}

/// Response for `GET /v1/calendar/events`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventListResponse {
    pub events: Vec<CalendarEvent>,
    pub total: usize,
    pub list_filter: ListFilter,
}

/// Response for `GET /v1/resources`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceListResponse {
    pub resources: Vec<Resource>,
    pub total: usize,
}

/// Body of a drop or resize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleRequest {
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    /// Target row; omitted for a resize
    #[serde(default)]
    pub resource_id: Option<ResourceId>,
    /// Placement before the gesture, returned in the error body on failure
    pub previous: EventSpan,
}

/// Body of a status change. Accepts the same spellings as the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// Response after a successful reschedule or status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventUpdateResponse {
    pub key: String,
    /// Toast text for the calendar
    pub message: String,
    /// The refreshed event, absent if it left the loaded window
    pub event: Option<CalendarEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_query_criteria() {
        let query = EventsQuery {
            resource_ids: Some("4, unassigned,".to_string()),
            statuses: Some("pending,In Progress".to_string()),
            search: Some("floor".to_string()),
            departments: Some("Bakery".to_string()),
            ..Default::default()
        };

        let criteria = query.criteria().unwrap();
        assert_eq!(
            criteria.resource_ids,
            vec![ResourceId::from("4"), ResourceId::unassigned()]
        );
        assert_eq!(
            criteria.statuses,
            vec![EventStatus::Pending, EventStatus::InProgress]
        );
        assert_eq!(criteria.search_term, "floor");
        assert_eq!(criteria.departments, vec!["Bakery".to_string()]);
    }

    #[test]
    fn test_events_query_defaults_are_empty() {
        let query = EventsQuery::default();
        assert!(query.criteria().unwrap().is_empty());
        assert_eq!(query.list_filter().unwrap(), ListFilter::All);
        assert_eq!(query.range().unwrap(), None);
    }

    #[test]
    fn test_events_query_rejects_unknown_status() {
        let query = EventsQuery {
            statuses: Some("pending,bogus".to_string()),
            ..Default::default()
        };
        assert!(query.criteria().is_err());
    }
}
