//! Filter engine for calendar events.
//!
//! Every criterion is an AND-ed predicate. An empty list or blank search
//! term places no constraint, so `FilterCriteria::default()` lets every event
//! through. Input order is preserved.

use serde::{Deserialize, Serialize};

use crate::models::{CalendarEvent, EventStatus, ResourceId};

/// Ephemeral filter selections from the calendar toolbar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub resource_ids: Vec<ResourceId>,
    #[serde(default)]
    pub statuses: Vec<EventStatus>,
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub departments: Vec<String>,
}

impl FilterCriteria {
    /// True when no criterion constrains anything.
    pub fn is_empty(&self) -> bool {
        self.resource_ids.is_empty()
            && self.statuses.is_empty()
            && self.search_term.trim().is_empty()
            && self.departments.is_empty()
    }

    /// Check a single event against all criteria.
    pub fn matches(&self, event: &CalendarEvent) -> bool {
        self.matches_resource(event)
            && self.matches_status(event)
            && self.matches_department(event)
            && self.matches_search(event)
    }

    fn matches_resource(&self, event: &CalendarEvent) -> bool {
        self.resource_ids.is_empty() || self.resource_ids.contains(&event.resource_id)
    }

    fn matches_status(&self, event: &CalendarEvent) -> bool {
        self.statuses.is_empty() || self.statuses.contains(&event.status)
    }

    fn matches_department(&self, event: &CalendarEvent) -> bool {
        self.departments.is_empty() || self.departments.iter().any(|d| *d == event.department)
    }

    // Title only; other fields are covered by their own criteria.
    fn matches_search(&self, event: &CalendarEvent) -> bool {
        let term = self.search_term.trim();
        term.is_empty() || event.title.to_lowercase().contains(&term.to_lowercase())
    }
}

/// Apply `criteria` to `events`, keeping the input order.
pub fn filter_events(events: &[CalendarEvent], criteria: &FilterCriteria) -> Vec<CalendarEvent> {
    if criteria.is_empty() {
        return events.to_vec();
    }

    events
        .iter()
        .filter(|event| criteria.matches(event))
        .cloned()
        .collect()
}
