//! Page-level schedule state.
//!
//! Holds the unified event list and the list-view filter, and keeps the
//! derived visible list in step with both. The derived list is recomputed
//! synchronously by the setters; only the last result is kept.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{CalendarEvent, EventKey, EventKind};

/// List-view toggle above the calendar.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListFilter {
    #[default]
    All,
    Cleaning,
    Production,
}

impl ListFilter {
    pub fn admits(&self, kind: EventKind) -> bool {
        match self {
            ListFilter::All => true,
            ListFilter::Cleaning => kind == EventKind::Cleaning,
            ListFilter::Production => kind == EventKind::Production,
        }
    }
}

impl fmt::Display for ListFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ListFilter::All => "all",
            ListFilter::Cleaning => "cleaning",
            ListFilter::Production => "production",
        };
        f.write_str(s)
    }
}

impl FromStr for ListFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(ListFilter::All),
            "cleaning" => Ok(ListFilter::Cleaning),
            "production" => Ok(ListFilter::Production),
            _ => Err(format!(
                "Invalid list filter: {}. Must be 'all', 'cleaning', or 'production'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleState {
    events: Vec<CalendarEvent>,
    list_filter: ListFilter,
    visible: Vec<CalendarEvent>,
}

impl ScheduleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<CalendarEvent>) -> Self {
        let mut state = Self::new();
        state.set_events(events);
        state
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    /// Replace the event list wholesale.
    pub fn set_events(&mut self, events: Vec<CalendarEvent>) {
        self.events = events;
        self.recompute();
    }

    pub fn list_filter(&self) -> ListFilter {
        self.list_filter
    }

    pub fn set_list_filter(&mut self, list_filter: ListFilter) {
        if self.list_filter == list_filter {
            return;
        }
        self.list_filter = list_filter;
        self.recompute();
    }

    pub fn visible_events(&self) -> &[CalendarEvent] {
        &self.visible
    }

    pub fn find(&self, key: &EventKey) -> Option<&CalendarEvent> {
        self.events.iter().find(|e| e.key() == *key)
    }

    fn recompute(&mut self) {
        let filter = self.list_filter;
        self.visible = self
            .events
            .iter()
            .filter(|e| filter.admits(e.kind))
            .cloned()
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventStatus, ResourceId, TaskId};
    use chrono::{TimeZone, Utc};

    fn event(id: i64, kind: EventKind) -> CalendarEvent {
        CalendarEvent {
            id: TaskId::new(id),
            kind,
            title: format!("Task {}", id),
            start: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
            end: None,
            resource_id: ResourceId::unassigned(),
            status: EventStatus::Pending,
            department: "Kitchen".to_string(),
        }
    }

    fn mixed() -> Vec<CalendarEvent> {
        vec![
            event(1, EventKind::Cleaning),
            event(1, EventKind::Production),
            event(2, EventKind::Cleaning),
        ]
    }

    #[test]
    fn test_visible_defaults_to_all() {
        let state = ScheduleState::with_events(mixed());
        assert_eq!(state.list_filter(), ListFilter::All);
        assert_eq!(state.visible_events(), state.events());
    }

    #[test]
    fn test_list_filter_recomputes_visible() {
        let mut state = ScheduleState::with_events(mixed());

        state.set_list_filter(ListFilter::Cleaning);
        assert_eq!(state.visible_events().len(), 2);
        assert!(state
            .visible_events()
            .iter()
            .all(|e| e.kind == EventKind::Cleaning));

        state.set_list_filter(ListFilter::Production);
        assert_eq!(state.visible_events().len(), 1);
        assert_eq!(state.events().len(), 3);
    }

    #[test]
    fn test_set_events_replaces_wholesale() {
        let mut state = ScheduleState::with_events(mixed());
        state.set_list_filter(ListFilter::Cleaning);

        state.set_events(vec![event(9, EventKind::Production)]);
        assert_eq!(state.events().len(), 1);
        assert!(state.visible_events().is_empty());
    }

    #[test]
    fn test_find_by_key_distinguishes_kinds() {
        let state = ScheduleState::with_events(mixed());
        let key = EventKey::new(EventKind::Production, 1);
        assert_eq!(state.find(&key).map(|e| e.kind), Some(EventKind::Production));
        assert!(state.find(&EventKey::new(EventKind::Production, 2)).is_none());
    }

    #[test]
    fn test_list_filter_parse() {
        assert_eq!("Cleaning".parse::<ListFilter>().unwrap(), ListFilter::Cleaning);
        assert_eq!("".parse::<ListFilter>().unwrap(), ListFilter::All);
        assert!("temperature".parse::<ListFilter>().is_err());
    }
}
