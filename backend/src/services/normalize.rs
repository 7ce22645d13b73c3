//! Projection of backend records onto [`CalendarEvent`].
//!
//! Pure functions only: no I/O, no clock. Given the same record the same
//! event comes out.

use chrono::{DateTime, NaiveDate, Utc};
use log::warn;

use crate::models::{
    line_resource_id, CalendarEvent, CleaningTaskRecord, EventKind, EventStatus,
    ProductionTaskRecord, ResourceId, TaskId,
};

/// Title used when no record field yields a usable name.
pub const DEFAULT_TITLE: &str = "Untitled Task";

/// Department placeholder for records that do not carry one.
pub const UNKNOWN_DEPARTMENT: &str = "N/A";

/// Why a record could not be placed on the calendar.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizeError {
    #[error("{kind} task {id} has no start time or due date")]
    MissingStart { kind: EventKind, id: i64 },
}

/// A backend record that can be projected onto the calendar.
pub trait EventSource {
    fn kind(&self) -> EventKind;

    fn id(&self) -> i64;

    /// Title candidates in priority order.
    fn title_candidates(&self) -> Vec<Option<&str>>;

    fn start(&self) -> Option<DateTime<Utc>>;

    fn end(&self) -> Option<DateTime<Utc>>;

    fn resource_id(&self) -> ResourceId;

    fn raw_status(&self) -> Option<&str>;

    fn department(&self) -> Option<&str>;
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

impl EventSource for CleaningTaskRecord {
    fn kind(&self) -> EventKind {
        EventKind::Cleaning
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn title_candidates(&self) -> Vec<Option<&str>> {
        vec![
            self.title.as_deref(),
            self.cleaning_item.as_ref().and_then(|item| item.name.as_deref()),
            self.cleaning_item_name.as_deref(),
        ]
    }

    fn start(&self) -> Option<DateTime<Utc>> {
        self.start_time.or_else(|| self.due_date.map(start_of_day))
    }

    fn end(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    fn resource_id(&self) -> ResourceId {
        self.assigned_to
            .as_ref()
            .map(|a| a.resource_id())
            .unwrap_or_else(ResourceId::unassigned)
    }

    fn raw_status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn department(&self) -> Option<&str> {
        self.department
            .as_ref()
            .and_then(|d| d.name())
            .or_else(|| {
                self.cleaning_item
                    .as_ref()
                    .and_then(|item| item.department.as_ref())
                    .and_then(|d| d.name())
            })
    }
}

impl EventSource for ProductionTaskRecord {
    fn kind(&self) -> EventKind {
        EventKind::Production
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn title_candidates(&self) -> Vec<Option<&str>> {
        vec![
            self.title.as_deref(),
            self.recipe_name.as_deref(),
            self.recipe.as_ref().and_then(|r| r.name.as_deref()),
            self.recipe.as_ref().and_then(|r| r.recipe_name.as_deref()),
            self.recipe_details.as_ref().and_then(|r| r.name.as_deref()),
            self.recipe_details
                .as_ref()
                .and_then(|r| r.recipe_name.as_deref()),
        ]
    }

    fn start(&self) -> Option<DateTime<Utc>> {
        self.scheduled_start
            .or_else(|| self.due_date.map(start_of_day))
    }

    fn end(&self) -> Option<DateTime<Utc>> {
        self.scheduled_end
    }

    fn resource_id(&self) -> ResourceId {
        if let Some(assignee) = &self.assigned_to {
            return assignee.resource_id();
        }
        self.production_line
            .map(line_resource_id)
            .unwrap_or_else(ResourceId::unassigned)
    }

    fn raw_status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn department(&self) -> Option<&str> {
        self.department.as_ref().and_then(|d| d.name()).or_else(|| {
            [self.recipe.as_ref(), self.recipe_details.as_ref()]
                .into_iter()
                .flatten()
                .find_map(|r| r.department.as_ref().and_then(|d| d.name()))
        })
    }
}

/// First non-blank candidate, trimmed; otherwise [`DEFAULT_TITLE`].
pub fn resolve_title(candidates: &[Option<&str>]) -> String {
    candidates
        .iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_TITLE)
        .to_string()
}

fn resolve_status(source: &impl EventSource) -> EventStatus {
    match source.raw_status() {
        None => EventStatus::Pending,
        Some(raw) => EventStatus::parse_lenient(raw).unwrap_or_else(|| {
            warn!(
                "Unknown status '{}' on {} task {}, treating as pending",
                raw,
                source.kind(),
                source.id()
            );
            EventStatus::Pending
        }),
    }
}

/// Project a single record onto a calendar event.
pub fn normalize<S: EventSource>(source: &S) -> Result<CalendarEvent, NormalizeError> {
    let start = source.start().ok_or(NormalizeError::MissingStart {
        kind: source.kind(),
        id: source.id(),
    })?;

    let end = match source.end() {
        Some(end) if end < start => {
            warn!(
                "{} task {} ends before it starts, dropping end time",
                source.kind(),
                source.id()
            );
            None
        }
        other => other,
    };

    let department = source
        .department()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(UNKNOWN_DEPARTMENT)
        .to_string();

    Ok(CalendarEvent {
        id: TaskId::new(source.id()),
        kind: source.kind(),
        title: resolve_title(&source.title_candidates()),
        start,
        end,
        resource_id: source.resource_id(),
        status: resolve_status(source),
        department,
    })
}

/// Normalize a batch, skipping records that cannot be placed.
pub fn normalize_all<S: EventSource>(sources: &[S]) -> Vec<CalendarEvent> {
    sources
        .iter()
        .filter_map(|source| match normalize(source) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!("Skipping record: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssigneeRef, CleaningItemRef, DepartmentRef, RecipeRef};

    fn ts(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn production(id: i64) -> ProductionTaskRecord {
        ProductionTaskRecord {
            id,
            scheduled_start: Some(ts("2024-03-01T04:00:00Z")),
            ..Default::default()
        }
    }

    #[test]
    fn test_title_explicit_wins() {
        let record = ProductionTaskRecord {
            title: Some("Morning bake".to_string()),
            recipe_name: Some("Sourdough".to_string()),
            ..production(1)
        };
        assert_eq!(normalize(&record).unwrap().title, "Morning bake");
    }

    #[test]
    fn test_title_recipe_variants_in_order() {
        let record = ProductionTaskRecord {
            title: Some("   ".to_string()),
            recipe: Some(RecipeRef {
                recipe_name: Some("Focaccia".to_string()),
                ..Default::default()
            }),
            recipe_details: Some(RecipeRef {
                name: Some("Baguette".to_string()),
                ..Default::default()
            }),
            ..production(2)
        };
        assert_eq!(normalize(&record).unwrap().title, "Focaccia");
    }

    #[test]
    fn test_title_cleaning_item_then_default() {
        let cleaning = CleaningTaskRecord {
            id: 5,
            cleaning_item: Some(CleaningItemRef {
                name: Some("Fryer".to_string()),
                ..Default::default()
            }),
            start_time: Some(ts("2024-03-01T06:00:00Z")),
            ..Default::default()
        };
        assert_eq!(normalize(&cleaning).unwrap().title, "Fryer");

        let bare = CleaningTaskRecord {
            id: 6,
            start_time: Some(ts("2024-03-01T06:00:00Z")),
            ..Default::default()
        };
        assert_eq!(normalize(&bare).unwrap().title, DEFAULT_TITLE);
    }

    #[test]
    fn test_title_resolution_is_deterministic() {
        let record = ProductionTaskRecord {
            recipe_details: Some(RecipeRef {
                name: Some("Brioche".to_string()),
                ..Default::default()
            }),
            ..production(3)
        };
        let first = normalize(&record).unwrap();
        let second = normalize(&record).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_resource_maps_to_sentinel() {
        let event = normalize(&production(4)).unwrap();
        assert!(event.resource_id.is_unassigned());
    }

    #[test]
    fn test_production_line_used_without_assignee() {
        let record = ProductionTaskRecord {
            production_line: Some(2),
            ..production(5)
        };
        assert_eq!(normalize(&record).unwrap().resource_id.as_str(), "line-2");

        let assigned = ProductionTaskRecord {
            assigned_to: Some(AssigneeRef::Id(9)),
            production_line: Some(2),
            ..production(5)
        };
        assert_eq!(normalize(&assigned).unwrap().resource_id.as_str(), "9");
    }

    #[test]
    fn test_due_date_falls_back_to_midnight() {
        let record = CleaningTaskRecord {
            id: 7,
            due_date: Some(NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()),
            ..Default::default()
        };
        let event = normalize(&record).unwrap();
        assert_eq!(event.start, ts("2024-03-02T00:00:00Z"));
        assert!(event.end.is_none());
    }

    #[test]
    fn test_missing_start_is_an_error() {
        let record = CleaningTaskRecord {
            id: 8,
            ..Default::default()
        };
        assert_eq!(
            normalize(&record),
            Err(NormalizeError::MissingStart {
                kind: EventKind::Cleaning,
                id: 8
            })
        );
    }

    #[test]
    fn test_end_before_start_is_dropped() {
        let record = ProductionTaskRecord {
            scheduled_end: Some(ts("2024-03-01T03:00:00Z")),
            ..production(9)
        };
        assert!(normalize(&record).unwrap().end.is_none());
    }

    #[test]
    fn test_department_and_status_fallbacks() {
        let record = CleaningTaskRecord {
            id: 10,
            start_time: Some(ts("2024-03-01T06:00:00Z")),
            cleaning_item: Some(CleaningItemRef {
                department: Some(DepartmentRef::Name("Pastry".to_string())),
                ..Default::default()
            }),
            status: Some("exploded".to_string()),
            ..Default::default()
        };
        let event = normalize(&record).unwrap();
        assert_eq!(event.department, "Pastry");
        assert_eq!(event.status, EventStatus::Pending);

        let no_department = normalize(&production(11)).unwrap();
        assert_eq!(no_department.department, UNKNOWN_DEPARTMENT);
    }

    #[test]
    fn test_normalize_all_skips_unplaceable() {
        let records = vec![
            production(1),
            ProductionTaskRecord {
                id: 2,
                ..Default::default()
            },
            production(3),
        ];
        let events = normalize_all(&records);
        let ids: Vec<i64> = events.iter().map(|e| e.id.value()).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
