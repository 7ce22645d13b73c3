//! Calendar event projection.
//!
//! A [`CalendarEvent`] is the shape the calendar widget consumes. It is derived
//! from cleaning and production records on every fetch and never stored on
//! its own.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

super::macros::define_id_type! {
    /// Backend primary key of a cleaning or production task.
    TaskId(i64)
}

/// Which backend record family an event was projected from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Cleaning,
    Production,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Cleaning => "cleaning",
            EventKind::Production => "production",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cleaning" => Ok(EventKind::Cleaning),
            "production" | "recipe" => Ok(EventKind::Production),
            _ => Err(format!("Unknown event kind: {}", s)),
        }
    }
}

/// Identifies an event across both record families.
///
/// Cleaning and production ids come from separate backend tables and can
/// collide, so the kind is part of the key. Renders as `"<kind>-<id>"`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventKey {
    pub kind: EventKind,
    pub id: TaskId,
}

impl EventKey {
    pub fn new(kind: EventKind, id: i64) -> Self {
        Self {
            kind,
            id: TaskId::new(id),
        }
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.id)
    }
}

impl FromStr for EventKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .rsplit_once('-')
            .ok_or_else(|| format!("Invalid event key: {}", s))?;
        let kind = kind.parse::<EventKind>()?;
        let id = id
            .parse::<TaskId>()
            .map_err(|e| format!("Invalid event id in {}: {}", s, e))?;
        Ok(Self { kind, id })
    }
}

/// Task status as shown on the calendar.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Skipped,
    Cancelled,
}

impl EventStatus {
    pub const ALL: [EventStatus; 5] = [
        EventStatus::Pending,
        EventStatus::InProgress,
        EventStatus::Completed,
        EventStatus::Skipped,
        EventStatus::Cancelled,
    ];

    /// Parse the spellings the backend and the UI have used over time.
    ///
    /// Matching ignores case and treats spaces, dashes and underscores alike.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();

        match normalized.as_str() {
            "pending" | "scheduled" | "todo" | "to_do" | "not_started" => Some(Self::Pending),
            "in_progress" | "inprogress" | "started" => Some(Self::InProgress),
            "completed" | "complete" | "done" => Some(Self::Completed),
            "skipped" | "missed" => Some(Self::Skipped),
            "cancelled" | "canceled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Pending => "pending",
            EventStatus::InProgress => "in_progress",
            EventStatus::Completed => "completed",
            EventStatus::Skipped => "skipped",
            EventStatus::Cancelled => "cancelled",
        }
    }

    /// Human-readable label used in drawers and toasts.
    pub fn label(&self) -> &'static str {
        match self {
            EventStatus::Pending => "Pending",
            EventStatus::InProgress => "In Progress",
            EventStatus::Completed => "Completed",
            EventStatus::Skipped => "Skipped",
            EventStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_lenient(s).ok_or_else(|| format!("Unknown task status: {}", s))
    }
}

/// Identifier of a calendar resource (staff member or production line).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub String);

impl ResourceId {
    /// Stands in for "no resource assigned" so such events stay selectable.
    pub const UNASSIGNED: &'static str = "unassigned";

    pub fn new(value: impl Into<String>) -> Self {
        ResourceId(value.into())
    }

    pub fn unassigned() -> Self {
        ResourceId(Self::UNASSIGNED.to_string())
    }

    /// Map an optional backend reference onto a resource id.
    ///
    /// `None` and blank values resolve to the unassigned sentinel.
    pub fn from_optional<T: ToString>(value: Option<T>) -> Self {
        match value.map(|v| v.to_string()) {
            Some(v) if !v.trim().is_empty() => ResourceId(v.trim().to_string()),
            _ => Self::unassigned(),
        }
    }

    pub fn is_unassigned(&self) -> bool {
        self.0 == Self::UNASSIGNED
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        ResourceId::from_optional(Some(value))
    }
}

/// Normalized projection of a cleaning or production task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: TaskId,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub resource_id: ResourceId,
    pub status: EventStatus,
    pub department: String,
}

impl CalendarEvent {
    pub fn key(&self) -> EventKey {
        EventKey {
            kind: self.kind,
            id: self.id,
        }
    }
}
