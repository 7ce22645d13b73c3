//! Backend record shapes.
//!
//! These mirror the JSON the task backend returns. The backend has grown
//! several spellings for the same facts (nested objects versus flat name
//! fields, ids versus embedded users), so almost everything is optional and
//! the normalization layer decides what to make of it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::event::ResourceId;

/// A department given either as a bare name or as an embedded object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DepartmentRef {
    Name(String),
    Object {
        #[serde(default)]
        id: Option<i64>,
        #[serde(default)]
        name: Option<String>,
    },
}

impl DepartmentRef {
    pub fn name(&self) -> Option<&str> {
        match self {
            DepartmentRef::Name(name) => Some(name.as_str()),
            DepartmentRef::Object { name, .. } => name.as_deref(),
        }
    }
}

/// An assignee given as a user id, a username, or an embedded user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssigneeRef {
    Id(i64),
    Username(String),
    User {
        id: i64,
        #[serde(default)]
        username: Option<String>,
    },
}

impl AssigneeRef {
    pub fn resource_id(&self) -> ResourceId {
        match self {
            AssigneeRef::Id(id) => ResourceId::from_optional(Some(id)),
            AssigneeRef::Username(name) => ResourceId::from_optional(Some(name)),
            AssigneeRef::User { id, .. } => ResourceId::from_optional(Some(id)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningItemRef {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub department: Option<DepartmentRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeRef {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub recipe_name: Option<String>,
    #[serde(default)]
    pub department: Option<DepartmentRef>,
}

/// Cleaning task instance as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningTaskRecord {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub cleaning_item: Option<CleaningItemRef>,
    #[serde(default)]
    pub cleaning_item_name: Option<String>,
    #[serde(default, alias = "start")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, alias = "end")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub assigned_to: Option<AssigneeRef>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub department: Option<DepartmentRef>,
}

/// Production (recipe) task as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionTaskRecord {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<RecipeRef>,
    #[serde(default)]
    pub recipe_name: Option<String>,
    #[serde(default)]
    pub recipe_details: Option<RecipeRef>,
    #[serde(default, alias = "start_time", alias = "start")]
    pub scheduled_start: Option<DateTime<Utc>>,
    #[serde(default, alias = "end_time", alias = "end")]
    pub scheduled_end: Option<DateTime<Utc>>,
    #[serde(default, alias = "scheduled_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub assigned_to: Option<AssigneeRef>,
    #[serde(default)]
    pub production_line: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub department: Option<DepartmentRef>,
}

/// Staff member as returned by the backend users endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Production line as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionLineRecord {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

/// Half-open window `[start, end)` the calendar is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

/// New placement of a task after a calendar drop or resize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleChange {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    /// `None` keeps the current assignment.
    #[serde(default)]
    pub resource_id: Option<ResourceId>,
}
