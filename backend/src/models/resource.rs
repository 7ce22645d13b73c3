use serde::{Deserialize, Serialize};

use super::event::ResourceId;
use super::records::UserRecord;

/// What a calendar resource row stands for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Staff,
    Line,
    Unassigned,
}

/// A row the calendar can group and filter events by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
    pub kind: ResourceKind,
}

impl Resource {
    /// Display name used for events without an assignee.
    pub const UNASSIGNED_NAME: &'static str = "Unassigned";

    pub fn unassigned() -> Self {
        Self {
            id: ResourceId::unassigned(),
            name: Self::UNASSIGNED_NAME.to_string(),
            kind: ResourceKind::Unassigned,
        }
    }

    pub fn production_line(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: line_resource_id(id),
            name: name.into(),
            kind: ResourceKind::Line,
        }
    }
}

/// Resource id for a production line; kept apart from user ids.
pub fn line_resource_id(line_id: i64) -> ResourceId {
    ResourceId::new(format!("line-{}", line_id))
}

impl From<UserRecord> for Resource {
    fn from(user: UserRecord) -> Self {
        let full_name = [user.first_name.as_deref(), user.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        let name = if !full_name.is_empty() {
            full_name
        } else {
            user.username
                .filter(|u| !u.trim().is_empty())
                .unwrap_or_else(|| format!("User {}", user.id))
        };

        Self {
            id: ResourceId::from_optional(Some(user.id)),
            name,
            kind: ResourceKind::Staff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_name_fallbacks() {
        let full = Resource::from(UserRecord {
            id: 1,
            username: Some("jdoe".to_string()),
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
        });
        assert_eq!(full.name, "Jane Doe");
        assert_eq!(full.id.as_str(), "1");

        let username_only = Resource::from(UserRecord {
            id: 2,
            username: Some("cook2".to_string()),
            first_name: Some(" ".to_string()),
            last_name: None,
        });
        assert_eq!(username_only.name, "cook2");

        let bare = Resource::from(UserRecord {
            id: 3,
            ..Default::default()
        });
        assert_eq!(bare.name, "User 3");
    }

    #[test]
    fn test_line_ids_do_not_collide_with_users() {
        let line = Resource::production_line(1, "Line A");
        assert_eq!(line.id.as_str(), "line-1");
        assert_eq!(line.kind, ResourceKind::Line);
        assert!(Resource::unassigned().id.is_unassigned());
    }
}
