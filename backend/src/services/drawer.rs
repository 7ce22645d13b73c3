//! Drawer and modal coordination for the calendar pages.
//!
//! At most one drawer or modal is open at a time. Opening one replaces
//! whatever was open before; there is no stack to return to.

use serde::{Deserialize, Serialize};

use crate::models::EventKey;

/// Which drawer or modal is open, and for which task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "task", rename_all = "snake_case")]
pub enum DrawerMode {
    #[default]
    Closed,
    Detail(EventKey),
    Edit(EventKey),
    ChangeStatus(EventKey),
    /// Print view for one task, or for the whole schedule.
    Print(Option<EventKey>),
}

impl DrawerMode {
    pub fn active_task(&self) -> Option<EventKey> {
        match self {
            DrawerMode::Closed => None,
            DrawerMode::Detail(key) | DrawerMode::Edit(key) | DrawerMode::ChangeStatus(key) => {
                Some(*key)
            }
            DrawerMode::Print(key) => *key,
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, DrawerMode::Closed)
    }

    fn name(&self) -> &'static str {
        match self {
            DrawerMode::Closed => "closed",
            DrawerMode::Detail(_) => "detail",
            DrawerMode::Edit(_) => "edit",
            DrawerMode::ChangeStatus(_) => "change_status",
            DrawerMode::Print(_) => "print",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DrawerError {
    #[error("cannot open {target} from {from}")]
    InvalidTransition {
        from: &'static str,
        target: &'static str,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DrawerCoordinator {
    mode: DrawerMode,
    inline_error: Option<String>,
}

impl DrawerCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> DrawerMode {
        self.mode
    }

    pub fn active_task(&self) -> Option<EventKey> {
        self.mode.active_task()
    }

    /// Error from the last failed save, shown inline in the open modal.
    pub fn inline_error(&self) -> Option<&str> {
        self.inline_error.as_deref()
    }

    /// Event click. Replaces anything currently open.
    pub fn open_detail(&mut self, key: EventKey) {
        self.transition(DrawerMode::Detail(key));
    }

    /// "Edit" from the detail drawer. The detail drawer closes.
    pub fn open_edit(&mut self) -> Result<(), DrawerError> {
        let key = self.require_detail("edit")?;
        self.transition(DrawerMode::Edit(key));
        Ok(())
    }

    /// "Change Status" from the detail drawer.
    pub fn open_change_status(&mut self) -> Result<(), DrawerError> {
        let key = self.require_detail("change_status")?;
        self.transition(DrawerMode::ChangeStatus(key));
        Ok(())
    }

    /// Print the whole schedule from closed, or the active task from detail.
    pub fn open_print(&mut self) -> Result<(), DrawerError> {
        let target = match self.mode {
            DrawerMode::Closed => None,
            DrawerMode::Detail(key) => Some(key),
            other => {
                return Err(DrawerError::InvalidTransition {
                    from: other.name(),
                    target: "print",
                })
            }
        };
        self.transition(DrawerMode::Print(target));
        Ok(())
    }

    pub fn close(&mut self) {
        self.transition(DrawerMode::Closed);
    }

    /// Feed back the outcome of the save behind the open modal.
    ///
    /// Success closes the modal. Failure leaves the mode untouched and keeps
    /// the message for inline display.
    pub fn record_save_result<E: std::fmt::Display>(&mut self, result: Result<(), E>) {
        match result {
            Ok(()) => self.close(),
            Err(e) => self.inline_error = Some(e.to_string()),
        }
    }

    fn require_detail(&self, target: &'static str) -> Result<EventKey, DrawerError> {
        match self.mode {
            DrawerMode::Detail(key) => Ok(key),
            other => Err(DrawerError::InvalidTransition {
                from: other.name(),
                target,
            }),
        }
    }

    fn transition(&mut self, next: DrawerMode) {
        self.mode = next;
        self.inline_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventKind;

    fn key(id: i64) -> EventKey {
        EventKey::new(EventKind::Cleaning, id)
    }

    #[test]
    fn test_detail_then_edit_closes_detail() {
        let mut drawer = DrawerCoordinator::new();
        drawer.open_detail(key(1));
        drawer.open_edit().unwrap();
        assert_eq!(drawer.mode(), DrawerMode::Edit(key(1)));
    }

    #[test]
    fn test_detail_then_change_status() {
        let mut drawer = DrawerCoordinator::new();
        drawer.open_detail(key(2));
        drawer.open_change_status().unwrap();
        assert_eq!(drawer.mode(), DrawerMode::ChangeStatus(key(2)));
        assert_eq!(drawer.active_task(), Some(key(2)));
    }

    #[test]
    fn test_opening_another_replaces_current() {
        let mut drawer = DrawerCoordinator::new();
        drawer.open_detail(key(1));
        drawer.open_edit().unwrap();

        drawer.open_detail(key(2));
        assert_eq!(drawer.mode(), DrawerMode::Detail(key(2)));
        assert_ne!(drawer.mode(), DrawerMode::Edit(key(1)));

        drawer.open_print().unwrap();
        assert_eq!(drawer.mode(), DrawerMode::Print(Some(key(2))));
    }

    #[test]
    fn test_edit_requires_detail() {
        let mut drawer = DrawerCoordinator::new();
        let err = drawer.open_edit().unwrap_err();
        assert_eq!(
            err,
            DrawerError::InvalidTransition {
                from: "closed",
                target: "edit"
            }
        );
        assert_eq!(drawer.mode(), DrawerMode::Closed);
    }

    #[test]
    fn test_print_from_edit_is_rejected() {
        let mut drawer = DrawerCoordinator::new();
        drawer.open_detail(key(1));
        drawer.open_edit().unwrap();
        assert!(drawer.open_print().is_err());
        assert_eq!(drawer.mode(), DrawerMode::Edit(key(1)));
    }

    #[test]
    fn test_print_whole_schedule_from_closed() {
        let mut drawer = DrawerCoordinator::new();
        drawer.open_print().unwrap();
        assert_eq!(drawer.mode(), DrawerMode::Print(None));
        assert!(drawer.active_task().is_none());
    }

    #[test]
    fn test_close_from_any_state() {
        let mut drawer = DrawerCoordinator::new();
        drawer.open_detail(key(3));
        drawer.open_change_status().unwrap();
        drawer.close();
        assert!(!drawer.mode().is_open());
    }

    #[test]
    fn test_failed_save_keeps_modal_open() {
        let mut drawer = DrawerCoordinator::new();
        drawer.open_detail(key(4));
        drawer.open_edit().unwrap();

        drawer.record_save_result::<String>(Err("Start time is required".to_string()));
        assert_eq!(drawer.mode(), DrawerMode::Edit(key(4)));
        assert_eq!(drawer.inline_error(), Some("Start time is required"));

        drawer.record_save_result::<String>(Ok(()));
        assert_eq!(drawer.mode(), DrawerMode::Closed);
        assert!(drawer.inline_error().is_none());
    }

    #[test]
    fn test_mode_serializes_tagged() {
        let value = serde_json::to_value(DrawerMode::Edit(key(5))).unwrap();
        assert_eq!(value["mode"], "edit");
        assert_eq!(value["task"]["id"], 5);
    }
}
