//! Calendar core logic.
//!
//! Everything here is independent of the HTTP layer: record normalization,
//! the filter engine, page state, the drawer coordinator and the drag/drop
//! adapter that talks to the repository.

pub mod calendar_adapter;
pub mod drawer;
pub mod filter;
pub mod normalize;
pub mod schedule_state;

pub use calendar_adapter::{handle_drop, reschedule, DropError, EventDrop, EventSpan};
pub use drawer::{DrawerCoordinator, DrawerError, DrawerMode};
pub use filter::{filter_events, FilterCriteria};
pub use normalize::{normalize, normalize_all, EventSource, NormalizeError};
pub use schedule_state::{ListFilter, ScheduleState};
