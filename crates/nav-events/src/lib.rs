//! `nav-events`: door events and where they come from.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`event`]    | `Event`, `EventAction`                                    |
//! | [`queue`]    | `EventQueue` (`BTreeMap<Tick, Vec<Event>>`)               |
//! | [`loader`]   | `load_events_csv`, `load_events_reader`                   |
//! | [`schedule`] | `DoorSchedule`, `load_schedule_csv`, `load_schedule_reader` |
//! | [`feed`]     | `FeedCursor` for live `door <id> <state>` lines           |
//! | [`error`]    | `EventError`, `EventResult<T>`                            |
//!
//! Sources produce plain `Event`s; the simulation files them in an
//! `EventQueue` against its clock and drains what is due each step.

pub mod error;
pub mod event;
pub mod feed;
pub mod loader;
pub mod queue;
pub mod schedule;

#[cfg(test)]
mod tests;

pub use error::{EventError, EventResult};
pub use event::{Event, EventAction};
pub use feed::FeedCursor;
pub use loader::{load_events_csv, load_events_reader};
pub use queue::EventQueue;
pub use schedule::{load_schedule_csv, load_schedule_reader, DoorSchedule, ScheduleGroup, ScheduleTime};
