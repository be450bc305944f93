//! `nav-building`: the building snapshot routers work against.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                 |
//! |-----------------|----------------------------------------------------------|
//! | [`building`]    | `Building`, `Room`, `SubRoom`, `Goal`, R-tree over doors |
//! | [`builder`]     | `BuildingBuilder` with boundary-wall derivation          |
//! | [`segment`]     | `NavSegment`, `DoorState`, `SegmentKind`, usage counters |
//! | [`fingerprint`] | `Fingerprint`: canonical door-configuration key        |
//! | [`error`]       | `BuildingError`, `BuildingResult<T>`                     |
//!
//! Geometry file parsing is out of scope; loaders drive `BuildingBuilder`.

pub mod builder;
pub mod building;
pub mod error;
pub mod fingerprint;
pub mod segment;

#[cfg(test)]
mod tests;

pub use builder::BuildingBuilder;
pub use building::{Building, Goal, Room, SubRoom};
pub use error::{BuildingError, BuildingResult};
pub use fingerprint::Fingerprint;
pub use segment::{DoorState, NavSegment, SegmentKind};
