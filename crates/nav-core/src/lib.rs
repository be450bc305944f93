//! `nav-core`: foundational types for the pedestrian routing workspace.
//!
//! This crate is a dependency of every other `nav-*` crate.  It has no
//! `nav-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                                      |
//! |-----------|---------------------------------------------------------------|
//! | [`ids`]   | `SegmentId`, `SegmentUid`, `RoomId`, `SubRoomId`, `PedId`, `RouterId`, `GoalId` |
//! | [`geo`]   | `Point`, `Line`, polygon helpers                              |
//! | [`time`]  | `Tick`, `SimClock`, `SimConfig`, `TIME_EPS`                    |
//! | [`rng`]   | `PedRng` (per-pedestrian), `SimRng` (global)                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use geo::{Line, Point, GEO_EPS};
pub use ids::{GoalId, PedId, RoomId, RouterId, SegmentId, SegmentUid, SubRoomId};
pub use rng::{PedRng, SimRng};
pub use time::{SimClock, SimConfig, Tick, TIME_EPS};
