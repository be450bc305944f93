//! `nav-field`: grid distance-field ("floor field") solver.
//!
//! A room is rasterised at resolution `delta_h` ([`Raster`]); for each
//! target segment, fast marching propagates arrival times outward from the
//! target's cells with walls as barriers ([`DistanceField`]).  Routers use
//! the fields to compare walking distances without line of sight; the
//! operational model can steer along [`DistanceField::direction_at`].
//!
//! | Module     | Contents                                               |
//! |------------|--------------------------------------------------------|
//! | [`config`] | `FloorFieldConfig`                                     |
//! | [`grid`]   | `RectGrid`: keys, sample points, neighbours           |
//! | [`raster`] | `Raster`, `Cell`                                       |
//! | `fmm`      | fast marching core                                     |
//! | [`field`]  | `DistanceField`: per-target costs and directions      |
//! | [`room`]   | `RoomFields`: every field of one room                 |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Builds a room's fields on Rayon's thread pool.         |
//! | `serde`    | Derives `Serialize`/`Deserialize` on `FloorFieldConfig`. |

pub mod config;
pub mod error;
pub mod field;
pub(crate) mod fmm;
pub mod grid;
pub mod raster;
pub mod room;

#[cfg(test)]
mod tests;

pub use config::FloorFieldConfig;
pub use error::{FieldError, FieldResult};
pub use field::DistanceField;
pub use grid::RectGrid;
pub use raster::{Cell, Raster};
pub use room::RoomFields;
