//! `nav-router`: route choice for pedestrians.
//!
//! Every router is bound to one door configuration: `init` captures the
//! building's navigable segments, builds a door graph (straight-line or
//! floor-field weighted) and closes it with Floyd–Warshall.  `find_exit`
//! then answers "which segment next?" without mutating anything.
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`strategy`]  | `RoutingStrategy`, `ExitStrategy`                         |
//! | [`config`]    | `RouterConfig`, `QuickestConfig`                          |
//! | [`topology`]  | `Topology`, `Finals`: frozen building view               |
//! | [`graph`]     | `CostMatrix`, graph builders                              |
//! | [`context`]   | `RouteContext`: time and crowd for one query             |
//! | [`router`]    | `Router` trait, `DoorGraph`                               |
//! | [`shortest`]  | `ShortestRouter` (global / local shortest)                |
//! | [`quickest`]  | `QuickestRouter` (congestion-aware)                       |
//! | [`floorfield`]| `FloorFieldRouter` (ff global / local / quickest)         |
//! | [`engine`]    | `RoutingEngine`                                           |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Floor fields are marched on Rayon's thread pool.          |
//! | `serde`    | Derives `Serialize`/`Deserialize` on configs and enums.   |

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod floorfield;
pub mod graph;
pub mod quickest;
pub mod router;
pub mod shortest;
pub mod strategy;
pub mod topology;


pub use config::{QuickestConfig, RouterConfig, DEFAULT_RECALC_INTERVAL};
pub use context::RouteContext;
pub use engine::RoutingEngine;
pub use error::{RouterError, RouterResult};
pub use graph::CostMatrix;
pub use router::{build_router, Router};
pub use strategy::{ExitStrategy, RoutingStrategy};
