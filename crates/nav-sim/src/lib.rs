//! `nav-sim`: step driver for dynamic pedestrian routing.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`cache`]    | `EngineCache`: one `RoutingEngine` per door configuration  |
//! | [`manager`]  | `EventManager`: door state machine and engine switching     |
//! | [`gossip`]   | `KnowledgeExchange`: door observation and pairwise gossip   |
//! | [`sim`]      | `Sim`: the four-phase step loop                            |
//! | [`builder`]  | `SimBuilder`: validation and wiring                        |
//! | [`observer`] | `SimObserver` callbacks, `NoopObserver`                     |
//! | [`logging`]  | `tracing-subscriber` setup                                  |
//! | [`error`]    | `SimError`, `SimResult<T>`                                  |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `parallel` | Decide phase and floor-field construction on Rayon.        |
//! | `serde`    | Propagates serde derives to the configuration types.       |

pub mod builder;
pub mod cache;
pub mod error;
pub mod gossip;
pub mod logging;
pub mod manager;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use cache::EngineCache;
pub use error::{SimError, SimResult};
pub use gossip::{GossipStats, KnowledgeExchange};
pub use manager::{EngineSwitch, EventManager, StepEvents};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
