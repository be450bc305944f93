//! `nav-agent`: the pedestrian side of the routing interface.
//!
//! | Module          | Contents                                            |
//! |-----------------|-----------------------------------------------------|
//! | [`pedestrian`]  | `Pedestrian` navigation state                       |
//! | [`knowledge`]   | `Knowledge`, `KnowledgeEntry`, `KnowledgeConfig`     |
//! | [`crowd`]       | `CrowdBuilder`, `PedRngs`                           |

pub mod crowd;
pub mod knowledge;
pub mod pedestrian;

#[cfg(test)]
mod tests;

pub use crowd::{CrowdBuilder, PedRngs};
pub use knowledge::{Knowledge, KnowledgeConfig, KnowledgeEntry, MergeOutcome};
pub use pedestrian::{Pedestrian, DEFAULT_V0};
