//! Simulation observer trait for progress reporting and data collection.

use nav_building::{DoorState, Fingerprint};
use nav_core::{PedId, SegmentId, Tick};
use nav_events::Event;

use crate::GossipStats;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// step loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: door log
///
/// ```rust,ignore
/// struct DoorLog(Vec<(Tick, SegmentId)>);
///
/// impl SimObserver for DoorLog {
///     fn on_door_event(&mut self, tick: Tick, event: &Event, changed: bool) {
///         if changed {
///             self.0.push((tick, event.segment));
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each step, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per event handled this step, in firing order.
    fn on_door_event(&mut self, _tick: Tick, _event: &Event, _changed: bool) {}

    /// Called when flow regulation closed or reopened a door.
    fn on_flow_regulated(&mut self, _tick: Tick, _segment: SegmentId, _state: DoorState) {}

    /// Called when the door configuration changed and pedestrians moved to
    /// another engine.  `built` is `false` for a cache hit.
    fn on_engine_switch(&mut self, _tick: Tick, _from: &Fingerprint, _to: &Fingerprint, _built: bool) {}

    /// Called after the gossip pass, if one is configured.
    fn on_gossip(&mut self, _tick: Tick, _stats: &GossipStats) {}

    /// Called for each pedestrian whose router found no target this step.
    fn on_no_route(&mut self, _tick: Tick, _ped: PedId) {}

    /// Called at the end of each step.  `routed` counts pedestrians holding
    /// a target afterwards.
    fn on_tick_end(&mut self, _tick: Tick, _routed: usize) {}

    /// Called once after the final step completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
