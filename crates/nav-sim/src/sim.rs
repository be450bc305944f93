//! The `Sim` struct and its step loop.

use nav_agent::{PedRngs, Pedestrian};
use nav_building::Building;
use nav_core::{SegmentUid, SimClock, SimConfig, Tick};
use nav_router::{RouteContext, RouterResult, RoutingEngine};

use crate::{EventManager, KnowledgeExchange, SimObserver, SimResult};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The routing simulation runner.
///
/// `Sim` holds the building, the pedestrians, and the event machinery, and
/// drives the four-phase step:
///
/// 1. **Events**: due door events are applied, flow-regulated doors close
///    or reopen, and, if the door configuration changed, pedestrians move
///    to the matching engine (built once per configuration, then cached).
/// 2. **Gossip** (optional): door observation and knowledge exchange.
/// 3. **Decide** (optionally parallel with the `parallel` feature): every
///    pedestrian's router is queried against the current engine.
/// 4. **Apply** (sequential, ascending index for determinism): targets are
///    written back onto the pedestrians.
///
/// Movement is not simulated; callers update `pos`, `room`, and `subroom`
/// between steps.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Global configuration (total ticks, seed, step duration, …).
    pub config: SimConfig,

    /// Tracks the current tick and maps it to seconds.
    pub clock: SimClock,

    /// Door states change as events fire.
    pub building: Building,

    pub peds: Vec<Pedestrian>,

    /// Per-pedestrian deterministic RNGs, separated for the split-borrow
    /// pattern.
    pub rngs: PedRngs,

    pub events: EventManager,

    /// `None` disables observation and gossip.
    pub gossip: Option<KnowledgeExchange>,

    /// Dedicated pool when `config.num_threads` is set; otherwise Rayon's
    /// global pool is used.
    #[cfg(feature = "parallel")]
    pub(crate) pool: Option<rayon::ThreadPool>,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every step boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` steps from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Seconds at the current tick.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn engine(&self) -> &RoutingEngine {
        self.events.engine()
    }

    // ── Core step processing ──────────────────────────────────────────────

    fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let routed = self.process_tick(now, observer)?;
        observer.on_tick_end(now, routed);
        self.clock.advance();
        Ok(())
    }

    fn process_tick<O: SimObserver>(&mut self, now: Tick, observer: &mut O) -> SimResult<usize> {
        let time = self.clock.time_of(now);

        // ── Phase 1: door events and engine switch ────────────────────────
        let step = self.events.process_events(now, &mut self.building, &mut self.peds)?;
        for (event, changed) in &step.applied {
            observer.on_door_event(now, event, *changed);
        }
        for &(segment, state) in &step.regulated {
            observer.on_flow_regulated(now, segment, state);
        }
        if let Some(s) = &step.switched {
            observer.on_engine_switch(now, &s.from, &s.to, s.built);
        }

        // ── Phase 2: gossip ───────────────────────────────────────────────
        if let Some(gossip) = &self.gossip {
            let stats = gossip.step(time, &self.building, &mut self.peds, &mut self.rngs);
            observer.on_gossip(now, &stats);
        }

        // ── Phase 3: decide (read-only) ───────────────────────────────────
        let exits = self.decide(time)?;

        // ── Phase 4: apply ────────────────────────────────────────────────
        //
        // Ascending pedestrian index, so results do not depend on how the
        // decide phase was scheduled.
        let mut routed = 0;
        for (ped, exit) in self.peds.iter_mut().zip(exits) {
            ped.set_route(exit, time);
            match exit {
                Some(_) => routed += 1,
                None => observer.on_no_route(now, ped.id),
            }
        }
        Ok(routed)
    }

    /// Query every pedestrian's router against a snapshot of the crowd.
    /// With the `parallel` Cargo feature the queries run on Rayon's pool.
    fn decide(&self, time: f64) -> RouterResult<Vec<Option<SegmentUid>>> {
        // Explicit field borrows so the closure captures only shared data.
        let engine: &RoutingEngine = self.events.engine();
        let peds   = self.peds.as_slice();
        let ctx    = RouteContext::new(time, peds);

        #[cfg(not(feature = "parallel"))]
        {
            peds.iter().map(|p| engine.decide(p, &ctx)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            let run = || -> RouterResult<Vec<Option<SegmentUid>>> {
                peds.par_iter().map(|p| engine.decide(p, &ctx)).collect()
            };
            match &self.pool {
                Some(pool) => pool.install(run),
                None => run(),
            }
        }
    }
}
