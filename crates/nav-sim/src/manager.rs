//! `EventManager`: the door state machine and engine switching.

use std::path::PathBuf;
use std::sync::Arc;

use nav_agent::Pedestrian;
use nav_building::{Building, DoorState, Fingerprint};
use nav_core::{SegmentId, SimClock, Tick};
use nav_events::{Event, EventAction, EventQueue, FeedCursor};
use nav_router::RoutingEngine;

use crate::{EngineCache, SimResult};

/// What one call to [`EventManager::process_events`] did.
#[derive(Debug, Default)]
pub struct StepEvents {
    /// Every event handled this step with whether it changed its door.
    pub applied:  Vec<(Event, bool)>,
    /// Doors whose flow regulation closed or reopened them, with the new state.
    pub regulated: Vec<(SegmentId, DoorState)>,
    /// Set when the active engine changed.
    pub switched: Option<EngineSwitch>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineSwitch {
    pub from:  Fingerprint,
    pub to:    Fingerprint,
    /// `false` when the engine came from the cache.
    pub built: bool,
}

/// Owns the pending door events, the engine cache, and the engine for the
/// current door configuration.
///
/// Pedestrians are switched only when the fingerprint actually changes, so a
/// door that toggles between `Open` and `TempClosed` never costs a lookup.
#[derive(Debug)]
pub struct EventManager {
    queue:    EventQueue,
    clock:    SimClock,
    template: RoutingEngine,
    cache:    Arc<EngineCache>,
    current:  Fingerprint,
    engine:   Arc<RoutingEngine>,
    feed:     Option<(FeedCursor, PathBuf)>,
}

impl EventManager {
    /// Build (or fetch from `cache`) the engine for `building`'s current
    /// configuration.  `template` supplies the router configs and is never
    /// initialised itself.
    pub fn new(template: RoutingEngine, building: &Building, clock: SimClock, cache: Arc<EngineCache>) -> SimResult<Self> {
        let current = building.fingerprint();
        let (engine, _) = cache.get_or_build(&current, || template.build_for(building))?;
        Ok(Self { queue: EventQueue::new(), clock, template, cache, current, engine, feed: None })
    }

    pub fn push(&mut self, event: Event) {
        self.queue.push(event, &self.clock);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = Event>) {
        for e in events {
            self.push(e);
        }
    }

    /// Poll `path` for `door <id> <state>` lines every step.
    pub fn watch_feed(&mut self, path: PathBuf) {
        self.feed = Some((FeedCursor::new(), path));
    }

    pub fn engine(&self) -> &Arc<RoutingEngine> {
        &self.engine
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.current
    }

    pub fn cache(&self) -> &Arc<EngineCache> {
        &self.cache
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Point every pedestrian at the current engine.
    pub fn attach(&self, peds: &mut [Pedestrian]) {
        for p in peds {
            p.engine = self.current.clone();
        }
    }

    /// Apply every event due at `now`, step flow regulation, then switch
    /// engines if the door configuration changed.
    ///
    /// The fingerprint is recomputed even without events so doors closed by
    /// reaching their usage limit are picked up.  Pedestrians on the old
    /// engine get the new one and lose their current target; their router
    /// assignment is kept.
    pub fn process_events(&mut self, now: Tick, building: &mut Building, peds: &mut [Pedestrian]) -> SimResult<StepEvents> {
        let mut due = self.queue.drain_due(now);
        if let Some((cursor, path)) = &mut self.feed {
            due.extend(cursor.poll_file(path, self.clock.time_of(now))?);
        }

        let mut out = StepEvents::default();
        for event in due {
            if let Some(changed) = apply(building, &event) {
                out.applied.push((event, changed));
            }
        }

        for id in building.regulate_flow(self.clock.time_of(now), self.clock.dt_secs) {
            let Some(seg) = building.segment_by_id(id) else { continue };
            tracing::info!(segment = id.0, state = ?seg.state(), closing_time = seg.closing_time(), "door regulated by flow");
            out.regulated.push((id, seg.state()));
        }

        let fp = building.fingerprint();
        if fp != self.current {
            let (engine, built) = self.cache.get_or_build(&fp, || self.template.build_for(building))?;
            let from = std::mem::replace(&mut self.current, fp);
            self.engine = engine;

            let mut moved = 0usize;
            for p in peds.iter_mut().filter(|p| p.engine == from) {
                p.engine = self.current.clone();
                p.clear_route();
                moved += 1;
            }
            tracing::info!(from = %from, to = %self.current, built, pedestrians = moved, "routing engine switched");
            out.switched = Some(EngineSwitch { from, to: self.current.clone(), built });
        }
        Ok(out)
    }
}

/// Run one event through the door state machine.  `None` if the segment is
/// unknown.
fn apply(building: &mut Building, event: &Event) -> Option<bool> {
    let seg = match building.segment_by_id_mut(event.segment) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(event = %event, error = %e, "event for unknown segment skipped");
            return None;
        }
    };
    let changed = match event.action {
        EventAction::Open => seg.open(),
        EventAction::Close => seg.close(),
        EventAction::TempClose => seg.temp_close(),
        EventAction::ResetUsage => seg.reset_usage(),
        EventAction::Nothing => false,
    };
    if changed {
        tracing::info!(segment = event.segment.0, action = %event.action, state = ?seg.state(), "door state changed");
    } else if event.action != EventAction::Nothing {
        tracing::warn!(segment = event.segment.0, action = %event.action, "door already in target state");
    }
    Some(changed)
}
