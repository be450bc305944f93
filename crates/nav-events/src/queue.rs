//! `EventQueue`: events keyed by the step that fires them.
//!
//! Each event is filed under the first tick whose time reaches the event
//! time (see [`SimClock::tick_for_time`]).  The driver drains everything due
//! at or before the current tick, so an event between two steps fires on the
//! later one and nothing is skipped even if a tick is never drained.

use std::collections::BTreeMap;

use nav_core::{SimClock, Tick};

use crate::Event;

#[derive(Debug, Default)]
pub struct EventQueue {
    inner: BTreeMap<Tick, Vec<Event>>,
    /// Cached total event count for O(1) `len()`.
    total: usize,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue every event on `clock`.
    pub fn from_events(events: impl IntoIterator<Item = Event>, clock: &SimClock) -> Self {
        let mut q = Self::new();
        for e in events {
            q.push(e, clock);
        }
        q
    }

    /// File `event` under the first tick of `clock` that reaches its time.
    pub fn push(&mut self, event: Event, clock: &SimClock) {
        self.push_at(clock.tick_for_time(event.time), event);
    }

    pub fn push_at(&mut self, tick: Tick, event: Event) {
        self.inner.entry(tick).or_default().push(event);
        self.total += 1;
    }

    /// Remove and return every event filed at or before `tick`, ordered by
    /// event time and then by insertion.
    pub fn drain_due(&mut self, tick: Tick) -> Vec<Event> {
        let later = match tick.0.checked_add(1) {
            Some(next) => self.inner.split_off(&Tick(next)),
            None => BTreeMap::new(),
        };
        let due = std::mem::replace(&mut self.inner, later);
        let mut out: Vec<Event> = due.into_values().flatten().collect();
        out.sort_by(|a, b| a.time.total_cmp(&b.time));
        self.total -= out.len();
        out
    }

    /// The earliest tick with at least one queued event.
    pub fn next_tick(&self) -> Option<Tick> {
        self.inner.keys().next().copied()
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct ticks with queued events.
    pub fn tick_count(&self) -> usize {
        self.inner.len()
    }
}
