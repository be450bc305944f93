//! Door schedules: groups of doors that open together at fixed times and
//! close again after a fixed interval.
//!
//! # CSV format
//!
//! Groups, one row per member door (`max_agents` may be left empty):
//!
//! ```csv
//! group,segment,max_agents
//! 0,3,20
//! 0,4,20
//! 1,7,
//! ```
//!
//! Times, one row per opening:
//!
//! ```csv
//! group,t,closing_time,reset
//! 0,10,5,false
//! 0,40,5,false
//! 1,15,10,true
//! ```
//!
//! Each opening at `t` emits OPEN (or RESET_USAGE when `reset` is set) for
//! every member at `t`, and TEMP_CLOSE at `t + closing_time`.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use nav_core::SegmentId;

use crate::{Event, EventAction, EventError, EventResult};

// ── Types ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScheduleGroup {
    pub members:    Vec<SegmentId>,
    /// Usage limit applied to every member.
    pub max_agents: Option<u32>,
}

/// One opening of a group.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleTime {
    pub group:        u32,
    pub t:            f64,
    pub closing_time: f64,
    pub reset:        bool,
}

#[derive(Clone, Debug, Default)]
pub struct DoorSchedule {
    pub groups: BTreeMap<u32, ScheduleGroup>,
    pub times:  Vec<ScheduleTime>,
}

impl DoorSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_member(&mut self, group: u32, segment: SegmentId) {
        self.groups.entry(group).or_default().members.push(segment);
    }

    pub fn set_max_agents(&mut self, group: u32, max: u32) {
        self.groups.entry(group).or_default().max_agents = Some(max);
    }

    pub fn add_time(&mut self, group: u32, t: f64, closing_time: f64, reset: bool) {
        self.times.push(ScheduleTime { group, t, closing_time, reset });
    }

    /// Every event the schedule implies, sorted by time.
    pub fn expand(&self) -> EventResult<Vec<Event>> {
        let mut events = Vec::new();
        for st in &self.times {
            let group = self.groups.get(&st.group).ok_or(EventError::UnknownGroup(st.group))?;
            if !(st.closing_time.is_finite() && st.closing_time > 0.0) {
                return Err(EventError::InvalidTime(st.closing_time));
            }
            let opening = if st.reset { EventAction::ResetUsage } else { EventAction::Open };
            for &door in &group.members {
                events.push(Event::new(door, st.t, opening).validated()?);
                events.push(Event::new(door, st.t + st.closing_time, EventAction::TempClose).validated()?);
            }
        }
        events.sort_by(|a, b| a.time.total_cmp(&b.time));
        Ok(events)
    }

    /// `(door, limit)` for every member of a group with `max_agents`.
    pub fn usage_limits(&self) -> Vec<(SegmentId, u32)> {
        let mut out: Vec<(SegmentId, u32)> = self
            .groups
            .values()
            .filter_map(|g| g.max_agents.map(|m| (g, m)))
            .flat_map(|(g, m)| g.members.iter().map(move |&d| (d, m)))
            .collect();
        out.sort_unstable();
        out
    }
}

// ── Loaders ───────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct GroupRecord {
    group:      u32,
    segment:    u32,
    max_agents: Option<u32>,
}

#[derive(Deserialize)]
struct TimeRecord {
    group:        u32,
    t:            f64,
    closing_time: f64,
    reset:        Option<String>,
}

/// Load a schedule from a groups file and a times file.
pub fn load_schedule_csv(groups: &Path, times: &Path) -> EventResult<DoorSchedule> {
    let g = std::fs::File::open(groups)?;
    let t = std::fs::File::open(times)?;
    load_schedule_reader(g, t)
}

/// Like [`load_schedule_csv`] but accepts any `Read` sources.
pub fn load_schedule_reader<G: Read, T: Read>(groups: G, times: T) -> EventResult<DoorSchedule> {
    let mut schedule = DoorSchedule::new();

    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(groups);
    for result in rdr.deserialize::<GroupRecord>() {
        let rec = result.map_err(|e| EventError::Parse(e.to_string()))?;
        schedule.add_member(rec.group, SegmentId(rec.segment));
        if let Some(max) = rec.max_agents {
            schedule.set_max_agents(rec.group, max);
        }
    }

    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(times);
    for result in rdr.deserialize::<TimeRecord>() {
        let rec = result.map_err(|e| EventError::Parse(e.to_string()))?;
        let reset = match rec.reset.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("") | Some("false") | Some("0") => false,
            Some("true") | Some("1") => true,
            Some(other) => {
                tracing::warn!(group = rec.group, value = other, "unreadable reset flag; using false");
                false
            }
        };
        schedule.add_time(rec.group, rec.t, rec.closing_time, reset);
    }

    tracing::debug!(
        groups = schedule.groups.len(),
        openings = schedule.times.len(),
        "door schedule loaded"
    );
    Ok(schedule)
}
