//! Navigable segments and the per-door state machine.
//!
//! A segment is a line pedestrians may cross: a **crossing** between two
//! subrooms of the same room, a **transition** between rooms (or to the
//! outside), or an **hline** inside one subroom.  Doors change state only
//! through the methods here; each returns whether anything changed so the
//! caller can decide whether the door configuration moved.
//!
//! A door with an `outflow_rate` regulates itself: when the measured flow
//! exceeds the rate it becomes TempClosed for just long enough that the
//! passages counted fit the rate, then reopens on its own.

use nav_core::{Line, Point, RoomId, SegmentId, SegmentUid, SubRoomId, TIME_EPS};

// ── DoorState ─────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DoorState {
    #[default]
    Open,
    Closed,
    /// Temporarily blocked.  Still part of the routable configuration:
    /// pedestrians queue and wait rather than replan.  Reopens on its own
    /// when closed by flow regulation.
    TempClosed,
}

impl DoorState {
    /// `true` unless the door is permanently closed.
    #[inline]
    pub fn is_routable(self) -> bool {
        self != DoorState::Closed
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SegmentKind {
    Crossing,
    Transition,
    Hline,
}

// ── NavSegment ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct NavSegment {
    pub id:   SegmentId,
    pub uid:  SegmentUid,
    pub kind: SegmentKind,
    pub line: Line,

    /// First bordering subroom (always set).
    pub subroom1: SubRoomId,
    /// Second bordering subroom; `None` for hlines and for transitions that
    /// face the outside.
    pub subroom2: Option<SubRoomId>,
    pub room1: RoomId,
    pub room2: Option<RoomId>,

    state: DoorState,
    /// Set when the last close came from `max_usage` rather than an event.
    closed_by_usage: bool,
    /// Set when the current TempClosed came from flow regulation.
    closed_by_flow: bool,
    /// Seconds left before a flow-regulated door reopens.
    closing_time: f64,
    /// Passages since the last flow measurement.
    partial_usage: u32,
    last_flow_measurement: f64,

    /// Total passages since the start of the run.
    pub usage: u32,
    /// Passages since the last usage reset.
    pub temp_usage: u32,
    /// Close the door once `temp_usage` reaches this.
    pub max_usage: Option<u32>,
    /// Maximum flow in pedestrians per second.
    pub outflow_rate: Option<f64>,
}

impl NavSegment {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id:       SegmentId,
        uid:      SegmentUid,
        kind:     SegmentKind,
        line:     Line,
        subroom1: SubRoomId,
        subroom2: Option<SubRoomId>,
        room1:    RoomId,
        room2:    Option<RoomId>,
    ) -> Self {
        Self {
            id,
            uid,
            kind,
            line,
            subroom1,
            subroom2,
            room1,
            room2,
            state: DoorState::Open,
            closed_by_usage: false,
            closed_by_flow: false,
            closing_time: 0.0,
            partial_usage: 0,
            last_flow_measurement: 0.0,
            usage: 0,
            temp_usage: 0,
            max_usage: None,
            outflow_rate: None,
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn state(&self) -> DoorState {
        self.state
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.state == DoorState::Open
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.state == DoorState::Closed
    }

    #[inline]
    pub fn is_routable(&self) -> bool {
        self.state.is_routable()
    }

    #[inline]
    pub fn centre(&self) -> Point {
        self.line.centre()
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.line.length()
    }

    /// A transition with one side facing the outside.
    #[inline]
    pub fn is_exit(&self) -> bool {
        self.kind == SegmentKind::Transition && self.subroom2.is_none()
    }

    #[inline]
    pub fn is_transition(&self) -> bool {
        self.kind == SegmentKind::Transition
    }

    #[inline]
    pub fn borders(&self, sub: SubRoomId) -> bool {
        self.subroom1 == sub || self.subroom2 == Some(sub)
    }

    #[inline]
    pub fn touches_room(&self, room: RoomId) -> bool {
        self.room1 == room || self.room2 == Some(room)
    }

    #[inline]
    pub fn closed_by_usage(&self) -> bool {
        self.closed_by_usage
    }

    #[inline]
    pub fn closed_by_flow(&self) -> bool {
        self.closed_by_flow
    }

    /// Seconds until a flow-regulated door reopens; zero otherwise.
    #[inline]
    pub fn closing_time(&self) -> f64 {
        self.closing_time
    }

    // ── State machine ─────────────────────────────────────────────────────

    pub fn open(&mut self) -> bool {
        self.clear_causes();
        self.set_state(DoorState::Open)
    }

    pub fn close(&mut self) -> bool {
        self.clear_causes();
        self.set_state(DoorState::Closed)
    }

    pub fn temp_close(&mut self) -> bool {
        self.clear_causes();
        self.set_state(DoorState::TempClosed)
    }

    /// Zero `temp_usage` and reopen a door that is TempClosed or was closed
    /// by reaching `max_usage`.  A door closed by an explicit CLOSE stays
    /// closed, and a flow-regulated door keeps its own countdown.  Returns
    /// whether the door state changed.
    pub fn reset_usage(&mut self) -> bool {
        self.temp_usage = 0;
        let reopen = match self.state {
            DoorState::Open       => false,
            DoorState::Closed     => self.closed_by_usage,
            DoorState::TempClosed => !self.closed_by_flow,
        };
        reopen && self.open()
    }

    /// Count one pedestrian passage.  Returns `true` if this passage pushed
    /// the door over `max_usage` and closed it.
    pub fn record_passage(&mut self) -> bool {
        self.usage += 1;
        self.temp_usage += 1;
        self.partial_usage += 1;
        match self.max_usage {
            Some(max) if self.temp_usage >= max && !self.is_closed() => {
                self.clear_causes();
                self.state = DoorState::Closed;
                self.closed_by_usage = true;
                true
            }
            _ => false,
        }
    }

    /// Advance flow regulation by one step of `dt` seconds ending at `time`.
    ///
    /// A flow-regulated TempClosed door counts down and reopens once its
    /// closing time has elapsed, unless `max_usage` is exhausted.  An open
    /// door with passages since the last measurement compares their flow
    /// with `outflow_rate` and, if over it, becomes TempClosed for
    /// `passages / outflow_rate − elapsed` seconds.  Returns whether the
    /// state changed.
    pub fn regulate_flow(&mut self, time: f64, dt: f64) -> bool {
        let before = self.state;
        if self.state == DoorState::TempClosed && self.closed_by_flow {
            self.closing_time -= dt;
            let usage_left = self.max_usage.is_none_or(|max| self.temp_usage < max);
            if self.closing_time <= TIME_EPS && usage_left {
                self.open();
            }
        }

        if let Some(rate) = self.outflow_rate {
            if self.partial_usage > 0 && self.is_open() {
                let passages = f64::from(self.partial_usage);
                let elapsed = time - self.last_flow_measurement;
                self.partial_usage = 0;
                if elapsed <= 0.0 || passages / elapsed > rate {
                    self.closing_time = passages / rate - elapsed.max(0.0);
                    self.state = DoorState::TempClosed;
                    self.closed_by_flow = true;
                }
                self.last_flow_measurement = time + self.closing_time;
            }
        }
        self.state != before
    }

    fn clear_causes(&mut self) {
        self.closed_by_usage = false;
        self.closed_by_flow = false;
        self.closing_time = 0.0;
    }

    fn set_state(&mut self, state: DoorState) -> bool {
        let changed = self.state != state;
        self.state = state;
        changed
    }
}
