//! Pedestrian navigation state.
//!
//! The routing subsystem writes `exit`, `last_route_time` and `engine`; the
//! operational model (external) reads `exit` and updates `pos`, `room` and
//! `subroom` as the pedestrian moves.

use nav_building::Fingerprint;
use nav_core::{GoalId, PedId, Point, RoomId, RouterId, SegmentUid, SubRoomId};

use crate::Knowledge;

/// Default desired walking speed in m/s.
pub const DEFAULT_V0: f64 = 1.34;

#[derive(Clone, Debug)]
pub struct Pedestrian {
    pub id:      PedId,
    pub pos:     Point,
    /// Desired (free-flow) speed in m/s.
    pub v0:      f64,
    pub room:    RoomId,
    pub subroom: SubRoomId,

    /// Router this pedestrian is dispatched to.  Preserved across engine
    /// switches.
    pub router:     RouterId,
    /// `None` routes to the nearest reachable exit.
    pub final_goal: Option<GoalId>,

    /// Current target segment.  `None` means "no route": hold position.
    pub exit:            Option<SegmentUid>,
    /// Simulated time the current target was chosen.
    pub last_route_time: f64,
    /// Door configuration of the engine this pedestrian currently routes in.
    pub engine:          Fingerprint,

    /// In `[0, 1]`; higher values make hearsay less likely to be accepted.
    pub risk_tolerance: f64,
    pub knowledge:      Knowledge,
}

impl Pedestrian {
    pub fn new(id: PedId, pos: Point, room: RoomId, subroom: SubRoomId) -> Self {
        Self {
            id,
            pos,
            v0: DEFAULT_V0,
            room,
            subroom,
            router: RouterId(0),
            final_goal: None,
            exit: None,
            last_route_time: f64::NEG_INFINITY,
            engine: Fingerprint::default(),
            risk_tolerance: 0.0,
            knowledge: Knowledge::default(),
        }
    }

    pub fn with_router(mut self, router: RouterId) -> Self {
        self.router = router;
        self
    }

    pub fn with_goal(mut self, goal: GoalId) -> Self {
        self.final_goal = Some(goal);
        self
    }

    pub fn with_v0(mut self, v0: f64) -> Self {
        self.v0 = v0;
        self
    }

    #[inline]
    pub fn has_route(&self) -> bool {
        self.exit.is_some()
    }

    /// Forget the current target; the next routing pass recomputes it.
    pub fn clear_route(&mut self) {
        self.exit = None;
        self.last_route_time = f64::NEG_INFINITY;
    }

    /// Record a routing decision made at `time`.  The decision time only
    /// moves when the target actually changes, so "time on this target"
    /// survives repeated identical decisions.
    pub fn set_route(&mut self, exit: Option<SegmentUid>, time: f64) {
        if exit.is_some() && exit != self.exit {
            self.last_route_time = time;
        }
        self.exit = exit;
    }

    /// Seconds since the current target was chosen (∞ if none was).
    #[inline]
    pub fn since_last_route(&self, now: f64) -> f64 {
        now - self.last_route_time
    }
}
