//! Frozen view of a building's navigable structure.
//!
//! Routers capture this at `init` so their answers depend only on the door
//! configuration they were built for, not on later state changes.

use rustc_hash::FxHashMap;

use nav_agent::Pedestrian;
use nav_building::Building;
use nav_core::{GoalId, Line, Point, RoomId, SegmentId, SegmentUid, SubRoomId};

use crate::{RouterError, RouterResult};

#[derive(Clone, Debug)]
pub struct SegmentInfo {
    pub uid:        SegmentUid,
    pub id:         SegmentId,
    pub centre:     Point,
    pub width:      f64,
    pub subroom1:   SubRoomId,
    pub subroom2:   Option<SubRoomId>,
    pub room1:      RoomId,
    pub room2:      Option<RoomId>,
    pub transition: bool,
    pub exit:       bool,
    pub routable:   bool,
}

impl SegmentInfo {
    pub fn borders(&self, sub: SubRoomId) -> bool {
        self.subroom1 == sub || self.subroom2 == Some(sub)
    }

    pub fn touches_room(&self, room: RoomId) -> bool {
        self.room1 == room || self.room2 == Some(room)
    }
}

#[derive(Clone, Debug, Default)]
struct SubRoomView {
    barriers: Vec<Line>,
    /// Routable segments bordering the subroom, ascending.
    segments: Vec<SegmentUid>,
}

#[derive(Clone, Debug)]
pub struct Topology {
    segments: Vec<SegmentInfo>,
    subrooms: FxHashMap<SubRoomId, SubRoomView>,
    rooms:    FxHashMap<RoomId, Vec<SegmentUid>>,
}

impl Topology {
    pub fn capture(building: &Building) -> Self {
        let segments: Vec<SegmentInfo> = building
            .segments()
            .iter()
            .map(|s| SegmentInfo {
                uid:        s.uid,
                id:         s.id,
                centre:     s.centre(),
                width:      s.width(),
                subroom1:   s.subroom1,
                subroom2:   s.subroom2,
                room1:      s.room1,
                room2:      s.room2,
                transition: s.is_transition(),
                exit:       s.is_exit(),
                routable:   s.is_routable(),
            })
            .collect();

        let subrooms = building
            .subrooms()
            .iter()
            .map(|sub| {
                let view = SubRoomView {
                    barriers: sub.barriers().collect(),
                    segments: sub
                        .segments
                        .iter()
                        .copied()
                        .filter(|&u| segments.get(u.index()).is_some_and(|s| s.routable))
                        .collect(),
                };
                (sub.id, view)
            })
            .collect();

        let rooms = building
            .rooms()
            .iter()
            .map(|room| {
                let segs = building
                    .segments_of_room(room.id)
                    .into_iter()
                    .filter(|u| segments.get(u.index()).is_some_and(|s| s.routable))
                    .collect();
                (room.id, segs)
            })
            .collect();

        Self { segments, subrooms, rooms }
    }

    pub fn segments(&self) -> &[SegmentInfo] {
        &self.segments
    }

    pub fn segment(&self, uid: SegmentUid) -> Option<&SegmentInfo> {
        self.segments.get(uid.index())
    }

    /// Routable segments bordering `sub`, ascending.
    pub fn subroom_segments(&self, sub: SubRoomId) -> &[SegmentUid] {
        self.subrooms.get(&sub).map_or(&[], |v| v.segments.as_slice())
    }

    /// Routable segments touching `room`, ascending.
    pub fn room_segments(&self, room: RoomId) -> &[SegmentUid] {
        self.rooms.get(&room).map_or(&[], Vec::as_slice)
    }

    /// Line of sight inside `sub` between two points.
    pub fn is_visible(&self, sub: SubRoomId, a: Point, b: Point) -> bool {
        let Some(view) = self.subrooms.get(&sub) else { return false };
        let sight = Line::new(a, b);
        !view.barriers.iter().any(|w| sight.crosses(w))
    }

    pub fn share_subroom(&self, a: SegmentUid, b: SegmentUid) -> bool {
        match (self.segment(a), self.segment(b)) {
            (Some(sa), Some(sb)) => {
                sb.borders(sa.subroom1) || sa.subroom2.is_some_and(|s| sb.borders(s))
            }
            _ => false,
        }
    }

    pub fn centre(&self, uid: SegmentUid) -> Option<Point> {
        self.segment(uid).map(|s| s.centre)
    }

    pub fn is_routable(&self, uid: SegmentUid) -> bool {
        self.segment(uid).is_some_and(|s| s.routable)
    }
}

// ── Finals ────────────────────────────────────────────────────────────────────

/// Where pedestrians may end their route: every routable exit, or for a
/// pedestrian with a goal, the exit nearest that goal.
#[derive(Clone, Debug, Default)]
pub struct Finals {
    exits:     Vec<SegmentUid>,
    goal_exit: FxHashMap<GoalId, SegmentUid>,
}

impl Finals {
    /// Fails with [`RouterError::NoExit`] if the building has no exit at all,
    /// and with [`RouterError::GoalUnreachable`] if specific goals are
    /// required and one of them has no routable exit.
    pub fn resolve(
        building:           &Building,
        topo:               &Topology,
        has_specific_goals: bool,
    ) -> RouterResult<Self> {
        if building.exits().next().is_none() {
            return Err(RouterError::NoExit);
        }
        let exits: Vec<SegmentUid> =
            topo.segments().iter().filter(|s| s.exit && s.routable).map(|s| s.uid).collect();

        if has_specific_goals && building.goals().is_empty() {
            return Err(RouterError::Config(
                "specific goals requested but the building defines none".into(),
            ));
        }

        let mut goal_exit = FxHashMap::default();
        for goal in building.goals() {
            let c = goal.centre();
            let nearest = exits.iter().copied().min_by(|&a, &b| {
                let da = topo.centre(a).map_or(f64::INFINITY, |p| p.distance(c));
                let db = topo.centre(b).map_or(f64::INFINITY, |p| p.distance(c));
                da.total_cmp(&db).then(a.cmp(&b))
            });
            match nearest {
                Some(exit) => {
                    goal_exit.insert(goal.id, exit);
                }
                None if has_specific_goals => return Err(RouterError::GoalUnreachable(goal.id)),
                None => tracing::warn!(goal = goal.id.0, "goal has no open exit"),
            }
        }

        Ok(Self { exits, goal_exit })
    }

    pub fn exits(&self) -> &[SegmentUid] {
        &self.exits
    }

    pub fn exit_for_goal(&self, goal: GoalId) -> Option<SegmentUid> {
        self.goal_exit.get(&goal).copied()
    }

    /// Valid final segments for `ped`; empty if its goal maps nowhere.
    pub fn for_ped(&self, ped: &Pedestrian) -> &[SegmentUid] {
        match ped.final_goal {
            None => &self.exits,
            Some(g) => self.goal_exit.get(&g).map_or(&[], std::slice::from_ref),
        }
    }
}
