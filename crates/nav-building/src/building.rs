//! The building snapshot routers are initialised against.
//!
//! # Ownership
//!
//! `Building` owns every room, subroom, segment and goal in flat arenas.
//! Everything else refers to them by ID: `SegmentUid` and `SubRoomId` index
//! straight into the arenas, `SegmentId` goes through a hash map.  Routers
//! and engines never hold references into a `Building`; they copy what they
//! need at `init` time, which is what lets an old engine be dropped while a
//! new one is built against the mutated snapshot.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over segment lines answers "which doors are within
//! r metres of this point", used by the knowledge layer to decide who can see
//! a closed door.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;

use nav_core::geo::{point_in_polygon, polygon_centre, polygon_edges};
use nav_core::{GoalId, Line, Point, RoomId, SegmentId, SegmentUid, SubRoomId};

use crate::{BuildingError, BuildingResult, DoorState, Fingerprint, NavSegment};

// ── R-tree segment entry ──────────────────────────────────────────────────────

#[derive(Clone)]
pub(crate) struct SegmentEntry {
    pub(crate) line: Line,
    pub(crate) uid:  SegmentUid,
}

impl RTreeObject for SegmentEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([self.line.p1.x, self.line.p1.y], [self.line.p2.x, self.line.p2.y])
    }
}

impl PointDistance for SegmentEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let d = self.line.distance_to(Point::new(point[0], point[1]));
        d * d
    }
}

// ── Rooms, subrooms, goals ────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Room {
    pub id:       RoomId,
    pub caption:  String,
    pub subrooms: Vec<SubRoomId>,
}

#[derive(Clone, Debug)]
pub struct SubRoom {
    pub id:        SubRoomId,
    pub room:      RoomId,
    /// Outer boundary, door openings included.
    pub polygon:   Vec<Point>,
    /// Wall lines: the polygon boundary minus door openings, plus any
    /// interior walls added explicitly.
    pub walls:     Vec<Line>,
    pub obstacles: Vec<Vec<Point>>,
    /// Segments bordering this subroom, ascending.
    pub segments:  Vec<SegmentUid>,
}

impl SubRoom {
    /// Inside the polygon and outside every obstacle.
    pub fn contains(&self, p: Point) -> bool {
        point_in_polygon(p, &self.polygon)
            && !self.obstacles.iter().any(|o| point_in_polygon(p, o))
    }

    /// Every line that blocks sight or movement: walls and obstacle edges.
    pub fn barriers(&self) -> impl Iterator<Item = Line> + '_ {
        self.walls
            .iter()
            .copied()
            .chain(self.obstacles.iter().flat_map(|o| polygon_edges(o)))
    }

    /// `true` if the straight line `a → b` crosses no barrier.
    pub fn is_visible(&self, a: Point, b: Point) -> bool {
        let sight = Line::new(a, b);
        !self.barriers().any(|w| sight.crosses(&w))
    }
}

/// A final destination outside the building.
#[derive(Clone, Debug)]
pub struct Goal {
    pub id:      GoalId,
    pub caption: String,
    pub polygon: Vec<Point>,
}

impl Goal {
    pub fn centre(&self) -> Point {
        polygon_centre(&self.polygon)
    }
}

// ── Building ──────────────────────────────────────────────────────────────────

/// Rooms → subrooms → walls/obstacles, navigable segments with current door
/// state, and final goals.  Build with [`BuildingBuilder`](crate::BuildingBuilder).
pub struct Building {
    pub(crate) rooms:     Vec<Room>,
    pub(crate) subrooms:  Vec<SubRoom>,
    pub(crate) segments:  Vec<NavSegment>,
    pub(crate) goals:     Vec<Goal>,
    pub(crate) by_id:     FxHashMap<SegmentId, SegmentUid>,
    pub(crate) goal_idx:  FxHashMap<GoalId, usize>,
    pub(crate) spatial:   RTree<SegmentEntry>,
}

impl Building {
    // ── Arenas ────────────────────────────────────────────────────────────

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id.index())
    }

    pub fn subrooms(&self) -> &[SubRoom] {
        &self.subrooms
    }

    pub fn subroom(&self, id: SubRoomId) -> Option<&SubRoom> {
        self.subrooms.get(id.index())
    }

    pub fn segments(&self) -> &[NavSegment] {
        &self.segments
    }

    pub fn segment(&self, uid: SegmentUid) -> Option<&NavSegment> {
        self.segments.get(uid.index())
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn goal(&self, id: GoalId) -> Option<&Goal> {
        self.goal_idx.get(&id).map(|&i| &self.goals[i])
    }

    // ── Segment lookup by semantic ID ─────────────────────────────────────

    pub fn uid_of(&self, id: SegmentId) -> Option<SegmentUid> {
        self.by_id.get(&id).copied()
    }

    pub fn segment_by_id(&self, id: SegmentId) -> Option<&NavSegment> {
        self.uid_of(id).map(|uid| &self.segments[uid.index()])
    }

    /// Mutable access for the door state machine.  Geometry fields are
    /// public on `NavSegment` but callers outside the event layer should
    /// treat them as read-only.
    pub fn segment_by_id_mut(&mut self, id: SegmentId) -> BuildingResult<&mut NavSegment> {
        let uid = self.uid_of(id).ok_or(BuildingError::UnknownSegment(id))?;
        Ok(&mut self.segments[uid.index()])
    }

    /// Convenience wrapper over the segment state machine.
    pub fn set_door_state(&mut self, id: SegmentId, state: DoorState) -> BuildingResult<bool> {
        let seg = self.segment_by_id_mut(id)?;
        Ok(match state {
            DoorState::Open       => seg.open(),
            DoorState::Closed     => seg.close(),
            DoorState::TempClosed => seg.temp_close(),
        })
    }

    /// Run one step of flow regulation on every door with an outflow rate
    /// or a pending reopening.  Returns the doors whose state changed.
    pub fn regulate_flow(&mut self, time: f64, dt: f64) -> Vec<SegmentId> {
        self.segments
            .iter_mut()
            .filter(|s| s.outflow_rate.is_some() || s.closed_by_flow())
            .filter_map(|s| s.regulate_flow(time, dt).then_some(s.id))
            .collect()
    }

    // ── Derived views ─────────────────────────────────────────────────────

    /// Transitions facing the outside, ascending by UID.
    pub fn exits(&self) -> impl Iterator<Item = &NavSegment> + '_ {
        self.segments.iter().filter(|s| s.is_exit())
    }

    /// Segments touching any subroom of `room`, ascending by UID.
    pub fn segments_of_room(&self, room: RoomId) -> Vec<SegmentUid> {
        self.segments
            .iter()
            .filter(|s| s.touches_room(room))
            .map(|s| s.uid)
            .collect()
    }

    /// `true` if both segments border at least one common subroom.
    pub fn share_subroom(&self, a: SegmentUid, b: SegmentUid) -> bool {
        match (self.segment(a), self.segment(b)) {
            (Some(sa), Some(sb)) => {
                sb.borders(sa.subroom1) || sa.subroom2.is_some_and(|s| sb.borders(s))
            }
            _ => false,
        }
    }

    /// First subroom (by ID) containing `p`.
    pub fn subroom_at(&self, p: Point) -> Option<SubRoomId> {
        self.subrooms.iter().find(|s| s.contains(p)).map(|s| s.id)
    }

    /// Segments whose line passes within `radius` of `p`, ascending by UID.
    pub fn segments_within(&self, p: Point, radius: f64) -> Vec<SegmentUid> {
        let mut out: Vec<SegmentUid> = self
            .spatial
            .locate_within_distance([p.x, p.y], radius * radius)
            .map(|e| e.uid)
            .collect();
        out.sort_unstable();
        out
    }

    /// Canonical key of the current door configuration.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(self)
    }
}
