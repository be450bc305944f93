//! Incremental construction of a [`Building`].

use rstar::RTree;
use rustc_hash::FxHashMap;

use nav_core::geo::polygon_edges;
use nav_core::{GoalId, Line, Point, RoomId, SegmentId, SegmentUid, SubRoomId, GEO_EPS};

use crate::building::SegmentEntry;
use crate::{Building, BuildingError, BuildingResult, DoorState, Goal, NavSegment, Room, SegmentKind, SubRoom};

/// Construct a [`Building`] incrementally, then call [`build`](Self::build).
///
/// Subroom boundary walls are derived from the polygon: every polygon edge
/// becomes a wall except where a segment bordering that subroom lies on it.
/// Interior walls and obstacles are added explicitly.
///
/// # Example
///
/// ```
/// use nav_core::{Line, Point, SegmentId};
/// use nav_building::BuildingBuilder;
///
/// let mut b = BuildingBuilder::new();
/// let room = b.add_room("hall");
/// let sub = b.add_subroom(room, vec![
///     Point::new(0.0, 0.0), Point::new(10.0, 0.0),
///     Point::new(10.0, 5.0), Point::new(0.0, 5.0),
/// ]);
/// b.add_transition(SegmentId(1), Line::new(Point::new(10.0, 2.0), Point::new(10.0, 3.0)), sub, None);
/// let building = b.build().unwrap();
/// assert_eq!(building.exits().count(), 1);
/// // Right edge split around the door: 3 full edges + 2 pieces.
/// assert_eq!(building.subrooms()[0].walls.len(), 5);
/// ```
#[derive(Default)]
pub struct BuildingBuilder {
    rooms:    Vec<Room>,
    subrooms: Vec<SubRoom>,
    raw:      Vec<RawSegment>,
    goals:    Vec<Goal>,
}

struct RawSegment {
    id:        SegmentId,
    kind:      SegmentKind,
    line:      Line,
    a:         SubRoomId,
    b:         Option<SubRoomId>,
    state:     DoorState,
    max_usage: Option<u32>,
    outflow:   Option<f64>,
}

impl BuildingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_room(&mut self, caption: impl Into<String>) -> RoomId {
        let id = RoomId(self.rooms.len() as u32);
        self.rooms.push(Room { id, caption: caption.into(), subrooms: Vec::new() });
        id
    }

    /// Add a subroom with the given outer boundary.  An unknown `room` is
    /// reported by `build`.
    pub fn add_subroom(&mut self, room: RoomId, polygon: Vec<Point>) -> SubRoomId {
        let id = SubRoomId(self.subrooms.len() as u32);
        if let Some(r) = self.rooms.get_mut(room.index()) {
            r.subrooms.push(id);
        }
        self.subrooms.push(SubRoom {
            id,
            room,
            polygon,
            walls: Vec::new(),
            obstacles: Vec::new(),
            segments: Vec::new(),
        });
        id
    }

    /// Add an interior wall line to `sub`.
    pub fn add_wall(&mut self, sub: SubRoomId, wall: Line) -> BuildingResult<()> {
        self.subroom_mut(sub)?.walls.push(wall);
        Ok(())
    }

    pub fn add_obstacle(&mut self, sub: SubRoomId, polygon: Vec<Point>) -> BuildingResult<()> {
        self.subroom_mut(sub)?.obstacles.push(polygon);
        Ok(())
    }

    /// A door between two subrooms of the same room.
    pub fn add_crossing(&mut self, id: SegmentId, line: Line, a: SubRoomId, b: SubRoomId) {
        self.push_raw(id, SegmentKind::Crossing, line, a, Some(b));
    }

    /// A door between rooms; `b = None` makes it an exit to the outside.
    pub fn add_transition(&mut self, id: SegmentId, line: Line, a: SubRoomId, b: Option<SubRoomId>) {
        self.push_raw(id, SegmentKind::Transition, line, a, b);
    }

    /// A virtual line inside one subroom.
    pub fn add_hline(&mut self, id: SegmentId, line: Line, sub: SubRoomId) {
        self.push_raw(id, SegmentKind::Hline, line, sub, None);
    }

    /// Initial door state (default `Open`).
    pub fn set_door_state(&mut self, id: SegmentId, state: DoorState) -> BuildingResult<()> {
        self.raw_mut(id)?.state = state;
        Ok(())
    }

    /// Close the door automatically after `max` passages.
    pub fn set_max_usage(&mut self, id: SegmentId, max: u32) -> BuildingResult<()> {
        self.raw_mut(id)?.max_usage = Some(max);
        Ok(())
    }

    /// Regulate the door to at most `rate` pedestrians per second.
    pub fn set_outflow_rate(&mut self, id: SegmentId, rate: f64) -> BuildingResult<()> {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(BuildingError::InvalidOutflowRate { id, rate });
        }
        self.raw_mut(id)?.outflow = Some(rate);
        Ok(())
    }

    pub fn add_goal(&mut self, id: GoalId, caption: impl Into<String>, polygon: Vec<Point>) {
        self.goals.push(Goal { id, caption: caption.into(), polygon });
    }

    /// Validate references, assign `SegmentUid`s in insertion order, derive
    /// boundary walls and bulk-load the segment R-tree.
    pub fn build(self) -> BuildingResult<Building> {
        let BuildingBuilder { rooms, mut subrooms, raw, goals } = self;

        for sub in &subrooms {
            if rooms.get(sub.room.index()).is_none() {
                return Err(BuildingError::UnknownRoom(sub.room));
            }
            if sub.polygon.len() < 3 {
                return Err(BuildingError::DegeneratePolygon(sub.id));
            }
        }

        // ── Segments ──────────────────────────────────────────────────────
        let room_of = |s: SubRoomId| -> BuildingResult<RoomId> {
            subrooms.get(s.index()).map(|r| r.room).ok_or(BuildingError::UnknownSubRoom(s))
        };

        let mut by_id = FxHashMap::default();
        let mut segments = Vec::with_capacity(raw.len());
        for (i, r) in raw.into_iter().enumerate() {
            let uid = SegmentUid(i as u32);
            if by_id.insert(r.id, uid).is_some() {
                return Err(BuildingError::DuplicateSegment(r.id));
            }
            let room1 = room_of(r.a)?;
            let room2 = r.b.map(room_of).transpose()?;
            if r.kind == SegmentKind::Crossing && room2 != Some(room1) {
                return Err(BuildingError::CrossingSpansRooms {
                    id: r.id,
                    a:  r.a,
                    b:  r.b.unwrap_or(SubRoomId::INVALID),
                });
            }
            let mut seg = NavSegment::new(r.id, uid, r.kind, r.line, r.a, r.b, room1, room2);
            seg.max_usage = r.max_usage;
            seg.outflow_rate = r.outflow;
            match r.state {
                DoorState::Open       => {}
                DoorState::Closed     => { seg.close(); }
                DoorState::TempClosed => { seg.temp_close(); }
            }
            segments.push(seg);
        }

        for seg in &segments {
            subrooms[seg.subroom1.index()].segments.push(seg.uid);
            if let Some(b) = seg.subroom2 {
                subrooms[b.index()].segments.push(seg.uid);
            }
        }

        // ── Boundary walls ────────────────────────────────────────────────
        for sub in &mut subrooms {
            sub.segments.sort_unstable();
            sub.segments.dedup();
            let openings: Vec<Line> =
                sub.segments.iter().map(|u| segments[u.index()].line).collect();
            let mut walls: Vec<Line> = polygon_edges(&sub.polygon)
                .flat_map(|edge| subtract_openings(edge, &openings))
                .collect();
            walls.append(&mut sub.walls);
            sub.walls = walls;
        }

        // ── Goals & spatial index ─────────────────────────────────────────
        let goal_idx = goals.iter().enumerate().map(|(i, g)| (g.id, i)).collect();
        let entries: Vec<SegmentEntry> =
            segments.iter().map(|s| SegmentEntry { line: s.line, uid: s.uid }).collect();

        tracing::debug!(
            rooms = rooms.len(),
            subrooms = subrooms.len(),
            segments = segments.len(),
            goals = goals.len(),
            "building assembled"
        );
        Ok(Building {
            rooms,
            subrooms,
            segments,
            goals,
            by_id,
            goal_idx,
            spatial: RTree::bulk_load(entries),
        })
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn push_raw(&mut self, id: SegmentId, kind: SegmentKind, line: Line, a: SubRoomId, b: Option<SubRoomId>) {
        self.raw.push(RawSegment { id, kind, line, a, b, state: DoorState::Open, max_usage: None, outflow: None });
    }

    fn raw_mut(&mut self, id: SegmentId) -> BuildingResult<&mut RawSegment> {
        self.raw.iter_mut().find(|r| r.id == id).ok_or(BuildingError::UnknownSegment(id))
    }

    fn subroom_mut(&mut self, sub: SubRoomId) -> BuildingResult<&mut SubRoom> {
        self.subrooms.get_mut(sub.index()).ok_or(BuildingError::UnknownSubRoom(sub))
    }
}

/// Pieces of `edge` not covered by any collinear opening.
fn subtract_openings(edge: Line, openings: &[Line]) -> Vec<Line> {
    let mut covered: Vec<(f64, f64)> =
        openings.iter().filter_map(|o| edge.collinear_overlap(o)).collect();
    covered.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut pieces = Vec::new();
    let mut t = 0.0;
    for (lo, hi) in covered {
        if lo > t + GEO_EPS {
            pieces.push(Line::new(edge.at(t), edge.at(lo)));
        }
        t = t.max(hi);
    }
    if t < 1.0 - GEO_EPS {
        pieces.push(Line::new(edge.at(t), edge.at(1.0)));
    }
    pieces
}
