//! Read-only crowd state handed to routers.

use rustc_hash::FxHashMap;

use nav_agent::Pedestrian;
use nav_core::{Point, RoomId, SubRoomId};

/// The simulated time and every pedestrian, indexed by location.
///
/// Built once per step; congestion-aware routers read neighbours through it
/// instead of scanning the whole crowd.
#[derive(Debug)]
pub struct RouteContext<'a> {
    pub time:   f64,
    crowd:      &'a [Pedestrian],
    by_subroom: FxHashMap<SubRoomId, Vec<usize>>,
    by_room:    FxHashMap<RoomId, Vec<usize>>,
}

impl<'a> RouteContext<'a> {
    pub fn new(time: f64, crowd: &'a [Pedestrian]) -> Self {
        let mut by_subroom: FxHashMap<SubRoomId, Vec<usize>> = FxHashMap::default();
        let mut by_room: FxHashMap<RoomId, Vec<usize>> = FxHashMap::default();
        for (i, p) in crowd.iter().enumerate() {
            by_subroom.entry(p.subroom).or_default().push(i);
            by_room.entry(p.room).or_default().push(i);
        }
        Self { time, crowd, by_subroom, by_room }
    }

    /// A context with no other pedestrians.
    pub fn empty(time: f64) -> Self {
        Self::new(time, &[])
    }

    pub fn crowd(&self) -> &'a [Pedestrian] {
        self.crowd
    }

    pub fn in_subroom(&self, sub: SubRoomId) -> impl Iterator<Item = &'a Pedestrian> + '_ {
        let crowd = self.crowd;
        self.by_subroom
            .get(&sub)
            .into_iter()
            .flatten()
            .map(move |&i| &crowd[i])
    }

    pub fn in_room(&self, room: RoomId) -> impl Iterator<Item = &'a Pedestrian> + '_ {
        let crowd = self.crowd;
        self.by_room
            .get(&room)
            .into_iter()
            .flatten()
            .map(move |&i| &crowd[i])
    }

    /// Pedestrians of `room` within `radius` of `p`.
    pub fn near(&self, room: RoomId, p: Point, radius: f64) -> impl Iterator<Item = &'a Pedestrian> + '_ {
        self.in_room(room).filter(move |q| q.pos.distance(p) <= radius)
    }
}
