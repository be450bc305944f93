//! All distance fields of one room.

use std::collections::BTreeMap;

use nav_building::Building;
use nav_core::{Point, RoomId, SegmentUid};

use crate::field::DistanceField;
use crate::raster::Raster;
use crate::{FieldResult, FloorFieldConfig};

/// The raster of one room plus one [`DistanceField`] per routable segment
/// touching it.
#[derive(Debug)]
pub struct RoomFields {
    raster:  Raster,
    fields:  BTreeMap<SegmentUid, DistanceField>,
    centres: BTreeMap<SegmentUid, Point>,
}

impl RoomFields {
    /// Rasterise `room` under the building's current door states and march
    /// one field per routable segment.  With the `parallel` feature the
    /// fields are computed on Rayon's pool; each is independent, so the
    /// result does not depend on thread count.
    pub fn build(building: &Building, room: RoomId, cfg: &FloorFieldConfig) -> FieldResult<Self> {
        let raster = Raster::for_room(building, room, cfg)?;
        let targets = raster.doors();

        #[cfg(not(feature = "parallel"))]
        let computed: Vec<DistanceField> =
            targets.iter().map(|&t| DistanceField::compute(&raster, t)).collect();

        #[cfg(feature = "parallel")]
        let computed: Vec<DistanceField> = {
            use rayon::prelude::*;
            targets.par_iter().map(|&t| DistanceField::compute(&raster, t)).collect()
        };

        let centres = targets
            .iter()
            .filter_map(|&t| building.segment(t).map(|s| (t, s.centre())))
            .collect();
        let fields = computed.into_iter().map(|f| (f.target(), f)).collect();

        tracing::debug!(
            room = room.0,
            targets = targets.len(),
            cells = raster.grid.len(),
            "floor fields built"
        );
        Ok(Self { raster, fields, centres })
    }

    pub fn room(&self) -> RoomId {
        self.raster.room
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn field(&self, target: SegmentUid) -> Option<&DistanceField> {
        self.fields.get(&target)
    }

    /// Segments with a field in this room, ascending.
    pub fn targets(&self) -> impl Iterator<Item = SegmentUid> + '_ {
        self.fields.keys().copied()
    }

    /// Walking distance from `p` to `target`; ∞ if unknown or unreachable.
    pub fn cost_to(&self, target: SegmentUid, p: Point) -> f64 {
        self.field(target).map_or(f64::INFINITY, |f| f.cost_at(p))
    }

    /// Walking distance between the centres of two segments of this room.
    pub fn distance_between(&self, from: SegmentUid, to: SegmentUid) -> f64 {
        match self.centres.get(&to) {
            Some(&c) => self.cost_to(from, c),
            None => f64::INFINITY,
        }
    }
}
