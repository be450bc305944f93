//! Per-target distance fields.

use std::sync::OnceLock;

use nav_core::{Point, SegmentUid};

use crate::fmm;
use crate::grid::RectGrid;
use crate::raster::Raster;

/// Distance from every grid point of one room to one target segment.
///
/// Immutable after construction.  The direction field is derived on first
/// request and cached; `OnceLock` keeps the type `Sync` so fields can be
/// shared across route-query workers.
#[derive(Debug)]
pub struct DistanceField {
    target:    SegmentUid,
    grid:      RectGrid,
    cost:      Vec<f64>,
    direction: OnceLock<Vec<Point>>,
}

impl DistanceField {
    /// March from the target's door cells over the raster's walkable cells.
    /// A target with no cells in `raster` yields an all-∞ field.
    pub fn compute(raster: &Raster, target: SegmentUid) -> Self {
        let cost = fmm::march(
            &raster.grid,
            |k| raster.is_walkable(k),
            raster.speed(),
            raster.door_keys(target),
        );
        Self { target, grid: raster.grid.clone(), cost, direction: OnceLock::new() }
    }

    #[inline]
    pub fn target(&self) -> SegmentUid {
        self.target
    }

    pub fn grid(&self) -> &RectGrid {
        &self.grid
    }

    /// Raw per-key costs (∞ for unreachable keys).
    pub fn costs(&self) -> &[f64] {
        &self.cost
    }

    /// Cost at the grid point nearest `p`.
    ///
    /// If that point is a wall or outside the room, the smallest finite cost
    /// among its 4-neighbours is used instead, so queries at door centres or
    /// right against a wall still resolve.  ∞ if nothing nearby is reachable.
    pub fn cost_at(&self, p: Point) -> f64 {
        let Some(key) = self.grid.key_at(p) else {
            return f64::INFINITY;
        };
        let c = self.cost[key];
        if c.is_finite() {
            return c;
        }
        self.grid
            .neighbours(key)
            .map(|k| self.cost[k])
            .fold(f64::INFINITY, f64::min)
    }

    /// Unit direction of steepest descent at the grid point nearest `p`.
    pub fn direction_at(&self, p: Point) -> Point {
        let dirs = self.direction.get_or_init(|| fmm::gradient_directions(&self.grid, &self.cost));
        self.grid.key_at(p).map_or(Point::ZERO, |k| dirs[k])
    }
}
