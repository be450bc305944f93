//! Room rasterisation: which grid points are walkable, walls, or doors.
//!
//! Passes run in a fixed order, later passes overriding earlier ones:
//!
//! 1. points inside a subroom polygon (and outside every obstacle) → `Inside`
//! 2. wall lines, obstacle edges and `Closed` segments → `Wall`
//! 3. routable segments touching the room → `Door(uid)`
//!
//! Everything else is `Outside`.  `Inside` and `Door` cells are walkable.

use rustc_hash::FxHashMap;

use nav_building::Building;
use nav_core::geo::bounding_box;
use nav_core::{Line, Point, RoomId, SegmentUid};

use crate::fmm;
use crate::grid::RectGrid;
use crate::{FieldError, FieldResult, FloorFieldConfig};

/// Lowest speed factor wall avoidance may apply, keeping cells next to a
/// wall reachable.
pub const MIN_WALL_SPEED: f64 = 0.1;

/// Upper bound on grid size per room.
pub const MAX_CELLS: usize = 64 * 1024 * 1024;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Cell {
    Outside,
    Wall,
    Inside,
    Door(SegmentUid),
}

impl Cell {
    #[inline]
    pub fn is_walkable(self) -> bool {
        matches!(self, Cell::Inside | Cell::Door(_))
    }
}

/// The rasterised walkable domain of one room under one door configuration.
#[derive(Clone, Debug)]
pub struct Raster {
    pub room:   RoomId,
    pub grid:   RectGrid,
    cells:      Vec<Cell>,
    speed:      Vec<f64>,
    door_cells: FxHashMap<SegmentUid, Vec<usize>>,
}

impl Raster {
    pub fn for_room(building: &Building, room: RoomId, cfg: &FloorFieldConfig) -> FieldResult<Self> {
        if cfg.delta_h.is_nan() || cfg.delta_h <= 0.0 {
            return Err(FieldError::InvalidResolution(cfg.delta_h));
        }
        let r = building.room(room).ok_or(FieldError::UnknownRoom(room))?;
        let subs: Vec<_> = r.subrooms.iter().filter_map(|&s| building.subroom(s)).collect();
        if subs.is_empty() {
            return Err(FieldError::EmptyRoom(room));
        }
        let segs = building.segments_of_room(room);

        // ── Grid over the padded bounding box ─────────────────────────────
        let pts = subs
            .iter()
            .flat_map(|s| s.polygon.iter().copied().chain(s.walls.iter().flat_map(|w| [w.p1, w.p2])))
            .chain(segs.iter().filter_map(|&u| building.segment(u)).flat_map(|s| [s.line.p1, s.line.p2]));
        let (lo, hi) = bounding_box(pts).ok_or(FieldError::EmptyRoom(room))?;
        let pad = Point::new(cfg.padding, cfg.padding);
        let grid = RectGrid::covering(lo - pad, hi + pad, cfg.delta_h);
        if grid.len() > MAX_CELLS {
            return Err(FieldError::GridTooLarge { cells: grid.len(), limit: MAX_CELLS });
        }

        // ── Pass 1: inside ────────────────────────────────────────────────
        let mut cells: Vec<Cell> = (0..grid.len())
            .map(|k| {
                let p = grid.point(k);
                if subs.iter().any(|s| s.contains(p)) { Cell::Inside } else { Cell::Outside }
            })
            .collect();

        // ── Pass 2: walls ─────────────────────────────────────────────────
        for sub in &subs {
            for wall in sub.barriers() {
                for k in line_keys(&grid, &wall) {
                    cells[k] = Cell::Wall;
                }
            }
        }
        for seg in segs.iter().filter_map(|&u| building.segment(u)).filter(|s| s.is_closed()) {
            for k in line_keys(&grid, &seg.line) {
                cells[k] = Cell::Wall;
            }
        }

        // ── Pass 3: doors ─────────────────────────────────────────────────
        let mut door_cells: FxHashMap<SegmentUid, Vec<usize>> = FxHashMap::default();
        for seg in segs.iter().filter_map(|&u| building.segment(u)).filter(|s| s.is_routable()) {
            let keys = line_keys(&grid, &seg.line);
            for &k in &keys {
                cells[k] = Cell::Door(seg.uid);
            }
            door_cells.insert(seg.uid, keys);
        }
        // A later door may have overwritten shared end cells of an earlier one.
        for (uid, keys) in door_cells.iter_mut() {
            keys.retain(|&k| cells[k] == Cell::Door(*uid));
        }

        let mut raster = Raster { room, grid, cells, speed: Vec::new(), door_cells };
        raster.speed = raster.speed_field(cfg);
        Ok(raster)
    }

    #[inline]
    pub fn cell(&self, key: usize) -> Cell {
        self.cells[key]
    }

    #[inline]
    pub fn is_walkable(&self, key: usize) -> bool {
        self.cells[key].is_walkable()
    }

    pub fn speed(&self) -> &[f64] {
        &self.speed
    }

    /// Grid keys rasterised for `uid`; empty for segments that are closed or
    /// do not touch this room.
    pub fn door_keys(&self, uid: SegmentUid) -> &[usize] {
        self.door_cells.get(&uid).map_or(&[], Vec::as_slice)
    }

    /// Routable segments present in this raster, ascending.
    pub fn doors(&self) -> Vec<SegmentUid> {
        let mut v: Vec<SegmentUid> = self.door_cells.keys().copied().collect();
        v.sort_unstable();
        v
    }

    pub fn count(&self, pred: impl Fn(Cell) -> bool) -> usize {
        self.cells.iter().filter(|&&c| pred(c)).count()
    }

    fn speed_field(&self, cfg: &FloorFieldConfig) -> Vec<f64> {
        let mut speed = vec![1.0; self.grid.len()];
        if !cfg.use_wall_avoidance || cfg.wall_avoid_distance <= 0.0 {
            return speed;
        }
        let walls: Vec<usize> = (0..self.grid.len()).filter(|&k| self.cells[k] == Cell::Wall).collect();
        let dist = fmm::march(&self.grid, |k| self.is_walkable(k), &speed, &walls);
        for (s, d) in speed.iter_mut().zip(dist) {
            if d.is_finite() {
                *s = (d / cfg.wall_avoid_distance).clamp(MIN_WALL_SPEED, 1.0);
            }
        }
        speed
    }
}

/// Grid keys along `line`, sampled at a quarter of the spacing so
/// consecutive keys are 8-adjacent.  Ascending and deduplicated.
fn line_keys(grid: &RectGrid, line: &Line) -> Vec<usize> {
    let steps = (line.length() / (grid.h * 0.25)).ceil().max(1.0) as usize;
    let mut keys: Vec<usize> = (0..=steps)
        .filter_map(|s| grid.key_at(line.at(s as f64 / steps as f64)))
        .collect();
    keys.sort_unstable();
    keys.dedup();
    keys
}
