//! Unit tests for nav-field.

#[cfg(test)]
mod helpers {
    use nav_building::{Building, BuildingBuilder};
    use nav_core::{Line, Point, RoomId, SegmentId};

    use crate::FloorFieldConfig;

    pub const H: f64 = 0.25;

    pub fn cfg() -> FloorFieldConfig {
        FloorFieldConfig { delta_h: H, ..FloorFieldConfig::default() }
    }

    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
        vec![Point::new(x0, y0), Point::new(x1, y0), Point::new(x1, y1), Point::new(x0, y1)]
    }

    /// Empty 10×5 room with exit 1 on the right wall (x = 10, y ∈ [2, 3])
    /// and door 2 on the left wall (x = 0, y ∈ [2, 3]).  `wall` adds an
    /// interior wall.
    pub fn room_with(wall: Option<Line>) -> (Building, RoomId) {
        let mut b = BuildingBuilder::new();
        let r = b.add_room("hall");
        let s = b.add_subroom(r, rect(0.0, 0.0, 10.0, 5.0));
        b.add_transition(SegmentId(1), Line::new(Point::new(10.0, 2.0), Point::new(10.0, 3.0)), s, None);
        b.add_transition(SegmentId(2), Line::new(Point::new(0.0, 2.0), Point::new(0.0, 3.0)), s, None);
        if let Some(w) = wall {
            b.add_wall(s, w).unwrap();
        }
        (b.build().unwrap(), r)
    }

    pub fn exit_line() -> Line {
        Line::new(Point::new(10.0, 2.0), Point::new(10.0, 3.0))
    }
}

// ── Grid ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod grid {
    use nav_core::Point;
    use crate::RectGrid;

    #[test]
    fn covering_and_keys() {
        let g = RectGrid::covering(Point::new(0.0, 0.0), Point::new(1.0, 0.5), 0.25);
        assert_eq!((g.nx, g.ny), (5, 3));
        assert_eq!(g.key_at(Point::new(0.5, 0.25)), Some(g.key(2, 1)));
        assert_eq!(g.key_at(Point::new(-1.0, 0.0)), None);
        assert_eq!(g.point(g.key(4, 2)), Point::new(1.0, 0.5));
    }

    #[test]
    fn neighbours_clip_at_border() {
        let g = RectGrid::covering(Point::new(0.0, 0.0), Point::new(1.0, 1.0), 0.5);
        assert_eq!(g.neighbours(0).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(g.neighbours(4).count(), 4);
    }
}

// ── Raster ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod raster {
    use nav_building::DoorState;
    use nav_core::{Point, SegmentId, SegmentUid};

    use super::helpers::{cfg, room_with};
    use crate::{Cell, FieldError, FloorFieldConfig, Raster};

    #[test]
    fn classifies_cells() {
        let (bld, r) = room_with(None);
        let ras = Raster::for_room(&bld, r, &cfg()).unwrap();
        let at = |x, y| ras.cell(ras.grid.key_at(Point::new(x, y)).unwrap());
        assert_eq!(at(5.0, 2.5), Cell::Inside);
        assert_eq!(at(5.0, 0.0), Cell::Wall);
        assert_eq!(at(5.0, -0.5), Cell::Outside);
        assert_eq!(at(10.0, 2.5), Cell::Door(SegmentUid(0)));
        assert_eq!(ras.door_keys(SegmentUid(0)).len(), 5);
    }

    #[test]
    fn closed_door_becomes_wall() {
        let (mut bld, r) = room_with(None);
        bld.set_door_state(SegmentId(1), DoorState::Closed).unwrap();
        let ras = Raster::for_room(&bld, r, &cfg()).unwrap();
        assert_eq!(ras.cell(ras.grid.key_at(Point::new(10.0, 2.5)).unwrap()), Cell::Wall);
        assert!(ras.door_keys(SegmentUid(0)).is_empty());
        assert_eq!(ras.doors(), vec![SegmentUid(1)]);
    }

    #[test]
    fn temp_closed_door_stays_walkable() {
        let (mut bld, r) = room_with(None);
        bld.set_door_state(SegmentId(1), DoorState::TempClosed).unwrap();
        let ras = Raster::for_room(&bld, r, &cfg()).unwrap();
        assert_eq!(ras.doors(), vec![SegmentUid(0), SegmentUid(1)]);
    }

    #[test]
    fn rejects_bad_resolution() {
        let (bld, r) = room_with(None);
        let bad = FloorFieldConfig { delta_h: 0.0, ..FloorFieldConfig::default() };
        assert!(matches!(Raster::for_room(&bld, r, &bad), Err(FieldError::InvalidResolution(_))));
    }
}

// ── Distance field ────────────────────────────────────────────────────────────

#[cfg(test)]
mod distance_field {
    use nav_core::{Line, Point, SegmentUid};

    use super::helpers::{cfg, exit_line, room_with, H};
    use crate::{DistanceField, FloorFieldConfig, Raster};

    const EXIT: SegmentUid = SegmentUid(0);

    fn field(wall: Option<Line>, cfg: &FloorFieldConfig) -> DistanceField {
        let (bld, r) = room_with(wall);
        let ras = Raster::for_room(&bld, r, cfg).unwrap();
        DistanceField::compute(&ras, EXIT)
    }

    #[test]
    fn zero_on_target_cells() {
        let (bld, r) = room_with(None);
        let ras = Raster::for_room(&bld, r, &cfg()).unwrap();
        let f = DistanceField::compute(&ras, EXIT);
        for &k in ras.door_keys(EXIT) {
            assert_eq!(f.costs()[k], 0.0);
        }
    }

    #[test]
    fn tracks_euclidean_distance() {
        let f = field(None, &cfg());
        let exit = exit_line();
        for p in [
            Point::new(9.0, 2.5),
            Point::new(5.0, 2.5),
            Point::new(1.0, 2.5),
            Point::new(6.0, 0.5),
            Point::new(2.0, 4.5),
        ] {
            let d = exit.distance_to(p);
            let c = f.cost_at(p);
            assert!((c - d).abs() <= 0.1 * d + 2.0 * H, "at {p:?}: cost {c}, euclid {d}");
        }
    }

    #[test]
    fn monotone_away_from_exit() {
        let f = field(None, &cfg());
        let costs: Vec<f64> = [9.5, 8.0, 6.0, 4.0, 2.0, 0.5]
            .iter()
            .map(|&x| f.cost_at(Point::new(x, 2.5)))
            .collect();
        assert!(costs.windows(2).all(|w| w[0] < w[1]), "{costs:?}");
    }

    #[test]
    fn walls_and_outside_unreachable() {
        let (bld, r) = room_with(None);
        let ras = Raster::for_room(&bld, r, &cfg()).unwrap();
        let f = DistanceField::compute(&ras, EXIT);
        for k in 0..ras.grid.len() {
            if !ras.is_walkable(k) {
                assert!(f.costs()[k].is_infinite());
            }
        }
    }

    #[test]
    fn sealed_region_stays_infinite() {
        let wall = Line::new(Point::new(5.0, 0.0), Point::new(5.0, 5.0));
        let f = field(Some(wall), &cfg());
        assert!(f.cost_at(Point::new(2.0, 2.5)).is_infinite());
        assert!(f.cost_at(Point::new(8.0, 2.5)).is_finite());
    }

    #[test]
    fn wall_forces_detour() {
        let wall = Line::new(Point::new(5.0, 0.0), Point::new(5.0, 4.5));
        let f = field(Some(wall), &cfg());
        let p = Point::new(4.0, 0.5);
        // Around the wall tip: roughly 4.4 up + 5.3 across against 6.2 direct.
        assert!(f.cost_at(p) > exit_line().distance_to(p) + 2.0);
    }

    #[test]
    fn deterministic() {
        let a = field(None, &cfg());
        let b = field(None, &cfg());
        let bits = |f: &DistanceField| f.costs().iter().map(|c| c.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn wall_avoidance_never_shortens() {
        let plain = field(None, &cfg());
        let slow = field(None, &FloorFieldConfig { use_wall_avoidance: true, ..cfg() });
        for p in [Point::new(5.0, 2.5), Point::new(5.0, 0.3), Point::new(1.0, 4.6)] {
            assert!(slow.cost_at(p) >= plain.cost_at(p), "at {p:?}");
        }
        assert!(slow.cost_at(Point::new(5.0, 0.3)) > plain.cost_at(Point::new(5.0, 0.3)));
    }

    #[test]
    fn direction_points_downhill() {
        let f = field(None, &cfg());
        let d = f.direction_at(Point::new(6.0, 2.5));
        assert!(d.x > 0.9, "{d:?}");
        assert!((d.norm() - 1.0).abs() < 1e-9);
        assert_eq!(f.direction_at(Point::new(100.0, 0.0)), Point::ZERO);
    }
}

// ── Room fields ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod room_fields {
    use nav_core::{Point, SegmentUid};

    use super::helpers::{cfg, room_with, H};
    use crate::RoomFields;

    #[test]
    fn one_field_per_door() {
        let (bld, r) = room_with(None);
        let rf = RoomFields::build(&bld, r, &cfg()).unwrap();
        assert_eq!(rf.targets().collect::<Vec<_>>(), vec![SegmentUid(0), SegmentUid(1)]);
        assert!(rf.field(SegmentUid(7)).is_none());
        assert!(rf.cost_to(SegmentUid(7), Point::new(1.0, 1.0)).is_infinite());
    }

    #[test]
    fn door_to_door_distance() {
        let (bld, r) = room_with(None);
        let rf = RoomFields::build(&bld, r, &cfg()).unwrap();
        let ab = rf.distance_between(SegmentUid(0), SegmentUid(1));
        let ba = rf.distance_between(SegmentUid(1), SegmentUid(0));
        assert!((ab - 10.0).abs() <= 2.0 * H, "{ab}");
        assert!((ab - ba).abs() <= 2.0 * H);
    }
}
