//! Unit tests for nav-building.
//!
//! All tests use hand-crafted geometry so they run without any file loader.

#[cfg(test)]
mod helpers {
    use nav_core::{Line, Point, SegmentId, SubRoomId};
    use crate::{Building, BuildingBuilder};

    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
        vec![Point::new(x0, y0), Point::new(x1, y0), Point::new(x1, y1), Point::new(x0, y1)]
    }

    /// Two 10×5 rooms side by side.
    ///
    /// ```text
    ///   +---------+---------+
    ///   |  room A | room B  |
    ///   |   (0)   1   (1)   2 → outside
    ///   +---------+---------+
    ///   0        10        20
    /// ```
    ///
    /// Door 1 (x = 10, y ∈ [2, 3]) joins the rooms; door 2 (x = 20) is the exit.
    pub fn corridor() -> (Building, [SubRoomId; 2]) {
        let mut b = BuildingBuilder::new();
        let ra = b.add_room("A");
        let rb = b.add_room("B");
        let sa = b.add_subroom(ra, rect(0.0, 0.0, 10.0, 5.0));
        let sb = b.add_subroom(rb, rect(10.0, 0.0, 20.0, 5.0));
        b.add_transition(SegmentId(1), Line::new(Point::new(10.0, 2.0), Point::new(10.0, 3.0)), sa, Some(sb));
        b.add_transition(SegmentId(2), Line::new(Point::new(20.0, 2.0), Point::new(20.0, 3.0)), sb, None);
        (b.build().unwrap(), [sa, sb])
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use nav_core::{Line, Point, RoomId, SegmentId, SegmentUid};
    use crate::{BuildingBuilder, BuildingError, DoorState};
    use super::helpers::{corridor, rect};

    #[test]
    fn uids_follow_insertion_order() {
        let (bld, _) = corridor();
        assert_eq!(bld.uid_of(SegmentId(1)), Some(SegmentUid(0)));
        assert_eq!(bld.uid_of(SegmentId(2)), Some(SegmentUid(1)));
        assert_eq!(bld.uid_of(SegmentId(9)), None);
    }

    #[test]
    fn boundary_walls_leave_door_gaps() {
        let (bld, [sa, sb]) = corridor();
        assert_eq!(bld.subroom(sa).unwrap().walls.len(), 5);
        assert_eq!(bld.subroom(sb).unwrap().walls.len(), 6);
        // No wall covers the door centre.
        let door = bld.segment(SegmentUid(0)).unwrap();
        for w in &bld.subroom(sa).unwrap().walls {
            assert!(w.distance_to(door.centre()) > 0.4, "wall {w:?} covers the door");
        }
    }

    #[test]
    fn subroom_segment_lists() {
        let (bld, [sa, sb]) = corridor();
        assert_eq!(bld.subroom(sa).unwrap().segments, vec![SegmentUid(0)]);
        assert_eq!(bld.subroom(sb).unwrap().segments, vec![SegmentUid(0), SegmentUid(1)]);
    }

    #[test]
    fn duplicate_segment_rejected() {
        let mut b = BuildingBuilder::new();
        let r = b.add_room("r");
        let s = b.add_subroom(r, rect(0.0, 0.0, 1.0, 1.0));
        let l = Line::new(Point::new(1.0, 0.2), Point::new(1.0, 0.8));
        b.add_transition(SegmentId(5), l, s, None);
        b.add_transition(SegmentId(5), l, s, None);
        assert!(matches!(b.build(), Err(BuildingError::DuplicateSegment(SegmentId(5)))));
    }

    #[test]
    fn crossing_across_rooms_rejected() {
        let mut b = BuildingBuilder::new();
        let r0 = b.add_room("a");
        let r1 = b.add_room("b");
        let s0 = b.add_subroom(r0, rect(0.0, 0.0, 1.0, 1.0));
        let s1 = b.add_subroom(r1, rect(1.0, 0.0, 2.0, 1.0));
        b.add_crossing(SegmentId(1), Line::new(Point::new(1.0, 0.2), Point::new(1.0, 0.8)), s0, s1);
        assert!(matches!(b.build(), Err(BuildingError::CrossingSpansRooms { .. })));
    }

    #[test]
    fn unknown_room_rejected() {
        let mut b = BuildingBuilder::new();
        b.add_subroom(RoomId(3), rect(0.0, 0.0, 1.0, 1.0));
        assert!(matches!(b.build(), Err(BuildingError::UnknownRoom(RoomId(3)))));
    }

    #[test]
    fn initial_state_applied() {
        let mut b = BuildingBuilder::new();
        let r = b.add_room("r");
        let s = b.add_subroom(r, rect(0.0, 0.0, 1.0, 1.0));
        b.add_transition(SegmentId(1), Line::new(Point::new(1.0, 0.2), Point::new(1.0, 0.8)), s, None);
        b.set_door_state(SegmentId(1), DoorState::Closed).unwrap();
        let bld = b.build().unwrap();
        assert!(bld.segment_by_id(SegmentId(1)).unwrap().is_closed());
    }
}

// ── Door state machine ────────────────────────────────────────────────────────

#[cfg(test)]
mod door_state {
    use nav_core::SegmentId;
    use crate::{BuildingError, DoorState};
    use super::helpers::corridor;

    #[test]
    fn repeated_transition_is_noop() {
        let (mut bld, _) = corridor();
        assert!(bld.set_door_state(SegmentId(1), DoorState::Closed).unwrap());
        assert!(!bld.set_door_state(SegmentId(1), DoorState::Closed).unwrap());
        assert!(bld.set_door_state(SegmentId(1), DoorState::Open).unwrap());
        assert!(!bld.set_door_state(SegmentId(1), DoorState::Open).unwrap());
    }

    #[test]
    fn unknown_segment_is_error() {
        let (mut bld, _) = corridor();
        assert!(matches!(
            bld.set_door_state(SegmentId(42), DoorState::Closed),
            Err(BuildingError::UnknownSegment(SegmentId(42)))
        ));
    }

    #[test]
    fn usage_limit_closes_and_reset_reopens() {
        let (mut bld, _) = corridor();
        let door = bld.segment_by_id_mut(SegmentId(2)).unwrap();
        door.max_usage = Some(2);
        assert!(!door.record_passage());
        assert!(door.record_passage());
        assert!(door.is_closed() && door.closed_by_usage());
        assert_eq!(door.usage, 2);

        assert!(door.reset_usage());
        assert!(door.is_open());
        assert_eq!(door.temp_usage, 0);
        assert_eq!(door.usage, 2);
    }

    #[test]
    fn reset_reopens_temp_closed_but_not_closed_door() {
        let (mut bld, _) = corridor();
        let door = bld.segment_by_id_mut(SegmentId(2)).unwrap();
        door.temp_close();
        door.temp_usage = 5;
        assert!(door.reset_usage());
        assert!(door.is_open());
        assert_eq!(door.temp_usage, 0);

        door.close();
        door.temp_usage = 5;
        assert!(!door.reset_usage());
        assert!(door.is_closed());
        assert_eq!(door.temp_usage, 0);
    }

    #[test]
    fn temp_closed_is_routable() {
        assert!(DoorState::TempClosed.is_routable());
        assert!(DoorState::Open.is_routable());
        assert!(!DoorState::Closed.is_routable());
    }
}

// ── Flow regulation ───────────────────────────────────────────────────────────

#[cfg(test)]
mod flow {
    use nav_core::{Line, Point, SegmentId};
    use crate::{BuildingBuilder, BuildingError, DoorState};
    use super::helpers::{corridor, rect};

    const DT: f64 = 0.1;

    #[test]
    fn over_limit_closes_then_reopens_on_its_own() {
        let (mut bld, _) = corridor();
        let door = bld.segment_by_id_mut(SegmentId(2)).unwrap();
        door.outflow_rate = Some(1.0);
        for _ in 0..4 {
            door.record_passage();
        }
        // 4 passages in 1 s against 1 ped/s: closed for 4 − 1 = 3 s.
        assert!(door.regulate_flow(1.0, DT));
        assert_eq!(door.state(), DoorState::TempClosed);
        assert!(door.closed_by_flow());
        assert!((door.closing_time() - 3.0).abs() < 1e-12);

        let mut t = 1.0;
        for _ in 0..29 {
            t += DT;
            assert!(!door.regulate_flow(t, DT), "t = {t}");
        }
        assert!(door.regulate_flow(t + DT, DT));
        assert!(door.is_open());
        assert_eq!(door.closing_time(), 0.0);
    }

    #[test]
    fn flow_under_limit_keeps_door_open() {
        let (mut bld, _) = corridor();
        let door = bld.segment_by_id_mut(SegmentId(2)).unwrap();
        door.outflow_rate = Some(1.0);
        door.record_passage();
        assert!(!door.regulate_flow(2.0, DT));
        assert!(door.is_open());
    }

    #[test]
    fn exhausted_usage_blocks_reopening() {
        let (mut bld, _) = corridor();
        let door = bld.segment_by_id_mut(SegmentId(2)).unwrap();
        door.outflow_rate = Some(1.0);
        door.max_usage = Some(10);
        door.record_passage();
        door.record_passage();
        assert!(door.regulate_flow(0.5, DT));
        door.temp_usage = 10;
        for i in 1..=40u32 {
            assert!(!door.regulate_flow(0.5 + f64::from(i) * DT, DT));
        }
        assert_eq!(door.state(), DoorState::TempClosed);
    }

    #[test]
    fn reset_leaves_flow_countdown_alone() {
        let (mut bld, _) = corridor();
        let door = bld.segment_by_id_mut(SegmentId(2)).unwrap();
        door.outflow_rate = Some(0.5);
        door.record_passage();
        door.record_passage();
        assert!(door.regulate_flow(1.0, DT));
        assert!(!door.reset_usage());
        assert_eq!(door.state(), DoorState::TempClosed);
        // An explicit OPEN ends the countdown early.
        assert!(door.open());
        assert!(!door.closed_by_flow());
    }

    #[test]
    fn building_steps_only_regulated_doors() {
        let (mut bld, _) = corridor();
        bld.segment_by_id_mut(SegmentId(1)).unwrap().temp_close();
        let exit = bld.segment_by_id_mut(SegmentId(2)).unwrap();
        exit.outflow_rate = Some(1.0);
        exit.record_passage();
        exit.record_passage();
        assert_eq!(bld.regulate_flow(0.5, DT), vec![SegmentId(2)]);
        // Door 1 was closed by an event: no countdown.
        for i in 1..=100u32 {
            bld.regulate_flow(0.5 + f64::from(i) * DT, DT);
        }
        assert_eq!(bld.segment_by_id(SegmentId(1)).unwrap().state(), DoorState::TempClosed);
        assert!(bld.segment_by_id(SegmentId(2)).unwrap().is_open());
    }

    #[test]
    fn builder_rejects_bad_outflow_rate() {
        let mut b = BuildingBuilder::new();
        let r = b.add_room("r");
        let s = b.add_subroom(r, rect(0.0, 0.0, 1.0, 1.0));
        b.add_transition(SegmentId(1), Line::new(Point::new(1.0, 0.2), Point::new(1.0, 0.8)), s, None);
        assert!(matches!(
            b.set_outflow_rate(SegmentId(1), f64::NAN),
            Err(BuildingError::InvalidOutflowRate { .. })
        ));
        b.set_outflow_rate(SegmentId(1), 2.0).unwrap();
        let bld = b.build().unwrap();
        assert_eq!(bld.segment_by_id(SegmentId(1)).unwrap().outflow_rate, Some(2.0));
    }
}

// ── Fingerprint ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod fingerprint {
    use nav_core::SegmentId;
    use crate::{DoorState, Fingerprint};
    use super::helpers::corridor;

    #[test]
    fn canonical_sorted_join() {
        let fp = Fingerprint::from_ids([SegmentId(10), SegmentId(2), SegmentId(2)]);
        assert_eq!(fp.as_str(), "2:10");
    }

    #[test]
    fn closing_removes_membership() {
        let (mut bld, _) = corridor();
        assert_eq!(bld.fingerprint().as_str(), "1:2");
        bld.set_door_state(SegmentId(1), DoorState::Closed).unwrap();
        assert_eq!(bld.fingerprint().as_str(), "2");
        bld.set_door_state(SegmentId(1), DoorState::Open).unwrap();
        assert_eq!(bld.fingerprint().as_str(), "1:2");
    }

    #[test]
    fn temp_close_keeps_fingerprint() {
        let (mut bld, _) = corridor();
        let before = bld.fingerprint();
        bld.set_door_state(SegmentId(2), DoorState::TempClosed).unwrap();
        assert_eq!(bld.fingerprint(), before);
    }
}

// ── Spatial queries ───────────────────────────────────────────────────────────

#[cfg(test)]
mod spatial {
    use nav_core::{Point, SegmentUid};
    use super::helpers::corridor;

    #[test]
    fn segments_within_radius() {
        let (bld, _) = corridor();
        assert_eq!(bld.segments_within(Point::new(9.0, 2.5), 1.5), vec![SegmentUid(0)]);
        assert!(bld.segments_within(Point::new(5.0, 2.5), 1.0).is_empty());
        assert_eq!(bld.segments_within(Point::new(15.0, 2.5), 5.5).len(), 2);
    }

    #[test]
    fn subroom_lookup_and_visibility() {
        let (bld, [sa, sb]) = corridor();
        assert_eq!(bld.subroom_at(Point::new(2.0, 2.0)), Some(sa));
        assert_eq!(bld.subroom_at(Point::new(12.0, 2.0)), Some(sb));
        assert_eq!(bld.subroom_at(Point::new(30.0, 2.0)), None);

        let sub = bld.subroom(sa).unwrap();
        assert!(sub.is_visible(Point::new(1.0, 1.0), Point::new(9.0, 4.0)));
    }

    #[test]
    fn share_subroom_and_exits() {
        let (bld, _) = corridor();
        assert!(bld.share_subroom(SegmentUid(0), SegmentUid(1)));
        let exits: Vec<_> = bld.exits().map(|s| s.uid).collect();
        assert_eq!(exits, vec![SegmentUid(1)]);
    }
}
