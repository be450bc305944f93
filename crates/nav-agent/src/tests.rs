//! Unit tests for nav-agent.

#[cfg(test)]
mod pedestrian {
    use nav_core::{PedId, Point, RoomId, SegmentUid, SubRoomId};
    use crate::Pedestrian;

    fn ped() -> Pedestrian {
        Pedestrian::new(PedId(0), Point::new(1.0, 1.0), RoomId(0), SubRoomId(0))
    }

    #[test]
    fn fresh_pedestrian_has_no_route() {
        let p = ped();
        assert!(!p.has_route());
        assert!(p.since_last_route(0.0).is_infinite());
    }

    #[test]
    fn set_and_clear_route() {
        let mut p = ped();
        p.set_route(Some(SegmentUid(3)), 2.5);
        assert_eq!(p.exit, Some(SegmentUid(3)));
        assert!((p.since_last_route(4.0) - 1.5).abs() < 1e-12);

        p.clear_route();
        assert!(!p.has_route());
        assert!(p.since_last_route(4.0).is_infinite());
    }

    #[test]
    fn repeated_decision_keeps_choice_time() {
        let mut p = ped();
        p.set_route(Some(SegmentUid(1)), 1.0);
        p.set_route(Some(SegmentUid(1)), 2.0);
        assert_eq!(p.last_route_time, 1.0);
        p.set_route(Some(SegmentUid(2)), 3.0);
        assert_eq!(p.last_route_time, 3.0);
    }

    #[test]
    fn no_route_keeps_last_decision_time() {
        let mut p = ped();
        p.set_route(Some(SegmentUid(1)), 1.0);
        p.set_route(None, 2.0);
        assert!(!p.has_route());
        assert_eq!(p.last_route_time, 1.0);
    }
}

#[cfg(test)]
mod knowledge {
    use nav_core::{PedId, PedRng, SegmentId};
    use crate::{Knowledge, KnowledgeConfig, KnowledgeEntry, MergeOutcome};

    const DOOR: SegmentId = SegmentId(4);

    fn rumour(time: f64) -> KnowledgeEntry {
        KnowledgeEntry { closed: true, time, quality: 1.0 }
    }

    #[test]
    fn observation_reports_changes() {
        let mut k = Knowledge::default();
        assert!(k.observe(DOOR, true, 1.0));
        assert!(!k.observe(DOOR, true, 2.0));
        assert!(k.observe(DOOR, false, 3.0));
        assert!(!k.believes_closed(DOOR));
    }

    #[test]
    fn certain_acceptance_decays_quality() {
        let mut k = Knowledge::default();
        let mut rng = PedRng::new(1, PedId(0));
        let cfg = KnowledgeConfig::default();
        let out = k.offer(DOOR, rumour(5.0), 0.0, &mut rng, &cfg);
        assert_eq!(out, MergeOutcome::Accepted { changed: true });
        assert!(k.believes_closed(DOOR));
        assert!((k.get(DOOR).unwrap().quality - 0.8).abs() < 1e-12);
    }

    #[test]
    fn stale_and_low_quality_ignored() {
        let mut k = Knowledge::default();
        let mut rng = PedRng::new(1, PedId(0));
        let cfg = KnowledgeConfig::default();
        k.observe(DOOR, false, 10.0);
        assert_eq!(k.offer(DOOR, rumour(10.0), 0.0, &mut rng, &cfg), MergeOutcome::Ignored);
        let weak = KnowledgeEntry { quality: 0.1, ..rumour(20.0) };
        assert_eq!(k.offer(DOOR, weak, 0.0, &mut rng, &cfg), MergeOutcome::Ignored);
    }

    #[test]
    fn refusal_is_sticky_until_newer() {
        let mut k = Knowledge::default();
        let mut rng = PedRng::new(1, PedId(0));
        let cfg = KnowledgeConfig::default();

        // Fully risk-tolerant: never accepts.
        assert_eq!(k.offer(DOOR, rumour(5.0), 1.0, &mut rng, &cfg), MergeOutcome::Refused);
        // Same information again, now with zero tolerance: still ignored.
        assert_eq!(k.offer(DOOR, rumour(5.0), 0.0, &mut rng, &cfg), MergeOutcome::Ignored);
        assert_eq!(k.offer(DOOR, rumour(4.0), 0.0, &mut rng, &cfg), MergeOutcome::Ignored);
        // Strictly newer information is considered again.
        assert_eq!(
            k.offer(DOOR, rumour(6.0), 0.0, &mut rng, &cfg),
            MergeOutcome::Accepted { changed: true }
        );
    }

    #[test]
    fn observation_clears_refusal() {
        let mut k = Knowledge::default();
        let mut rng = PedRng::new(1, PedId(0));
        let cfg = KnowledgeConfig::default();
        k.offer(DOOR, rumour(5.0), 1.0, &mut rng, &cfg);
        k.observe(DOOR, false, 1.0);
        assert_eq!(
            k.offer(DOOR, rumour(5.0), 0.0, &mut rng, &cfg),
            MergeOutcome::Accepted { changed: true }
        );
    }

    #[test]
    fn nan_acceptance_refuses_instead_of_panicking() {
        let mut k = Knowledge::default();
        let mut rng = PedRng::new(1, PedId(0));
        let cfg = KnowledgeConfig { acceptance: f64::NAN, ..KnowledgeConfig::default() };
        assert_eq!(cfg.invalid_setting(), Some("acceptance"));
        assert_eq!(k.offer(DOOR, rumour(5.0), 0.0, &mut rng, &cfg), MergeOutcome::Refused);
        assert_eq!(KnowledgeConfig::default().invalid_setting(), None);
        let far = KnowledgeConfig { merge_radius: f64::INFINITY, ..KnowledgeConfig::default() };
        assert_eq!(far.invalid_setting(), Some("merge_radius"));
    }

    #[test]
    fn key_lists_closed_doors() {
        let mut k = Knowledge::default();
        k.observe(SegmentId(9), true, 0.0);
        k.observe(SegmentId(2), true, 0.0);
        k.observe(SegmentId(5), false, 0.0);
        assert_eq!(k.key(0.2), "2:9");
        assert_eq!(k.offers(0.2).len(), 3);
    }
}

#[cfg(test)]
mod crowd {
    use nav_core::{PedId, Point, RoomId, SubRoomId};
    use crate::{CrowdBuilder, Pedestrian};

    fn ped() -> Pedestrian {
        Pedestrian::new(PedId::INVALID, Point::ZERO, RoomId(0), SubRoomId(0))
    }

    #[test]
    fn ids_are_dense() {
        let (peds, rngs) = CrowdBuilder::new(3).extend((0..4).map(|_| ped())).build();
        let ids: Vec<u32> = peds.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(rngs.len(), 4);
    }

    #[test]
    fn risk_tolerance_reproducible() {
        let build = || CrowdBuilder::new(9).extend((0..8).map(|_| ped())).risk_tolerance(0.2..0.8).build().0;
        let a: Vec<u64> = build().iter().map(|p| p.risk_tolerance.to_bits()).collect();
        let b: Vec<u64> = build().iter().map(|p| p.risk_tolerance.to_bits()).collect();
        assert_eq!(a, b);
    }
}
