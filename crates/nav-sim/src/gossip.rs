//! `KnowledgeExchange`: door-state observation and pairwise gossip.
//!
//! Runs after the door events of a step and before routing.  It never
//! touches the building or the engines; its only lever on routing is
//! clearing a pedestrian's target so the next route query recomputes it.

use rstar::primitives::GeomWithData;
use rstar::RTree;

use nav_agent::{KnowledgeConfig, KnowledgeEntry, MergeOutcome, PedRngs, Pedestrian};
use nav_building::Building;
use nav_core::SegmentId;

type PedPoint = GeomWithData<[f64; 2], usize>;

/// Counters for one gossip pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GossipStats {
    /// First-hand observations that changed a belief.
    pub observed: usize,
    pub accepted: usize,
    pub refused:  usize,
    /// Pedestrians whose target was cleared.
    pub cleared:  usize,
}

#[derive(Clone, Debug, Default)]
pub struct KnowledgeExchange {
    pub cfg: KnowledgeConfig,
}

impl KnowledgeExchange {
    pub fn new(cfg: KnowledgeConfig) -> Self {
        Self { cfg }
    }

    /// Observation for every pedestrian, then one merge round.  Both walk
    /// pedestrians in index order and draw only from the receiver's RNG, so
    /// the outcome is independent of thread count.
    pub fn step(&self, time: f64, building: &Building, peds: &mut [Pedestrian], rngs: &mut PedRngs) -> GossipStats {
        let mut stats = GossipStats::default();
        self.observe(time, building, peds, &mut stats);
        self.merge(building, peds, rngs, &mut stats);
        stats
    }

    fn observe(&self, time: f64, building: &Building, peds: &mut [Pedestrian], stats: &mut GossipStats) {
        for ped in peds.iter_mut() {
            for uid in building.segments_within(ped.pos, self.cfg.observe_radius) {
                let Some(seg) = building.segment(uid) else { continue };
                let closed = seg.is_closed();
                if !closed && !ped.knowledge.believes_closed(seg.id) {
                    continue;
                }
                if ped.knowledge.observe(seg.id, closed, time) {
                    stats.observed += 1;
                    if clear_if_affected(ped, building, seg.id) {
                        stats.cleared += 1;
                    }
                }
            }
        }
    }

    /// Every pair `(i, j)`, `i < j`, sharing a subroom and within
    /// `merge_radius` swaps what each knew at the start of the round.
    fn merge(&self, building: &Building, peds: &mut [Pedestrian], rngs: &mut PedRngs, stats: &mut GossipStats) {
        let pairs = neighbour_pairs(peds, self.cfg.merge_radius);
        if pairs.is_empty() {
            return;
        }
        let offers: Vec<Vec<(SegmentId, KnowledgeEntry)>> =
            peds.iter().map(|p| p.knowledge.offers(self.cfg.min_quality)).collect();

        for (i, j) in pairs {
            for (from, to) in [(i, j), (j, i)] {
                let ped = &mut peds[to];
                let rng = rngs.get_mut(ped.id);
                let mut clear = false;
                for &(door, entry) in &offers[from] {
                    match ped.knowledge.offer(door, entry, ped.risk_tolerance, rng, &self.cfg) {
                        MergeOutcome::Accepted { changed } => {
                            stats.accepted += 1;
                            clear |= changed && affects_route(ped, building, door);
                        }
                        MergeOutcome::Refused => stats.refused += 1,
                        MergeOutcome::Ignored => {}
                    }
                }
                if clear && ped.has_route() {
                    ped.clear_route();
                    stats.cleared += 1;
                }
            }
        }
    }
}

/// Pedestrian index pairs `(i, j)`, `i < j`, in the same subroom and within
/// `radius`, ascending.
fn neighbour_pairs(peds: &[Pedestrian], radius: f64) -> Vec<(usize, usize)> {
    if peds.len() < 2 || radius.is_nan() || radius <= 0.0 {
        return Vec::new();
    }
    let tree: RTree<PedPoint> =
        RTree::bulk_load(peds.iter().enumerate().map(|(i, p)| PedPoint::new([p.pos.x, p.pos.y], i)).collect());

    let mut pairs = Vec::new();
    for (i, p) in peds.iter().enumerate() {
        for hit in tree.locate_within_distance([p.pos.x, p.pos.y], radius * radius) {
            let j = hit.data;
            if j > i && peds[j].subroom == p.subroom {
                pairs.push((i, j));
            }
        }
    }
    pairs.sort_unstable();
    pairs
}

/// The door is the pedestrian's target or is now believed closed.
fn affects_route(ped: &Pedestrian, building: &Building, door: SegmentId) -> bool {
    let target = building.uid_of(door);
    (target.is_some() && ped.exit == target) || ped.knowledge.believes_closed(door)
}

fn clear_if_affected(ped: &mut Pedestrian, building: &Building, door: SegmentId) -> bool {
    if ped.has_route() && affects_route(ped, building, door) {
        ped.clear_route();
        return true;
    }
    false
}
