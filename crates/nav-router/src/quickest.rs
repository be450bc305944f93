//! Congestion-aware routing on the visibility door graph.
//!
//! A pedestrian keeps its target until `recalc_interval` has passed.  After
//! that, if too many of the pedestrians heading for the same segment are
//! ahead of it, it estimates travel time through every visible alternative
//! and switches only when the cost-benefit score beats `cba_gain`.

use nav_agent::Pedestrian;
use nav_building::Building;
use nav_core::{RouterId, SegmentUid};

use crate::context::RouteContext;
use crate::graph::{visibility_matrix, CostMatrix};
use crate::router::{Choice, DoorGraph, Router};
use crate::shortest::shortest_choice;
use crate::{RouterConfig, RouterResult, RoutingStrategy};

/// Smallest travel time used when forming gains, seconds.
const MIN_TRAVEL_TIME: f64 = 1e-6;

/// Cost-benefit score of switching from a target with gain `current` to one
/// with gain `candidate`.  Positive when the candidate is better.
pub fn cba(candidate: f64, current: f64) -> f64 {
    let sum = candidate + current;
    if sum <= 0.0 { 0.0 } else { (candidate - current) / sum }
}

#[derive(Debug)]
pub struct QuickestRouter {
    config: RouterConfig,
    graph:  Option<DoorGraph>,
}

impl QuickestRouter {
    pub fn new(config: RouterConfig) -> Self {
        Self { config, graph: None }
    }

    /// `ped`'s current target if it is still worth holding: routable, on the
    /// border of its subroom, leading to a final, and not already passed.
    fn current_target(&self, graph: &DoorGraph, ped: &Pedestrian) -> Option<SegmentUid> {
        let e = ped.exit?;
        let seg = graph.topo.segment(e)?;
        if !seg.routable || !seg.borders(ped.subroom) {
            return None;
        }
        let (goal, cost) = graph.matrix.nearest_of(e, graph.finals.for_ped(ped))?;
        let borders = |n: SegmentUid| graph.topo.segment(n).is_some_and(|s| s.borders(ped.subroom));
        let settled = graph.advance(&Choice { via: e, goal, cost }, borders, |_| false);
        (settled == e).then_some(e)
    }

    /// Fraction of the pedestrians in `ped`'s subroom heading for `exit`
    /// that are closer to it than `ped`.  Zero in sparsely occupied subrooms.
    pub(crate) fn congestion_degree(
        &self,
        graph: &DoorGraph,
        ped:   &Pedestrian,
        exit:  SegmentUid,
        ctx:   &RouteContext<'_>,
    ) -> f64 {
        let Some(centre) = graph.topo.centre(exit) else { return 0.0 };
        let others: Vec<&Pedestrian> = ctx.in_subroom(ped.subroom).filter(|o| o.id != ped.id).collect();
        if others.len() < self.config.quickest.visibility_obstruction {
            return 0.0;
        }
        let mine = ped.pos.distance(centre);
        let (mut heading, mut ahead) = (0usize, 0usize);
        for o in others.iter().filter(|o| o.exit == Some(exit)) {
            heading += 1;
            if o.pos.distance(centre) < mine {
                ahead += 1;
            }
        }
        if heading == 0 { 0.0 } else { ahead as f64 / heading as f64 }
    }

    /// Estimated seconds to reach a final through `c`: walk to `c`, walk
    /// on from `c`, and wait for the queue at `c` to drain.
    fn travel_time(
        &self,
        graph: &DoorGraph,
        ped:   &Pedestrian,
        c:     SegmentUid,
        ctx:   &RouteContext<'_>,
    ) -> f64 {
        let Some(seg) = graph.topo.segment(c) else { return f64::INFINITY };
        let Some((_, onward)) = graph.matrix.nearest_of(c, graph.finals.for_ped(ped)) else {
            return f64::INFINITY;
        };
        let v0 = ped.v0.max(f64::EPSILON);
        let mine = ped.pos.distance(seg.centre);
        let queue = ctx
            .in_subroom(ped.subroom)
            .filter(|o| o.id != ped.id && o.exit == Some(c) && o.pos.distance(seg.centre) < mine)
            .count();
        let capacity = (self.config.quickest.specific_flow * seg.width).max(f64::EPSILON);
        (mine + onward) / v0 + queue as f64 / capacity
    }

    /// Fastest visible alternative to `current`, if switching pays off.
    fn redirect(
        &self,
        graph:   &DoorGraph,
        ped:     &Pedestrian,
        current: SegmentUid,
        ctx:     &RouteContext<'_>,
    ) -> SegmentUid {
        let topo = &graph.topo;
        let all = topo.subroom_segments(ped.subroom);
        let visible: Vec<SegmentUid> = all
            .iter()
            .copied()
            .filter(|&c| topo.centre(c).is_some_and(|p| topo.is_visible(ped.subroom, ped.pos, p)))
            .collect();
        let candidates = if visible.is_empty() { all } else { visible.as_slice() };

        let best = candidates
            .iter()
            .map(|&c| (c, self.travel_time(graph, ped, c, ctx)))
            .filter(|(_, t)| t.is_finite())
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        let Some((q, t_q)) = best else { return current };
        if q == current {
            return current;
        }

        let t_e = self.travel_time(graph, ped, current, ctx);
        let gain = |t: f64| 1.0 / t.max(MIN_TRAVEL_TIME);
        let score = cba(gain(t_q), if t_e.is_finite() { gain(t_e) } else { 0.0 });
        if score > self.config.quickest.cba_gain {
            tracing::debug!(ped = ped.id.0, from = current.0, to = q.0, score, "redirected");
            q
        } else {
            current
        }
    }
}

impl Router for QuickestRouter {
    fn id(&self) -> RouterId {
        self.config.id
    }

    fn strategy(&self) -> RoutingStrategy {
        RoutingStrategy::Quickest
    }

    fn config(&self) -> &RouterConfig {
        &self.config
    }

    fn init(&mut self, building: &Building) -> RouterResult<()> {
        let graph = DoorGraph::capture(building, self.config.has_specific_goals, |topo| {
            Ok(visibility_matrix(topo))
        })?;
        self.graph = Some(graph);
        Ok(())
    }

    fn is_initialised(&self) -> bool {
        self.graph.is_some()
    }

    fn find_exit(&self, ped: &Pedestrian, ctx: &RouteContext<'_>) -> Option<SegmentUid> {
        let graph = self.graph.as_ref()?;
        let Some(current) = self.current_target(graph, ped) else {
            return shortest_choice(graph, ped, false);
        };
        if ped.since_last_route(ctx.time) < self.config.recalc_interval {
            return Some(current);
        }
        let degree = self.congestion_degree(graph, ped, current, ctx);
        if degree <= self.config.quickest.congestion_ratio {
            return Some(current);
        }
        Some(self.redirect(graph, ped, current, ctx))
    }

    fn cost_matrix(&self) -> Option<&CostMatrix> {
        self.graph.as_ref().map(|g| &g.matrix)
    }
}
