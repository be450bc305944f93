//! Shortest-path routers over the visibility door graph.

use nav_agent::Pedestrian;
use nav_building::Building;
use nav_core::{RouterId, SegmentUid};

use crate::context::RouteContext;
use crate::graph::{visibility_matrix, CostMatrix};
use crate::router::{DoorGraph, Router};
use crate::{RouterConfig, RouterResult, RoutingStrategy};

/// `GlobalShortest` and `LocalShortest`.
///
/// Both score each routable segment of the pedestrian's subroom by straight
/// distance to its centre plus graph distance to the nearest final.  The
/// local variant only considers segments in line of sight.
#[derive(Debug)]
pub struct ShortestRouter {
    config: RouterConfig,
    graph:  Option<DoorGraph>,
}

impl ShortestRouter {
    pub fn new(config: RouterConfig) -> Self {
        Self { config, graph: None }
    }

    fn visible_only(&self) -> bool {
        self.config.strategy == RoutingStrategy::LocalShortest
    }
}

/// Shortest choice for `ped` on `graph`.  Shared with the quickest router,
/// which starts from it.
pub(crate) fn shortest_choice(
    graph:        &DoorGraph,
    ped:          &Pedestrian,
    visible_only: bool,
) -> Option<SegmentUid> {
    let finals = graph.finals.for_ped(ped);
    if finals.is_empty() {
        return None;
    }
    let topo = &graph.topo;
    let sees = |c: SegmentUid| {
        topo.centre(c).is_some_and(|p| topo.is_visible(ped.subroom, ped.pos, p))
    };

    let all = topo.subroom_segments(ped.subroom);
    let visible: Vec<SegmentUid> = if visible_only {
        all.iter().copied().filter(|&c| sees(c)).collect()
    } else {
        Vec::new()
    };
    let candidates = if visible.is_empty() { all } else { visible.as_slice() };

    let choice = graph.best_route(candidates.iter().copied(), finals, |c| {
        topo.centre(c).map_or(f64::INFINITY, |p| p.distance(ped.pos))
    })?;

    let keep = |n: SegmentUid| {
        topo.segment(n).is_some_and(|s| s.borders(ped.subroom)) && (!visible_only || sees(n))
    };
    Some(graph.advance(&choice, keep, |_| false))
}

impl Router for ShortestRouter {
    fn id(&self) -> RouterId {
        self.config.id
    }

    fn strategy(&self) -> RoutingStrategy {
        self.config.strategy
    }

    fn config(&self) -> &RouterConfig {
        &self.config
    }

    fn init(&mut self, building: &Building) -> RouterResult<()> {
        let graph = DoorGraph::capture(building, self.config.has_specific_goals, |topo| {
            Ok(visibility_matrix(topo))
        })?;
        tracing::debug!(
            router = self.config.id.0,
            strategy = %self.config.strategy,
            nodes = graph.matrix.len(),
            "door graph built"
        );
        self.graph = Some(graph);
        Ok(())
    }

    fn is_initialised(&self) -> bool {
        self.graph.is_some()
    }

    fn find_exit(&self, ped: &Pedestrian, _ctx: &RouteContext<'_>) -> Option<SegmentUid> {
        shortest_choice(self.graph.as_ref()?, ped, self.visible_only())
    }

    fn cost_matrix(&self) -> Option<&CostMatrix> {
        self.graph.as_ref().map(|g| &g.matrix)
    }
}
