//! The `Router` trait and the selection logic its implementations share.

use nav_agent::Pedestrian;
use nav_building::Building;
use nav_core::{RouterId, SegmentUid};

use crate::context::RouteContext;
use crate::floorfield::FloorFieldRouter;
use crate::graph::CostMatrix;
use crate::quickest::QuickestRouter;
use crate::shortest::ShortestRouter;
use crate::topology::{Finals, Topology};
use crate::{RouterConfig, RouterResult, RoutingStrategy};

// ── Router trait ──────────────────────────────────────────────────────────────

/// A routing strategy bound to one door configuration.
///
/// `init` runs once against a building snapshot; afterwards `find_exit` is a
/// pure query and may be called from many threads at once.
pub trait Router: Send + Sync {
    fn id(&self) -> RouterId;

    fn strategy(&self) -> RoutingStrategy;

    fn config(&self) -> &RouterConfig;

    /// Build graphs and fields for the building's current door states.
    fn init(&mut self, building: &Building) -> RouterResult<()>;

    fn is_initialised(&self) -> bool;

    /// Next target segment for `ped`, or `None` if no final is reachable.
    fn find_exit(&self, ped: &Pedestrian, ctx: &RouteContext<'_>) -> Option<SegmentUid>;

    /// The closed door graph, once initialised.
    fn cost_matrix(&self) -> Option<&CostMatrix>;
}

/// Validate `config` and instantiate the router it names.
pub fn build_router(config: RouterConfig) -> RouterResult<Box<dyn Router>> {
    config.validate()?;
    Ok(match config.strategy {
        RoutingStrategy::GlobalShortest | RoutingStrategy::LocalShortest => {
            Box::new(ShortestRouter::new(config))
        }
        RoutingStrategy::Quickest => Box::new(QuickestRouter::new(config)),
        RoutingStrategy::FfGlobalShortest
        | RoutingStrategy::FfLocalShortest
        | RoutingStrategy::FfQuickest => Box::new(FloorFieldRouter::new(config)),
    })
}

// ── DoorGraph ─────────────────────────────────────────────────────────────────

/// Captured topology, finals and closed cost matrix of one configuration.
#[derive(Clone, Debug)]
pub struct DoorGraph {
    pub topo:   Topology,
    pub finals: Finals,
    pub matrix: CostMatrix,
}

/// Best candidate found by [`DoorGraph::best_route`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Choice {
    pub via:   SegmentUid,
    pub goal:  SegmentUid,
    pub cost:  f64,
}

impl DoorGraph {
    /// Capture `building` and resolve its finals; the matrix is built by the
    /// caller from the captured topology.
    pub(crate) fn capture(
        building:           &Building,
        has_specific_goals: bool,
        matrix:             impl FnOnce(&Topology) -> RouterResult<CostMatrix>,
    ) -> RouterResult<Self> {
        let topo = Topology::capture(building);
        let finals = Finals::resolve(building, &topo, has_specific_goals)?;
        let matrix = matrix(&topo)?;
        Ok(Self { topo, finals, matrix })
    }

    /// Minimise `local(c) + D[c][f]` over candidates `c` and finals `f`.
    /// Candidates must be ascending; ties keep the first (lowest UID).
    pub(crate) fn best_route(
        &self,
        candidates: impl IntoIterator<Item = SegmentUid>,
        finals:     &[SegmentUid],
        local:      impl Fn(SegmentUid) -> f64,
    ) -> Option<Choice> {
        let mut best: Option<Choice> = None;
        for c in candidates {
            let lc = local(c);
            if !lc.is_finite() {
                continue;
            }
            let Some((goal, d)) = self.matrix.nearest_of(c, finals) else { continue };
            let cost = lc + d;
            if best.is_none_or(|b| cost < b.cost) {
                best = Some(Choice { via: c, goal, cost });
            }
        }
        best
    }

    /// Follow next-hop pointers from `choice.via` toward its final while the
    /// next segment satisfies `keep`.  Once a segment satisfying `stop` is
    /// reached (past the first), the walk ends there.
    pub(crate) fn advance(
        &self,
        choice: &Choice,
        keep:   impl Fn(SegmentUid) -> bool,
        stop:   impl Fn(SegmentUid) -> bool,
    ) -> SegmentUid {
        let mut cur = choice.via;
        for _ in 0..self.matrix.len() {
            if cur != choice.via && stop(cur) {
                break;
            }
            match self.matrix.next_hop(cur, choice.goal) {
                Some(n) if n != cur && keep(n) => cur = n,
                _ => break,
            }
        }
        cur
    }
}
