//! Routers that measure walking distance on per-room floor fields.

use std::collections::BTreeMap;

use nav_agent::Pedestrian;
use nav_building::Building;
use nav_core::{Point, RoomId, RouterId, SegmentUid};
use nav_field::RoomFields;

use crate::context::RouteContext;
use crate::graph::{floor_field_matrix, CostMatrix};
use crate::router::{Choice, DoorGraph, Router};
use crate::{RouterConfig, RouterResult, RoutingStrategy};

/// Weidmann fundamental diagram: shape factor.
const WEIDMANN_GAMMA: f64 = 1.913;
/// Weidmann fundamental diagram: jam density, persons per m².
const WEIDMANN_RHO_MAX: f64 = 5.4;
/// A held FfQuickest target is dropped once the pedestrian is this close to it.
const HOLD_DISTANCE: f64 = 3.0;

/// Walking speed at density `rho` for free speed `v0`.
pub fn weidmann_speed(v0: f64, rho: f64) -> f64 {
    if rho <= 0.0 {
        return v0;
    }
    if rho >= WEIDMANN_RHO_MAX {
        return 0.0;
    }
    v0 * (1.0 - (-WEIDMANN_GAMMA * (1.0 / rho - 1.0 / WEIDMANN_RHO_MAX)).exp())
}

#[derive(Debug)]
struct FieldState {
    graph:  DoorGraph,
    fields: BTreeMap<RoomId, RoomFields>,
}

/// `FfGlobalShortest`, `FfLocalShortest` and `FfQuickest`.
#[derive(Debug)]
pub struct FloorFieldRouter {
    config: RouterConfig,
    state:  Option<FieldState>,
}

impl FloorFieldRouter {
    pub fn new(config: RouterConfig) -> Self {
        Self { config, state: None }
    }

    /// Fields of `room`, once initialised.
    pub fn room_fields(&self, room: RoomId) -> Option<&RoomFields> {
        self.state.as_ref()?.fields.get(&room)
    }

    /// Density-based speed near `uid` for `ped`, clamped to
    /// `[min_speed_factor · v0, v0]`.
    fn local_speed(
        &self,
        ped:    &Pedestrian,
        uid:    SegmentUid,
        centre: Point,
        ctx:    &RouteContext<'_>,
    ) -> f64 {
        let q = &self.config.quickest;
        let r = q.density_radius;
        let count = ctx
            .near(ped.room, centre, r)
            .filter(|o| o.id != ped.id)
            .count();
        let rho = count as f64 / (std::f64::consts::PI * r * r);
        let v = weidmann_speed(ped.v0, rho).clamp(q.min_speed_factor * ped.v0, ped.v0);
        tracing::trace!(ped = ped.id.0, segment = uid.0, rho, v, "local speed");
        v
    }

    /// The target chosen less than `recalc_interval` ago, while it is still
    /// more than [`HOLD_DISTANCE`] away and still the next step out of the
    /// pedestrian's room.  A door just walked through fails the second test.
    fn held_exit(
        &self,
        graph: &DoorGraph,
        rf:    &RoomFields,
        ped:   &Pedestrian,
        now:   f64,
    ) -> Option<SegmentUid> {
        let e = ped.exit?;
        let seg = graph.topo.segment(e)?;
        if ped.since_last_route(now) >= self.config.recalc_interval
            || !seg.routable
            || !seg.touches_room(ped.room)
            || rf.cost_to(e, ped.pos) <= HOLD_DISTANCE
        {
            return None;
        }
        let (goal, cost) = graph.matrix.nearest_of(e, graph.finals.for_ped(ped))?;
        let topo = &graph.topo;
        let settled = graph.advance(
            &Choice { via: e, goal, cost },
            |n| topo.segment(n).is_some_and(|s| s.touches_room(ped.room)),
            |n| topo.segment(n).is_some_and(|s| s.transition),
        );
        (settled == e).then_some(e)
    }
}

impl Router for FloorFieldRouter {
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
        let cfg = &self.config.floor_field;
        let mut fields = BTreeMap::new();
        for room in building.rooms() {
            fields.insert(room.id, RoomFields::build(building, room.id, cfg)?);
        }
        let graph = DoorGraph::capture(building, self.config.has_specific_goals, |topo| {
            Ok(floor_field_matrix(topo, fields.values(), cfg.delta_h))
        })?;
        tracing::debug!(
            router = self.config.id.0,
            strategy = %self.config.strategy,
            rooms = fields.len(),
            nodes = graph.matrix.len(),
            "floor-field door graph built"
        );
        self.state = Some(FieldState { graph, fields });
        Ok(())
    }

    fn is_initialised(&self) -> bool {
        self.state.is_some()
    }

    fn find_exit(&self, ped: &Pedestrian, ctx: &RouteContext<'_>) -> Option<SegmentUid> {
        let FieldState { graph, fields } = self.state.as_ref()?;
        let finals = graph.finals.for_ped(ped);
        if finals.is_empty() {
            return None;
        }
        let rf = fields.get(&ped.room)?;
        let topo = &graph.topo;
        let in_room = |n: SegmentUid| topo.segment(n).is_some_and(|s| s.touches_room(ped.room));
        let is_transition = |n: SegmentUid| topo.segment(n).is_some_and(|s| s.transition);

        match self.config.strategy {
            RoutingStrategy::FfLocalShortest => {
                let choice = graph.best_route(
                    topo.subroom_segments(ped.subroom).iter().copied(),
                    finals,
                    |c| rf.cost_to(c, ped.pos),
                )?;
                let borders = |n: SegmentUid| topo.segment(n).is_some_and(|s| s.borders(ped.subroom));
                Some(graph.advance(&choice, borders, |_| false))
            }
            RoutingStrategy::FfQuickest => {
                if let Some(e) = self.held_exit(graph, rf, ped, ctx.time) {
                    return Some(e);
                }
                let v0 = ped.v0.max(f64::EPSILON);
                let choice = graph.best_route(
                    topo.room_segments(ped.room).iter().copied(),
                    finals,
                    |c| {
                        let Some(centre) = topo.centre(c) else { return f64::INFINITY };
                        rf.cost_to(c, ped.pos) * v0 / self.local_speed(ped, c, centre, ctx)
                    },
                )?;
                Some(graph.advance(&choice, in_room, is_transition))
            }
            _ => {
                let choice = graph.best_route(
                    topo.room_segments(ped.room).iter().copied(),
                    finals,
                    |c| rf.cost_to(c, ped.pos),
                )?;
                Some(graph.advance(&choice, in_room, is_transition))
            }
        }
    }

    fn cost_matrix(&self) -> Option<&CostMatrix> {
        self.state.as_ref().map(|s| &s.graph.matrix)
    }
}
