//! Dispatch of pedestrians to their routers.

use std::fmt;

use nav_agent::Pedestrian;
use nav_building::Building;
use nav_core::{RouterId, SegmentUid};

use crate::context::RouteContext;
use crate::router::{build_router, Router};
use crate::{RouterConfig, RouterError, RouterResult, RoutingStrategy};

/// An ordered set of routers for one door configuration.
///
/// The engine remembers the configs its routers came from, so
/// [`fresh`](Self::fresh) can produce an identical, uninitialised engine for
/// another configuration.  After a successful [`init`](Self::init) the engine
/// is only read.
#[derive(Default)]
pub struct RoutingEngine {
    configs:     Vec<RouterConfig>,
    routers:     Vec<Box<dyn Router>>,
    initialised: bool,
}

impl RoutingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine holding one router per config, in order.
    pub fn from_configs(configs: impl IntoIterator<Item = RouterConfig>) -> RouterResult<Self> {
        let mut engine = Self::new();
        for cfg in configs {
            engine.add_router(cfg)?;
        }
        Ok(engine)
    }

    /// Register a router.  Its id must be unique within the engine.
    pub fn add_router(&mut self, config: RouterConfig) -> RouterResult<()> {
        if self.configs.iter().any(|c| c.id == config.id) {
            return Err(RouterError::DuplicateRouter(config.id));
        }
        let router = build_router(config.clone())?;
        self.configs.push(config);
        self.routers.push(router);
        self.initialised = false;
        Ok(())
    }

    /// Initialise every router against `building`, stopping at the first
    /// failure.
    pub fn init(&mut self, building: &Building) -> RouterResult<()> {
        if self.routers.is_empty() {
            return Err(RouterError::Config("engine has no routers".into()));
        }
        for r in &mut self.routers {
            r.init(building)?;
        }
        self.initialised = true;
        tracing::debug!(
            routers = self.routers.len(),
            fingerprint = %building.fingerprint(),
            "routing engine initialised"
        );
        Ok(())
    }

    /// `fresh()` followed by `init(building)`.
    pub fn build_for(&self, building: &Building) -> RouterResult<Self> {
        let mut engine = self.fresh()?;
        engine.init(building)?;
        Ok(engine)
    }

    /// A new, uninitialised engine with the same router configs.
    pub fn fresh(&self) -> RouterResult<Self> {
        Self::from_configs(self.configs.iter().cloned())
    }

    pub fn is_initialised(&self) -> bool {
        self.initialised
    }

    pub fn configs(&self) -> &[RouterConfig] {
        &self.configs
    }

    pub fn len(&self) -> usize {
        self.routers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }

    pub fn router(&self, id: RouterId) -> Option<&dyn Router> {
        self.routers.iter().find(|r| r.id() == id).map(|r| r.as_ref())
    }

    /// First router running `strategy`.
    pub fn router_by_strategy(&self, strategy: RoutingStrategy) -> Option<&dyn Router> {
        self.routers.iter().find(|r| r.strategy() == strategy).map(|r| r.as_ref())
    }

    /// Ask `ped`'s router for a target without touching `ped`.
    pub fn decide(&self, ped: &Pedestrian, ctx: &RouteContext<'_>) -> RouterResult<Option<SegmentUid>> {
        if !self.initialised {
            return Err(RouterError::NotInitialised(ped.router));
        }
        let router = self.router(ped.router).ok_or(RouterError::UnknownRouter(ped.router))?;
        let exit = router.find_exit(ped, ctx);
        if exit.is_none() {
            tracing::warn!(
                ped = ped.id.0,
                router = ped.router.0,
                room = ped.room.0,
                subroom = ped.subroom.0,
                "no route to any final segment"
            );
        }
        Ok(exit)
    }

    /// [`decide`](Self::decide), then write the result onto `ped`.
    pub fn find_route(&self, ped: &mut Pedestrian, ctx: &RouteContext<'_>) -> RouterResult<Option<SegmentUid>> {
        let exit = self.decide(ped, ctx)?;
        ped.set_route(exit, ctx.time);
        Ok(exit)
    }
}

impl fmt::Debug for RoutingEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingEngine")
            .field("routers", &self.configs.iter().map(|c| (c.id, c.strategy)).collect::<Vec<_>>())
            .field("initialised", &self.initialised)
            .finish()
    }
}
