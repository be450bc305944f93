//! Fluent builder for constructing a [`Sim`].

use std::path::PathBuf;
use std::sync::Arc;

use nav_agent::{KnowledgeConfig, PedRngs, Pedestrian};
use nav_building::Building;
use nav_core::{PedId, SimConfig};
use nav_events::{DoorSchedule, Event};
use nav_router::{RouterConfig, RoutingEngine};

use crate::{EngineCache, EventManager, KnowledgeExchange, Sim, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`]: total ticks, seed, step duration, …
/// - [`Building`]: in its initial door configuration
/// - pedestrians + [`PedRngs`]: from [`nav_agent::CrowdBuilder`]
/// - one [`RouterConfig`] per router referenced by a pedestrian
///
/// # Optional inputs
///
/// | Method            | Default                         |
/// |-------------------|---------------------------------|
/// | `.events(v)`      | no scripted door events         |
/// | `.schedule(s)`    | no door schedule                |
/// | `.feed(path)`     | no live feed                    |
/// | `.knowledge(cfg)` | gossip layer disabled           |
/// | `.cache(c)`       | a fresh, unshared `EngineCache` |
///
/// # Example
///
/// ```rust,ignore
/// let (peds, rngs) = CrowdBuilder::new(seed).extend(peds).build();
/// let mut sim = SimBuilder::new(config, building, peds, rngs, vec![router])
///     .events(load_events_csv(path)?)
///     .knowledge(KnowledgeConfig::default())
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:    SimConfig,
    building:  Building,
    peds:      Vec<Pedestrian>,
    rngs:      PedRngs,
    routers:   Vec<RouterConfig>,
    events:    Vec<Event>,
    schedule:  Option<DoorSchedule>,
    feed:      Option<PathBuf>,
    knowledge: Option<KnowledgeConfig>,
    cache:     Option<Arc<EngineCache>>,
}

impl SimBuilder {
    /// Create a builder with all required inputs.
    pub fn new(
        config:   SimConfig,
        building: Building,
        peds:     Vec<Pedestrian>,
        rngs:     PedRngs,
        routers:  Vec<RouterConfig>,
    ) -> Self {
        Self {
            config,
            building,
            peds,
            rngs,
            routers,
            events:    Vec::new(),
            schedule:  None,
            feed:      None,
            knowledge: None,
            cache:     None,
        }
    }

    /// Scripted door events.  May be called repeatedly; events accumulate.
    pub fn events(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.events.extend(events);
        self
    }

    /// A door schedule.  Its `max_agents` limits are applied to the
    /// building and its openings are expanded into events.
    pub fn schedule(mut self, schedule: DoorSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Poll a text file for `door <id> <state>` lines every step.
    pub fn feed(mut self, path: impl Into<PathBuf>) -> Self {
        self.feed = Some(path.into());
        self
    }

    /// Enable observation and gossip between pedestrians.
    pub fn knowledge(mut self, cfg: KnowledgeConfig) -> Self {
        self.knowledge = Some(cfg);
        self
    }

    /// Share an engine cache with other simulations of the same building.
    pub fn cache(mut self, cache: Arc<EngineCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Validate inputs, build the initial engine, and return a ready-to-run
    /// [`Sim`].
    pub fn build(mut self) -> SimResult<Sim> {
        let ped_count = self.peds.len();

        // ── Validate ──────────────────────────────────────────────────────
        if self.rngs.len() != ped_count {
            return Err(SimError::PedCountMismatch {
                expected: ped_count,
                got:      self.rngs.len(),
                what:     "pedestrian RNGs",
            });
        }
        if let Some((i, p)) = self.peds.iter().enumerate().find(|(i, p)| p.id != PedId(*i as u32)) {
            return Err(SimError::Config(format!("pedestrian at index {i} has id {}", p.id.0)));
        }
        if !self.config.dt_secs.is_finite() || self.config.dt_secs <= 0.0 {
            return Err(SimError::Config(format!("dt_secs must be positive, got {}", self.config.dt_secs)));
        }

        if let Some(name) = self.knowledge.as_ref().and_then(KnowledgeConfig::invalid_setting) {
            return Err(SimError::Config(format!("knowledge setting {name} is out of range")));
        }

        let template = RoutingEngine::from_configs(self.routers)?;
        if let Some(p) = self.peds.iter().find(|p| template.configs().iter().all(|c| c.id != p.router)) {
            return Err(SimError::Config(format!("pedestrian {} uses undefined router {}", p.id.0, p.router.0)));
        }

        // ── Door events ───────────────────────────────────────────────────
        let mut events = self.events;
        if let Some(schedule) = &self.schedule {
            for (segment, max) in schedule.usage_limits() {
                self.building.segment_by_id_mut(segment)?.max_usage = Some(max);
            }
            events.extend(schedule.expand()?);
        }
        for e in &events {
            e.validated()?;
        }

        // ── Engine ────────────────────────────────────────────────────────
        let clock = self.config.make_clock();
        let cache = self.cache.unwrap_or_default();
        let mut manager = EventManager::new(template, &self.building, clock.clone(), cache)?;
        manager.extend(events);
        if let Some(path) = self.feed {
            manager.watch_feed(path);
        }
        manager.attach(&mut self.peds);

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| SimError::Config(e.to_string()))?,
            ),
            None => None,
        };

        tracing::debug!(
            pedestrians = ped_count,
            pending_events = manager.pending(),
            fingerprint = %manager.fingerprint(),
            "simulation built"
        );

        Ok(Sim {
            config:   self.config,
            clock,
            building: self.building,
            peds:     self.peds,
            rngs:     self.rngs,
            events:   manager,
            gossip:   self.knowledge.map(KnowledgeExchange::new),
            #[cfg(feature = "parallel")]
            pool,
        })
    }
}
