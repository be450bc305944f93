//! Per-router configuration.

use nav_core::RouterId;
use nav_field::FloorFieldConfig;

use crate::{ExitStrategy, RouterError, RouterResult, RoutingStrategy};

// ── QuickestConfig ────────────────────────────────────────────────────────────

/// Tuning of the congestion-aware routers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct QuickestConfig {
    /// Minimum cost-benefit score before a pedestrian is redirected.
    pub cba_gain: f64,
    /// Congestion degree above which a pedestrian looks for another exit.
    pub congestion_ratio: f64,
    /// Subrooms holding at most this many pedestrians are never congested.
    pub visibility_obstruction: usize,
    /// Flow through one metre of door width, in pedestrians per second.
    pub specific_flow: f64,
    /// Radius around a door used to measure local density, metres.
    pub density_radius: f64,
    /// Lower bound of the density-based speed, as a fraction of `v0`.
    pub min_speed_factor: f64,
}

impl Default for QuickestConfig {
    fn default() -> Self {
        Self {
            cba_gain:               0.15,
            congestion_ratio:       0.5,
            visibility_obstruction: 4,
            specific_flow:          1.3,
            density_radius:         2.0,
            min_speed_factor:       0.1,
        }
    }
}

// ── RouterConfig ──────────────────────────────────────────────────────────────

/// Everything needed to build one router.  An engine keeps these so it can
/// rebuild identical routers for another door configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouterConfig {
    pub id:            RouterId,
    pub strategy:      RoutingStrategy,
    pub exit_strategy: ExitStrategy,
    /// Seconds a quickest router sticks with a target before re-evaluating.
    #[cfg_attr(feature = "serde", serde(default = "default_recalc_interval"))]
    pub recalc_interval: f64,
    /// Pedestrians carry explicit goals; every goal must map to an exit.
    #[cfg_attr(feature = "serde", serde(default))]
    pub has_specific_goals: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub floor_field: FloorFieldConfig,
    #[cfg_attr(feature = "serde", serde(default))]
    pub quickest: QuickestConfig,
}

pub const DEFAULT_RECALC_INTERVAL: f64 = 3.0;

#[cfg(feature = "serde")]
fn default_recalc_interval() -> f64 {
    DEFAULT_RECALC_INTERVAL
}

impl RouterConfig {
    pub fn new(id: RouterId, strategy: RoutingStrategy) -> Self {
        Self {
            id,
            strategy,
            exit_strategy:      strategy.default_exit_strategy(),
            recalc_interval:    DEFAULT_RECALC_INTERVAL,
            has_specific_goals: false,
            floor_field:        FloorFieldConfig::default(),
            quickest:           QuickestConfig::default(),
        }
    }

    pub fn with_exit_strategy(mut self, exit: ExitStrategy) -> Self {
        self.exit_strategy = exit;
        self
    }

    pub fn with_recalc_interval(mut self, secs: f64) -> Self {
        self.recalc_interval = secs;
        self
    }

    pub fn with_specific_goals(mut self, on: bool) -> Self {
        self.has_specific_goals = on;
        self
    }

    pub fn with_floor_field(mut self, cfg: FloorFieldConfig) -> Self {
        self.floor_field = cfg;
        self
    }

    pub fn with_quickest(mut self, cfg: QuickestConfig) -> Self {
        self.quickest = cfg;
        self
    }

    /// Reject inconsistent settings before any router is built.
    pub fn validate(&self) -> RouterResult<()> {
        if !self.id.is_valid() {
            return Err(RouterError::Config("router id must be valid".into()));
        }
        self.strategy.check_exit_strategy(self.exit_strategy)?;

        if !(self.recalc_interval.is_finite() && self.recalc_interval >= 0.0) {
            return Err(RouterError::Config(format!(
                "recalc_interval must be a non-negative number, got {}",
                self.recalc_interval
            )));
        }
        let h = self.floor_field.delta_h;
        if self.strategy.uses_floor_field() && !(h.is_finite() && h > 0.0) {
            return Err(RouterError::Config(format!(
                "floor field resolution must be positive, got {h}"
            )));
        }
        let q = &self.quickest;
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(q.specific_flow) || !positive(q.density_radius) {
            return Err(RouterError::Config(format!(
                "specific_flow and density_radius must be positive, got {} and {}",
                q.specific_flow, q.density_radius
            )));
        }
        if !q.cba_gain.is_finite() || !q.congestion_ratio.is_finite() {
            return Err(RouterError::Config(
                "cba_gain and congestion_ratio must be finite".into(),
            ));
        }
        if !(0.0..=1.0).contains(&q.min_speed_factor) || q.min_speed_factor == 0.0 {
            return Err(RouterError::Config(format!(
                "min_speed_factor must lie in (0, 1], got {}",
                q.min_speed_factor
            )));
        }
        Ok(())
    }
}
