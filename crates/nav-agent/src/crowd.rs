//! Crowd assembly and per-pedestrian RNG storage.
//!
//! RNGs live apart from the `Pedestrian`s so the gossip pass can hold
//! `&mut PedRngs` while reading positions from `&[Pedestrian]`.

use std::ops::Range;

use nav_core::{PedId, PedRng, SimRng};

use crate::Pedestrian;

// ── PedRngs ───────────────────────────────────────────────────────────────────

pub struct PedRngs {
    pub inner: Vec<PedRng>,
}

impl PedRngs {
    pub fn new(count: usize, global_seed: u64) -> Self {
        let inner = (0..count as u32).map(|i| PedRng::new(global_seed, PedId(i))).collect();
        Self { inner }
    }

    #[inline]
    pub fn get_mut(&mut self, ped: PedId) -> &mut PedRng {
        &mut self.inner[ped.index()]
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── CrowdBuilder ──────────────────────────────────────────────────────────────

/// Collect pedestrians, renumber them densely, and seed their RNGs.
///
/// ```rust
/// use nav_agent::{CrowdBuilder, Pedestrian};
/// use nav_core::{PedId, Point, RoomId, SubRoomId};
///
/// let (peds, rngs) = CrowdBuilder::new(42)
///     .add(Pedestrian::new(PedId::INVALID, Point::new(1.0, 1.0), RoomId(0), SubRoomId(0)))
///     .add(Pedestrian::new(PedId::INVALID, Point::new(2.0, 1.0), RoomId(0), SubRoomId(0)))
///     .risk_tolerance(0.0..0.5)
///     .build();
/// assert_eq!(peds[1].id, PedId(1));
/// assert_eq!(rngs.len(), 2);
/// assert!(peds.iter().all(|p| (0.0..0.5).contains(&p.risk_tolerance)));
/// ```
pub struct CrowdBuilder {
    seed: u64,
    peds: Vec<Pedestrian>,
    risk: Option<Range<f64>>,
}

impl CrowdBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed, peds: Vec::new(), risk: None }
    }

    pub fn add(mut self, ped: Pedestrian) -> Self {
        self.peds.push(ped);
        self
    }

    pub fn extend(mut self, peds: impl IntoIterator<Item = Pedestrian>) -> Self {
        self.peds.extend(peds);
        self
    }

    /// Draw each pedestrian's risk tolerance uniformly from `range`.
    /// Without this, the values set on the pedestrians are kept.
    pub fn risk_tolerance(mut self, range: Range<f64>) -> Self {
        self.risk = Some(range);
        self
    }

    pub fn build(mut self) -> (Vec<Pedestrian>, PedRngs) {
        let mut sim_rng = SimRng::new(self.seed);
        for (i, ped) in self.peds.iter_mut().enumerate() {
            ped.id = PedId(i as u32);
            if let Some(r) = self.risk.as_ref().filter(|r| r.start < r.end) {
                ped.risk_tolerance = sim_rng.gen_range(r.clone());
            }
        }
        let rngs = PedRngs::new(self.peds.len(), self.seed);
        (self.peds, rngs)
    }
}
