//! What a pedestrian believes about door states.
//!
//! Entries come from direct observation (quality 1.0) or from another
//! pedestrian (quality decayed per hop).  Hearsay is accepted
//! probabilistically; a refusal sticks until strictly newer information about
//! the same door is offered.

use std::collections::BTreeMap;

use nav_core::{PedRng, SegmentId};

/// Tunable gossip policy.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KnowledgeConfig {
    /// A pedestrian this close to a door observes its state.  Default: 2.0 m.
    pub observe_radius: f64,
    /// Pedestrians in the same subroom this close exchange knowledge.
    /// Default: 1.0 m.
    pub merge_radius:   f64,
    /// Entries below this quality are neither offered nor counted in the
    /// knowledge key.  Default: 0.2.
    pub min_quality:    f64,
    /// Acceptance probability for a pedestrian with zero risk tolerance.
    /// Default: 1.0.
    pub acceptance:     f64,
    /// Factor applied to an entry's quality each time it is passed on.
    /// Default: 0.8.
    pub quality_decay:  f64,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            observe_radius: 2.0,
            merge_radius:   1.0,
            min_quality:    0.2,
            acceptance:     1.0,
            quality_decay:  0.8,
        }
    }
}

impl KnowledgeConfig {
    /// Name of the first setting that is not a finite number in range.
    pub fn invalid_setting(&self) -> Option<&'static str> {
        let unit = |v: f64| (0.0..=1.0).contains(&v);
        let non_negative = |v: f64| v.is_finite() && v >= 0.0;
        [
            ("observe_radius", non_negative(self.observe_radius)),
            ("merge_radius", non_negative(self.merge_radius)),
            ("min_quality", unit(self.min_quality)),
            ("acceptance", unit(self.acceptance)),
            ("quality_decay", unit(self.quality_decay)),
        ]
        .into_iter()
        .find_map(|(name, ok)| (!ok).then_some(name))
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KnowledgeEntry {
    pub closed:  bool,
    /// Simulated time the information was first observed.
    pub time:    f64,
    pub quality: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Accepted; `changed` is true if the door's believed state flipped (or
    /// was previously unknown).
    Accepted { changed: bool },
    Refused,
    /// Not newer than what is already known or refused, or too low quality.
    Ignored,
}

#[derive(Clone, Debug, Default)]
pub struct Knowledge {
    entries: BTreeMap<SegmentId, KnowledgeEntry>,
    /// Door → time of the newest refused offer.
    refused: BTreeMap<SegmentId, f64>,
}

impl Knowledge {
    pub fn get(&self, door: SegmentId) -> Option<&KnowledgeEntry> {
        self.entries.get(&door)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the pedestrian believes `door` is closed.
    pub fn believes_closed(&self, door: SegmentId) -> bool {
        self.entries.get(&door).is_some_and(|e| e.closed)
    }

    /// Record a first-hand observation.  Returns `true` if the believed
    /// state changed.
    pub fn observe(&mut self, door: SegmentId, closed: bool, time: f64) -> bool {
        self.refused.remove(&door);
        let prev = self.entries.insert(door, KnowledgeEntry { closed, time, quality: 1.0 });
        prev.is_none_or(|p| p.closed != closed)
    }

    /// Consider one piece of hearsay.
    pub fn offer(
        &mut self,
        door:  SegmentId,
        entry: KnowledgeEntry,
        risk_tolerance: f64,
        rng:   &mut PedRng,
        cfg:   &KnowledgeConfig,
    ) -> MergeOutcome {
        if entry.quality < cfg.min_quality {
            return MergeOutcome::Ignored;
        }
        let known = self.entries.get(&door).copied();
        if known.is_some_and(|k| entry.time <= k.time) {
            return MergeOutcome::Ignored;
        }
        if self.refused.get(&door).is_some_and(|&t| entry.time <= t) {
            return MergeOutcome::Ignored;
        }

        let p = cfg.acceptance * (1.0 - risk_tolerance.clamp(0.0, 1.0));
        if rng.gen_bool(p) {
            self.refused.remove(&door);
            self.entries.insert(
                door,
                KnowledgeEntry { quality: entry.quality * cfg.quality_decay, ..entry },
            );
            MergeOutcome::Accepted { changed: known.is_none_or(|k| k.closed != entry.closed) }
        } else {
            self.refused.insert(door, entry.time);
            MergeOutcome::Refused
        }
    }

    /// Entries worth passing on, ascending by door.
    pub fn offers(&self, min_quality: f64) -> Vec<(SegmentId, KnowledgeEntry)> {
        self.entries
            .iter()
            .filter(|(_, e)| e.quality >= min_quality)
            .map(|(&d, &e)| (d, e))
            .collect()
    }

    /// Known-closed doors with sufficient quality, ascending, joined by `:`.
    pub fn key(&self, min_quality: f64) -> String {
        self.entries
            .iter()
            .filter(|(_, e)| e.closed && e.quality >= min_quality)
            .map(|(d, _)| d.0.to_string())
            .collect::<Vec<_>>()
            .join(":")
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.refused.clear();
    }
}
