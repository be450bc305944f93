//! Door-configuration fingerprint.

use std::fmt;

use nav_core::SegmentId;

use crate::Building;

/// Canonical key of a door configuration: the ascending semantic IDs of all
/// segments that are not `Closed`, joined by `:`.
///
/// `TempClosed` doors count as routable and are part of the key, so a door
/// that is only temporarily blocked maps to the same engine as when open.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(building: &Building) -> Self {
        Self::from_ids(building.segments().iter().filter(|s| s.is_routable()).map(|s| s.id))
    }

    /// Build from an arbitrary set of routable IDs (order and duplicates do
    /// not matter).
    pub fn from_ids(ids: impl IntoIterator<Item = SegmentId>) -> Self {
        let mut ids: Vec<u32> = ids.into_iter().map(|id| id.0).collect();
        ids.sort_unstable();
        ids.dedup();
        let joined = ids.iter().map(u32::to_string).collect::<Vec<_>>().join(":");
        Fingerprint(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0)
    }
}
