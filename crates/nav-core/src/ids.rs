//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.
//!
//! Segments carry two identifiers: the semantic [`SegmentId`] that events,
//! schedules and goals refer to, and the dense [`SegmentUid`] the building
//! assigns at construction time and that every graph and raster indexes by.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Semantic ID of a navigable segment, as used by events and schedules.
    pub struct SegmentId(u32);
}

typed_id! {
    /// Dense arena index of a navigable segment inside one `Building`.
    pub struct SegmentUid(u32);
}

typed_id! {
    /// Index of a room.
    pub struct RoomId(u32);
}

typed_id! {
    /// Building-wide index of a subroom (unique across rooms).
    pub struct SubRoomId(u32);
}

typed_id! {
    /// Index of a pedestrian in the crowd.
    pub struct PedId(u32);
}

typed_id! {
    /// Numeric ID of a configured router.  Pedestrians are assigned one.
    pub struct RouterId(u32);
}

typed_id! {
    /// ID of a final goal outside the building.
    pub struct GoalId(u32);
}
