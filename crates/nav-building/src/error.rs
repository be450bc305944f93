//! Building-model error type.

use thiserror::Error;

use nav_core::{RoomId, SegmentId, SubRoomId};

/// Errors produced while assembling or mutating a [`Building`](crate::Building).
#[derive(Debug, Error)]
pub enum BuildingError {
    #[error("room {0} not found")]
    UnknownRoom(RoomId),

    #[error("subroom {0} not found")]
    UnknownSubRoom(SubRoomId),

    #[error("segment {0} not found")]
    UnknownSegment(SegmentId),

    #[error("segment {0} defined twice")]
    DuplicateSegment(SegmentId),

    #[error("crossing {id} joins subrooms of different rooms ({a} and {b}); use a transition")]
    CrossingSpansRooms { id: SegmentId, a: SubRoomId, b: SubRoomId },

    #[error("segment {id}: outflow rate must be positive, got {rate}")]
    InvalidOutflowRate { id: SegmentId, rate: f64 },

    #[error("subroom {0} has fewer than three polygon vertices")]
    DegeneratePolygon(SubRoomId),
}

pub type BuildingResult<T> = Result<T, BuildingError>;
