use thiserror::Error;

use nav_core::RoomId;

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("room {0} not found")]
    UnknownRoom(RoomId),

    #[error("room {0} has no subrooms to rasterize")]
    EmptyRoom(RoomId),

    #[error("grid resolution must be positive, got {0}")]
    InvalidResolution(f64),

    #[error("grid of {cells} cells exceeds the limit of {limit}")]
    GridTooLarge { cells: usize, limit: usize },
}

pub type FieldResult<T> = Result<T, FieldError>;
