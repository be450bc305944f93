use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("event parse error: {0}")]
    Parse(String),

    #[error("unknown event action {0:?}")]
    UnknownAction(String),

    #[error("event time must be finite and non-negative, got {0}")]
    InvalidTime(f64),

    #[error("schedule times reference unknown group {0}")]
    UnknownGroup(u32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type EventResult<T> = Result<T, EventError>;
