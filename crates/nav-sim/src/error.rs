use thiserror::Error;

use nav_building::{BuildingError, Fingerprint};
use nav_events::EventError;
use nav_router::RouterError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match pedestrian count {expected}")]
    PedCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("building the routing engine for {fingerprint} failed: {source}")]
    EngineBuild {
        fingerprint: Fingerprint,
        #[source]
        source:      RouterError,
    },

    #[error(transparent)]
    Router(#[from] RouterError),

    #[error(transparent)]
    Building(#[from] BuildingError),

    #[error(transparent)]
    Event(#[from] EventError),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

pub type SimResult<T> = Result<T, SimError>;
