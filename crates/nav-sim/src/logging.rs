//! `tracing` subscriber setup for binaries and examples.

use tracing_subscriber::EnvFilter;

use crate::{SimError, SimResult};

/// Install a global fmt subscriber.  `RUST_LOG` wins when set; otherwise
/// `default_directive` (e.g. `"nav_sim=info,nav_router=warn"`) is used.
///
/// Fails if the directive does not parse or a global subscriber is
/// already installed.
pub fn init(default_directive: &str) -> SimResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => EnvFilter::try_new(default_directive).map_err(|e| SimError::Logging(e.to_string()))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| SimError::Logging(e.to_string()))
}
