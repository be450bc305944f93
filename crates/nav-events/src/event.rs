//! Door events.

use std::fmt;
use std::str::FromStr;

use nav_core::SegmentId;

use crate::{EventError, EventResult};

/// What an event does to its door.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventAction {
    Open,
    Close,
    TempClose,
    /// Clear usage counters and reopen a door closed by its usage limit.
    ResetUsage,
    Nothing,
}

impl EventAction {
    pub fn name(self) -> &'static str {
        match self {
            Self::Open       => "open",
            Self::Close      => "close",
            Self::TempClose  => "temp_close",
            Self::ResetUsage => "reset",
            Self::Nothing    => "nothing",
        }
    }
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EventAction {
    type Err = EventError;

    /// Case-insensitive; `reset_usage` and `tempclose` are accepted aliases.
    fn from_str(s: &str) -> EventResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open"                      => Ok(Self::Open),
            "close"                     => Ok(Self::Close),
            "temp_close" | "tempclose"  => Ok(Self::TempClose),
            "reset" | "reset_usage"     => Ok(Self::ResetUsage),
            "nothing"                   => Ok(Self::Nothing),
            _ => Err(EventError::UnknownAction(s.to_owned())),
        }
    }
}

/// One door transition at a simulated time, consumed exactly once.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    pub segment: SegmentId,
    /// Seconds since the start of the run.
    pub time:    f64,
    pub action:  EventAction,
}

impl Event {
    pub fn new(segment: SegmentId, time: f64, action: EventAction) -> Self {
        Self { segment, time, action }
    }

    /// Rejects times that cannot be placed on the clock.
    pub fn validated(self) -> EventResult<Self> {
        if self.time.is_finite() && self.time >= 0.0 {
            Ok(self)
        } else {
            Err(EventError::InvalidTime(self.time))
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} at {:.3} s", self.action, self.segment, self.time)
    }
}
