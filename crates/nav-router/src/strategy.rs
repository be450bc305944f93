//! Routing and exit strategy identifiers.

use std::fmt;
use std::str::FromStr;

use crate::{RouterError, RouterResult};

// ── RoutingStrategy ───────────────────────────────────────────────────────────

/// Which routing algorithm a router runs.
///
/// The numeric codes follow the ones used in existing scenario files, so a
/// config carrying `strategy = 2` still resolves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RoutingStrategy {
    LocalShortest,
    GlobalShortest,
    Quickest,
    FfGlobalShortest,
    FfLocalShortest,
    FfQuickest,
}

impl RoutingStrategy {
    pub const ALL: [RoutingStrategy; 6] = [
        Self::LocalShortest,
        Self::GlobalShortest,
        Self::Quickest,
        Self::FfGlobalShortest,
        Self::FfLocalShortest,
        Self::FfQuickest,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::LocalShortest    => "local_shortest",
            Self::GlobalShortest   => "global_shortest",
            Self::Quickest         => "quickest",
            Self::FfGlobalShortest => "ff_global_shortest",
            Self::FfLocalShortest  => "ff_local_shortest",
            Self::FfQuickest       => "ff_quickest",
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::LocalShortest    => 1,
            Self::GlobalShortest   => 2,
            Self::Quickest         => 3,
            Self::FfGlobalShortest => 9,
            Self::FfLocalShortest  => 10,
            Self::FfQuickest       => 11,
        }
    }

    /// `true` for the strategies that route over floor fields.
    pub fn uses_floor_field(self) -> bool {
        matches!(self, Self::FfGlobalShortest | Self::FfLocalShortest | Self::FfQuickest)
    }

    /// The exit strategy a config gets when it does not name one.
    pub fn default_exit_strategy(self) -> ExitStrategy {
        match self {
            Self::FfLocalShortest => ExitStrategy::SubroomFloorField,
            s if s.uses_floor_field() => ExitStrategy::FloorField,
            _ => ExitStrategy::MiddlePoint,
        }
    }

    /// Reject exit strategies the router's movement targets are not built for.
    pub fn check_exit_strategy(self, exit: ExitStrategy) -> RouterResult<()> {
        let ok = match self {
            Self::FfLocalShortest => exit == ExitStrategy::SubroomFloorField,
            s if s.uses_floor_field() => exit.uses_floor_field(),
            _ => !exit.uses_floor_field(),
        };
        if ok {
            Ok(())
        } else {
            Err(RouterError::StrategyMismatch { strategy: self, exit })
        }
    }
}

impl fmt::Display for RoutingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RoutingStrategy {
    type Err = RouterError;

    fn from_str(s: &str) -> RouterResult<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|st| st.name() == wanted)
            .ok_or_else(|| RouterError::UnknownStrategy(s.to_owned()))
    }
}

impl TryFrom<u8> for RoutingStrategy {
    type Error = RouterError;

    fn try_from(code: u8) -> RouterResult<Self> {
        Self::ALL
            .into_iter()
            .find(|st| st.code() == code)
            .ok_or_else(|| RouterError::UnknownStrategy(code.to_string()))
    }
}

// ── ExitStrategy ──────────────────────────────────────────────────────────────

/// How the movement model aims at the chosen segment.  Routers only use it to
/// check that the pairing makes sense.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ExitStrategy {
    /// Head for the segment's midpoint.
    MiddlePoint,
    /// Head for the nearest point on the segment.
    NearestPoint,
    /// Follow the room-level floor field.
    FloorField,
    /// Follow the subroom-level floor field.
    SubroomFloorField,
}

impl ExitStrategy {
    pub fn code(self) -> u8 {
        match self {
            Self::MiddlePoint       => 1,
            Self::NearestPoint      => 2,
            Self::FloorField        => 8,
            Self::SubroomFloorField => 9,
        }
    }

    pub fn uses_floor_field(self) -> bool {
        matches!(self, Self::FloorField | Self::SubroomFloorField)
    }
}

impl fmt::Display for ExitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl TryFrom<u8> for ExitStrategy {
    type Error = RouterError;

    fn try_from(code: u8) -> RouterResult<Self> {
        match code {
            1 => Ok(Self::MiddlePoint),
            2 => Ok(Self::NearestPoint),
            8 => Ok(Self::FloorField),
            9 => Ok(Self::SubroomFloorField),
            _ => Err(RouterError::UnknownExitStrategy(code.to_string())),
        }
    }
}
