use thiserror::Error;

use nav_core::{GoalId, RouterId};
use nav_field::FieldError;

use crate::{ExitStrategy, RoutingStrategy};

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("unknown routing strategy {0:?}")]
    UnknownStrategy(String),

    #[error("unknown exit strategy {0:?}")]
    UnknownExitStrategy(String),

    #[error("strategy {strategy} cannot run with exit strategy {exit}")]
    StrategyMismatch { strategy: RoutingStrategy, exit: ExitStrategy },

    #[error("{0} configured twice")]
    DuplicateRouter(RouterId),

    #[error("{0} is not configured")]
    UnknownRouter(RouterId),

    #[error("{0} used before init")]
    NotInitialised(RouterId),

    #[error("building has no exit")]
    NoExit,

    #[error("{0} cannot be mapped to an exit")]
    GoalUnreachable(GoalId),

    #[error("invalid router configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Field(#[from] FieldError),
}

pub type RouterResult<T> = Result<T, RouterError>;
