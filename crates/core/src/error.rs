//! Error types for the engine.
//!
//! Invalid moves and ignored input are ordinary game outcomes
//! ([`SwapOutcome`](crate::types::SwapOutcome)), not errors.

use crate::types::{MAX_GRID_SIZE, MIN_GRID_SIZE, MIN_POOL_SIZE};

/// Errors raised by session and grid operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("coordinate ({row}, {col}) is outside the {size}x{size} grid")]
    InvalidCoordinate { row: u8, col: u8, size: u8 },

    #[error("cell ({row}, {col}) holds kind {kind} but the pool only has {pool} kinds")]
    KindOutOfPool { row: u8, col: u8, kind: u8, pool: usize },

    #[error("malformed grid: {0}")]
    MalformedGrid(String),

    #[error("session was started without a tier table; cannot advance")]
    NoTierTable,

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised when validating difficulty configuration and tier tables.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("tier table is empty")]
    EmptyTable,

    #[error("pool of {size} kinds is below the minimum of {min}", min = MIN_POOL_SIZE)]
    PoolTooSmall { size: usize },

    #[error("pool of {size} kinds exceeds the 256 a cell can index")]
    PoolTooLarge { size: usize },

    #[error("tier {index}: pool of {size} kinds is below the minimum of {min}", min = MIN_POOL_SIZE)]
    TierPoolTooSmall { index: usize, size: usize },

    #[error("tier {index}: level bound {bound} must exceed the previous bound {previous}")]
    NotAscending { index: usize, bound: u32, previous: u32 },

    #[error("tier {index}: an open-ended tier must be the last one")]
    OpenTierNotLast { index: usize },

    #[error(
        "grid size {0} is outside {min}..={max}",
        min = MIN_GRID_SIZE,
        max = MAX_GRID_SIZE
    )]
    GridSize(u8),

    #[error("duplicate shape id {0:?} in pool")]
    DuplicateShape(String),
}
