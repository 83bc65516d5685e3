use crate::grid::{CellCount, Coord};
use thiserror::Error;

/// Construction is the only fallible operation: per-action oddities
/// (out-of-range clicks, stale clicks after game end) are no-op outcomes,
/// not errors.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid board config: {rows}x{cols} with {mines} mines")]
    InvalidConfig {
        rows: Coord,
        cols: Coord,
        mines: CellCount,
    },
}

pub type Result<T> = core::result::Result<T, GameError>;
