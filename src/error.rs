// Error taxonomy for the move-decision engine

use thiserror::Error;

use crate::board::{CellId, CellState, Player};

/// Failures surfaced by the engine to its host
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// `next_move` was called before `setup`
    #[error("next_move called before setup")]
    NotInitialized,

    #[error("invalid board dimensions {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    /// Reported position lies outside the playable interior
    #[error("position ({row}, {col}) is outside the {rows}x{cols} board")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Reported position contradicts the tracked board state
    #[error("cell {cell} is {state:?} and cannot be occupied by {player:?}")]
    Desync {
        cell: CellId,
        state: CellState,
        player: Player,
    },

    #[error("both players reported on cell {0}")]
    SamePosition(CellId),

    #[error("cell {to} is not adjacent to cell {from}")]
    NotAdjacent { from: CellId, to: CellId },
}
