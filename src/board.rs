// Hex board with a one-cell wall border
//
// Cells are addressed by a stable integer id: row * padded_cols + column,
// where row and column include the border. Even rows sit half a cell to
// the right and are one cell shorter, so their last column is wall too.
// Occupancy only ever moves from Free to Bot/Opponent; walls never change.

use crate::error::EngineError;
use crate::types::{Direction, Position};

/// Integer encoding of a padded (row, column) pair
pub type CellId = usize;

/// The two participants of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Bot,
    Opponent,
}

/// Occupancy of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    Wall,
    Free,
    Bot,
    Opponent,
}

impl From<Player> for CellState {
    fn from(player: Player) -> Self {
        match player {
            Player::Bot => CellState::Bot,
            Player::Opponent => CellState::Opponent,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexBoard {
    rows: usize,
    cols: usize,
    cells: Vec<CellState>,
}

impl HexBoard {
    /// Allocates a `rows` x `cols` playable area surrounded by walls
    ///
    /// Even rows only get `cols - 1` playable cells.
    pub fn new(rows: usize, cols: usize) -> Result<Self, EngineError> {
        if rows == 0 || cols == 0 {
            return Err(EngineError::InvalidDimensions { rows, cols });
        }

        let padded_rows = rows + 2;
        let padded_cols = cols + 2;
        let mut cells = Vec::with_capacity(padded_rows * padded_cols);
        for row in 0..padded_rows {
            for col in 0..padded_cols {
                let border = row == 0 || row == rows + 1 || col == 0 || col > row_len(row, cols);
                cells.push(if border { CellState::Wall } else { CellState::Free });
            }
        }

        Ok(HexBoard { rows, cols, cells })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Column count including both wall columns
    pub fn padded_cols(&self) -> usize {
        self.cols + 2
    }

    /// Number of playable cells on an interior `row`
    pub fn row_len(&self, row: usize) -> usize {
        row_len(row, self.cols)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cell_id(&self, pos: Position) -> CellId {
        pos.row * self.padded_cols() + pos.column
    }

    pub fn position(&self, cell: CellId) -> Position {
        Position::new(cell / self.padded_cols(), cell % self.padded_cols())
    }

    /// Converts an externally reported position, rejecting anything outside the playable area
    pub fn interior_cell(&self, pos: Position) -> Result<CellId, EngineError> {
        let inside =
            (1..=self.rows).contains(&pos.row) && (1..=self.row_len(pos.row)).contains(&pos.column);
        if !inside {
            return Err(EngineError::OutOfBounds {
                row: pos.row,
                col: pos.column,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.cell_id(pos))
    }

    /// Neighbouring cell in `dir`, `None` when the step leaves the padded grid
    pub fn neighbor(&self, cell: CellId, dir: Direction) -> Option<CellId> {
        let next = dir.apply(self.position(cell))?;
        if next.row < self.rows + 2 && next.column < self.padded_cols() {
            Some(self.cell_id(next))
        } else {
            None
        }
    }

    /// Direction that leads from `from` to the adjacent cell `to`
    pub fn direction_between(&self, from: CellId, to: CellId) -> Option<Direction> {
        let a = self.position(from);
        let b = self.position(to);
        let delta = (
            b.row as isize - a.row as isize,
            b.column as isize - a.column as isize,
        );
        Direction::from_offset(a.row, delta)
    }

    pub fn state(&self, cell: CellId) -> CellState {
        self.cells.get(cell).copied().unwrap_or(CellState::Wall)
    }

    pub fn is_free(&self, cell: CellId) -> bool {
        self.state(cell) == CellState::Free
    }

    /// Free cells around `cell`, in direction order
    pub fn free_neighbors(&self, cell: CellId) -> Vec<CellId> {
        Direction::all()
            .iter()
            .filter_map(|&dir| self.neighbor(cell, dir))
            .filter(|&n| self.is_free(n))
            .collect()
    }

    /// Claims a free cell for `player`
    pub fn mark_occupied(&mut self, cell: CellId, player: Player) -> Result<(), EngineError> {
        let state = self.state(cell);
        if state != CellState::Free {
            return Err(EngineError::Desync {
                cell,
                state,
                player,
            });
        }
        self.cells[cell] = player.into();
        Ok(())
    }
}

fn row_len(row: usize, cols: usize) -> usize {
    if row % 2 == 0 {
        cols - 1
    } else {
        cols
    }
}
