// Turns a chosen destination cell into a command relative to the bot's heading

use crate::board::{CellId, HexBoard};
use crate::error::EngineError;
use crate::types::{Command, Direction, Position};

/// Maps the step `current -> target` onto a command relative to `last`
///
/// Returns the command together with the physical direction taken, which
/// becomes the heading for the next call.
pub fn to_command(
    board: &HexBoard,
    current: CellId,
    target: CellId,
    last: Direction,
) -> Result<(Command, Direction), EngineError> {
    let taken = board
        .direction_between(current, target)
        .ok_or(EngineError::NotAdjacent {
            from: current,
            to: target,
        })?;
    Ok((Command::between(last, taken), taken))
}

/// Remembers the direction of the bot's previous move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveTranslator {
    heading: Direction,
}

impl MoveTranslator {
    pub fn new(heading: Direction) -> Self {
        MoveTranslator { heading }
    }

    /// Heading at the start of a match: towards the far side of the board
    pub fn for_start(board: &HexBoard, start: Position) -> Self {
        let heading = if start.column * 2 > board.cols() + 1 {
            Direction::Left
        } else {
            Direction::Right
        };
        MoveTranslator::new(heading)
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Takes the heading from a move that actually happened
    ///
    /// Non-adjacent jumps carry no direction and leave the heading alone.
    pub fn follow(&mut self, board: &HexBoard, from: CellId, to: CellId) {
        if let Some(dir) = board.direction_between(from, to) {
            self.heading = dir;
        }
    }

    pub fn translate(
        &mut self,
        board: &HexBoard,
        current: CellId,
        target: CellId,
    ) -> Result<Command, EngineError> {
        let (command, taken) = to_command(board, current, target, self.heading)?;
        self.heading = taken;
        Ok(command)
    }
}
