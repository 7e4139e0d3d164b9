// Hex directions, move commands and the wire types exchanged with the game service

use serde::{Deserialize, Serialize};

/// Grid position as reported by the game service
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(row: usize, column: usize) -> Self {
        Position { row, column }
    }
}

/// Body of POST /games/<id>/setup
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SetupRequest {
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub player_position: Position,
    pub opponent_position: Position,
}

/// Body of POST /games/<id>/move
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub player_position: Position,
    pub opponent_position: Position,
}

/// The six hex directions, clockwise from upper-left
///
/// Rows are offset by half a cell: even rows sit half a cell to the right
/// of odd rows, so the diagonal column deltas depend on row parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    UpperLeft,
    UpperRight,
    Right,
    LowerRight,
    LowerLeft,
    Left,
}

/// (row delta, column delta on even rows, column delta on odd rows), indexed by `Direction::index`
const OFFSETS: [(isize, isize, isize); 6] = [
    (-1, 0, -1), // UpperLeft
    (-1, 1, 0),  // UpperRight
    (0, 1, 1),   // Right
    (1, 1, 0),   // LowerRight
    (1, 0, -1),  // LowerLeft
    (0, -1, -1), // Left
];

impl Direction {
    /// Returns all directions in index order
    pub fn all() -> [Direction; 6] {
        [
            Direction::UpperLeft,
            Direction::UpperRight,
            Direction::Right,
            Direction::LowerRight,
            Direction::LowerLeft,
            Direction::Left,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Direction {
        Self::all()[index % 6]
    }

    pub fn opposite(self) -> Direction {
        Self::from_index(self.index() + 3)
    }

    /// Row and column delta of a step taken from a cell on `row`
    pub fn offset(self, row: usize) -> (isize, isize) {
        let (dr, dc_even, dc_odd) = OFFSETS[self.index()];
        if row % 2 == 0 {
            (dr, dc_even)
        } else {
            (dr, dc_odd)
        }
    }

    /// Direction whose step from `row` produces the given delta
    pub fn from_offset(row: usize, delta: (isize, isize)) -> Option<Direction> {
        Self::all().iter().copied().find(|dir| dir.offset(row) == delta)
    }

    /// Applies this direction to a position; `None` when the step leaves the non-negative quadrant
    pub fn apply(self, pos: Position) -> Option<Position> {
        let (dr, dc) = self.offset(pos.row);
        let row = pos.row.checked_add_signed(dr)?;
        let column = pos.column.checked_add_signed(dc)?;
        Some(Position { row, column })
    }
}

/// Egocentric command relative to the bot's current heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    HeavyLeft,
    LightLeft,
    ContinueStraight,
    LightRight,
    HeavyRight,
    /// Turning back onto the trail; only ever produced when the bot is trapped
    Reverse,
}

impl Command {
    /// Command that turns `heading` into `target`
    pub fn between(heading: Direction, target: Direction) -> Command {
        match (target.index() + 6 - heading.index()) % 6 {
            0 => Command::ContinueStraight,
            1 => Command::LightRight,
            2 => Command::HeavyRight,
            3 => Command::Reverse,
            4 => Command::HeavyLeft,
            _ => Command::LightLeft,
        }
    }

    /// Label sent back to the game service
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::HeavyLeft => "heavy-left",
            Command::LightLeft => "light-left",
            Command::ContinueStraight => "continue-straight",
            Command::LightRight => "light-right",
            Command::HeavyRight => "heavy-right",
            Command::Reverse => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposites_pair_up() {
        for dir in Direction::all() {
            assert_ne!(dir, dir.opposite());
            assert_eq!(dir, dir.opposite().opposite());
        }
        assert_eq!(Direction::UpperRight.opposite(), Direction::LowerLeft);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn test_opposite_steps_cancel_on_both_parities() {
        for start in [Position::new(2, 3), Position::new(3, 3)] {
            for dir in Direction::all() {
                let there = dir.apply(start).unwrap();
                assert_eq!(dir.opposite().apply(there), Some(start), "{:?} from {:?}", dir, start);
            }
        }
    }

    #[test]
    fn test_from_offset_depends_on_parity() {
        assert_eq!(Direction::from_offset(2, (-1, 0)), Some(Direction::UpperLeft));
        assert_eq!(Direction::from_offset(3, (-1, 0)), Some(Direction::UpperRight));
        assert_eq!(Direction::from_offset(2, (0, 2)), None);
    }

    #[test]
    fn test_command_rotation() {
        let heading = Direction::Right;
        assert_eq!(Command::between(heading, Direction::Right), Command::ContinueStraight);
        assert_eq!(Command::between(heading, Direction::LowerRight), Command::LightRight);
        assert_eq!(Command::between(heading, Direction::LowerLeft), Command::HeavyRight);
        assert_eq!(Command::between(heading, Direction::Left), Command::Reverse);
        assert_eq!(Command::between(heading, Direction::UpperLeft), Command::HeavyLeft);
        assert_eq!(Command::between(heading, Direction::UpperRight), Command::LightLeft);
    }

    #[test]
    fn test_request_uses_game_service_field_names() {
        let body = r#"{"playerPosition":{"row":1,"column":2},"opponentPosition":{"row":3,"column":4}}"#;
        let req: MoveRequest = serde_json::from_str(body).unwrap();
        assert_eq!(req.player_position, Position::new(1, 2));
        assert_eq!(req.opponent_position, Position::new(3, 4));
    }
}
