use serde::{Deserialize, Serialize};

use crate::{Board, GameError, Label, CONNECT, HEIGHT, WIDTH};

/// The state of a board as far as winning is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    Won(Label),
    Draw,
    Undecided,
}

/// How a finished game ended. This is what subscribers get to see.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Won(Label),
    Draw,
}

impl TryFrom<GameResult> for Outcome {
    type Error = GameError;

    fn try_from(result: GameResult) -> Result<Self, Self::Error> {
        match result {
            GameResult::Won(label) => Ok(Outcome::Won(label)),
            GameResult::Draw => Ok(Outcome::Draw),
            GameResult::Undecided => Err(GameError::UnsupportedResult(result)),
        }
    }
}

impl From<Outcome> for GameResult {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Won(label) => GameResult::Won(label),
            Outcome::Draw => GameResult::Draw,
        }
    }
}

/// The four lines a run can lie on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Vertical,
    Horizontal,
    /// South-west to north-east.
    AscendingDiagonal,
    /// North-west to south-east.
    DescendingDiagonal,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Vertical,
        Direction::Horizontal,
        Direction::AscendingDiagonal,
        Direction::DescendingDiagonal,
    ];

    /// One step along the line as `(column, row)` offsets.
    fn step(self) -> (isize, isize) {
        match self {
            Direction::Vertical => (0, 1),
            Direction::Horizontal => (1, 0),
            Direction::AscendingDiagonal => (1, 1),
            Direction::DescendingDiagonal => (1, -1),
        }
    }
}

/// Decides whether somebody has won, the board is drawn, or play goes on.
///
/// Cells are scanned column by column, bottom to top, starting at `(0, 0)`.
/// The first cell that is part of a winning run decides the winner.
pub fn evaluate(board: &Board) -> GameResult {
    for column in 0..WIDTH {
        for row in 0..HEIGHT {
            if is_winning_cell(board, column, row) {
                if let Some(label) = board.get(column, row) {
                    return GameResult::Won(label);
                }
            }
        }
    }
    if board.is_full() {
        GameResult::Draw
    } else {
        GameResult::Undecided
    }
}

/// Whether the chip at `(column, row)` is part of a run of at least
/// [`CONNECT`] chips in any direction. Empty cells never are.
pub fn is_winning_cell(board: &Board, column: usize, row: usize) -> bool {
    Direction::ALL
        .into_iter()
        .any(|direction| run_length(board, column, row, direction) >= CONNECT)
}

/// Length of the run through `(column, row)` along `direction`, counting
/// the origin itself. Zero for an empty origin.
pub fn run_length(board: &Board, column: usize, row: usize, direction: Direction) -> usize {
    let Some(label) = board.get(column, row) else {
        return 0;
    };
    let (dc, dr) = direction.step();
    let forward = walk(board, (column, row), (dc, dr), label);
    let backward = walk(board, (column, row), (-dc, -dr), label);
    forward + 1 + backward
}

// Counts how many consecutive cells after the origin carry `label`.
// Every step is bounds-checked before the board is touched.
fn walk(board: &Board, origin: (usize, usize), step: (isize, isize), label: Label) -> usize {
    let mut count = 0;
    let (mut column, mut row) = origin;
    loop {
        let next = column
            .checked_add_signed(step.0)
            .zip(row.checked_add_signed(step.1))
            .filter(|&(c, r)| c < WIDTH && r < HEIGHT);
        match next {
            Some((c, r)) if board.get(c, r) == Some(label) => {
                count += 1;
                (column, row) = (c, r);
            }
            _ => return count,
        }
    }
}
