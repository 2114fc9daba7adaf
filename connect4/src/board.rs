use serde::{Deserialize, Serialize};

/// Number of columns.
pub const WIDTH: usize = 7;
/// Number of rows.
pub const HEIGHT: usize = 6;
/// Length of a run that wins the game.
pub const CONNECT: usize = 4;

/// Marks which player owns a chip, or whose turn it is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    A,
    B,
}

impl Label {
    /// The opponent's label.
    pub fn other(self) -> Self {
        match self {
            Label::A => Label::B,
            Label::B => Label::A,
        }
    }

    /// Index into two-slot arrays: A is 0, B is 1.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::A => write!(f, "A"),
            Label::B => write!(f, "B"),
        }
    }
}

/// The 7 x 6 grid of cells.
///
/// Cells are addressed as `(column, row)` with row 0 at the bottom. A cell is
/// `None` when it is empty.
//
// Chips only ever enter through `drop_chip()`, so within a column all empty
// cells sit on top of all occupied ones.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    columns: [[Option<Label>; HEIGHT]; WIDTH],
}

impl Board {
    /// An empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a cell, counting rows from the bottom.
    ///
    /// Panics if the coordinates are off the board.
    pub fn get(&self, column: usize, row: usize) -> Option<Label> {
        self.columns[column][row]
    }

    /// Looks up a cell; a negative `row` counts from the top, so `-1` is the
    /// topmost cell of the column.
    ///
    /// Panics if the coordinates are off the board.
    pub fn cell(&self, column: usize, row: isize) -> Option<Label> {
        let row = if row < 0 {
            HEIGHT
                .checked_sub(row.unsigned_abs())
                .unwrap_or_else(|| panic!("row {} is off the board", row))
        } else {
            row as usize
        };
        self.get(column, row)
    }

    /// The topmost cell of a column. Once this is occupied the column is full.
    pub fn top_cell(&self, column: usize) -> Option<Label> {
        self.columns[column][HEIGHT - 1]
    }

    /// Whether a chip can still be dropped into `column`.
    ///
    /// Returns `false` for columns that do not exist.
    pub fn is_column_playable(&self, column: usize) -> bool {
        column < WIDTH && self.top_cell(column).is_none()
    }

    /// All columns that still accept a chip, in ascending order.
    pub fn playable_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..WIDTH).filter(|&column| self.is_column_playable(column))
    }

    /// Drops a chip into `column` and returns the row it lands in.
    ///
    /// Panics if the column is not playable. Validating the move is the
    /// job of [`Game`](crate::Game).
    pub fn drop_chip(&mut self, column: usize, label: Label) -> usize {
        assert!(
            self.is_column_playable(column),
            "column {} is not playable",
            column
        );
        let row = self.columns[column]
            .iter()
            .position(Option::is_none)
            .expect("a playable column has an empty cell");
        self.columns[column][row] = Some(label);
        row
    }

    /// True once every cell is occupied.
    pub fn is_full(&self) -> bool {
        (0..WIDTH).all(|column| self.top_cell(column).is_some())
    }

    /// Number of chips on the board.
    pub fn chip_count(&self) -> usize {
        self.columns
            .iter()
            .flatten()
            .filter(|cell| cell.is_some())
            .count()
    }

    /// The cells of one column, bottom to top.
    pub fn column(&self, column: usize) -> &[Option<Label>; HEIGHT] {
        &self.columns[column]
    }

    /// Builds a board from text, one line per row, topmost row first.
    /// `A` and `B` are chips, anything else is empty.
    ///
    /// Unlike `drop_chip()` this allows floating chips, which is handy for
    /// exercising the detector on arbitrary patterns.
    #[cfg(test)]
    pub(crate) fn from_text(text: &str) -> Self {
        let rows: Vec<&str> = text.trim().lines().map(str::trim).collect();
        assert_eq!(rows.len(), HEIGHT);
        let mut board = Self::new();
        for (depth, line) in rows.iter().enumerate() {
            assert_eq!(line.chars().count(), WIDTH, "bad row {:?}", line);
            let row = HEIGHT - 1 - depth;
            for (column, c) in line.chars().enumerate() {
                board.columns[column][row] = match c {
                    'A' => Some(Label::A),
                    'B' => Some(Label::B),
                    _ => None,
                };
            }
        }
        board
    }
}
