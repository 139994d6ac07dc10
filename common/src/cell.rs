use itertools::iproduct;
use std::fmt;

/// A `(row, col)` coordinate on the minesweeper board.
///
/// Cells are plain values: two cells are the same cell iff their coordinates match.
/// Ordering is row-major, which keeps sentence contents and move choices reproducible.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Cell { row, col }
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Cell { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The fixed size of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    pub height: usize,
    pub width: usize,
}

impl Dimensions {
    pub const fn new(height: usize, width: usize) -> Self {
        Dimensions { height, width }
    }

    /// Total number of cells on the board.
    pub const fn area(&self) -> usize {
        self.height * self.width
    }

    pub const fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Every cell on the board, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        iproduct!(0..self.height, 0..self.width).map(Cell::from)
    }

    /// The up-to-eight cells touching `cell`, clipped to the board edges.
    /// The cell itself is never included.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> {
        let Dimensions { height, width } = *self;

        iproduct!(-1isize..=1, -1isize..=1).filter_map(move |(dr, dc)| {
            if dr == 0 && dc == 0 {
                return None;
            }

            let row = cell.row.checked_add_signed(dr)?;
            let col = cell.col.checked_add_signed(dc)?;

            if row < height && col < width {
                Some(Cell { row, col })
            } else {
                None
            }
        })
    }
}
