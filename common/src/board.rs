use crate::cell::{Cell, Dimensions};
use rand::Rng;
use rand::seq::IteratorRandom;
use std::collections::HashSet;

/// The hidden board: where the mines actually are.
///
/// The agent never looks inside; it only learns `nearby_mines` for cells it reveals.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Minesweeper {
    pub dims: Dimensions,
    mines: HashSet<Cell>,
}

impl Minesweeper {
    /// Places `mines` mines uniformly at random.
    pub fn new<R: Rng + ?Sized>(dims: Dimensions, mines: usize, rng: &mut R) -> Self {
        if mines >= dims.area() {
            panic!("Total mines must be less than the number of cells on the board.");
        }
        let mines = dims.cells().choose_multiple(rng, mines).into_iter().collect();
        Minesweeper { dims, mines }
    }

    /// A board with mines at exactly the given cells. Cells off the board are ignored.
    pub fn with_mines(dims: Dimensions, mines: impl IntoIterator<Item = Cell>) -> Self {
        let mines = mines.into_iter().filter(|&c| dims.contains(c)).collect();
        Minesweeper { dims, mines }
    }

    pub fn mines(&self) -> &HashSet<Cell> {
        &self.mines
    }

    pub fn is_mine(&self, cell: Cell) -> bool {
        self.mines.contains(&cell)
    }

    /// Number of mines touching `cell`, not counting the cell itself.
    pub fn nearby_mines(&self, cell: Cell) -> usize {
        self.dims
            .neighbors(cell)
            .filter(|n| self.mines.contains(n))
            .count()
    }

    /// Reveals a cell: whether it is a mine, and how many mines touch it.
    pub fn reveal(&self, cell: Cell) -> (bool, usize) {
        (self.is_mine(cell), self.nearby_mines(cell))
    }

    /// The game is won once the flagged cells are exactly the mines.
    pub fn won(&self, flags: &HashSet<Cell>) -> bool {
        flags == &self.mines
    }
}
