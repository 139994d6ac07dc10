use crate::cell::Cell;
use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::fmt;

/// A logical statement about the board: exactly `count` of `cells` are mines.
///
/// Equality is by value, so two sentences built from the same cells in a
/// different order are the same sentence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Sentence {
    cells: BTreeSet<Cell>,
    count: usize,
}

impl Sentence {
    /// Builds a sentence, rejecting counts that cannot fit in the cell set.
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: usize) -> Result<Self> {
        let cells: BTreeSet<Cell> = cells.into_iter().collect();
        if count > cells.len() {
            return Err(Error::InconsistentCount {
                count: count as isize,
                cells: cells.len(),
            });
        }
        Ok(Sentence { cells, count })
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// A sentence with no cells says nothing.
    pub fn is_degenerate(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cells, if every one of them must be a mine.
    pub fn known_mines(&self) -> BTreeSet<Cell> {
        if self.count == self.cells.len() {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// All cells, if none of them can be a mine.
    pub fn known_safes(&self) -> BTreeSet<Cell> {
        if self.count == 0 {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Subset resolution: when `other.cells ⊆ self.cells`, the cells only in
    /// `self` hold exactly `self.count - other.count` mines.
    ///
    /// Returns `Ok(None)` when `other` is not a subset of `self`.
    pub fn resolve(&self, other: &Sentence) -> Result<Option<Sentence>> {
        if !other.cells.is_subset(&self.cells) {
            return Ok(None);
        }

        let remaining: BTreeSet<Cell> = self.cells.difference(&other.cells).copied().collect();
        let Some(count) = self.count.checked_sub(other.count) else {
            return Err(Error::InconsistentCount {
                count: self.count as isize - other.count as isize,
                cells: remaining.len(),
            });
        };

        Sentence::new(remaining, count).map(Some)
    }

    /// Checks that `cell` can be removed as a mine without breaking the sentence.
    pub(crate) fn check_mine(&self, cell: Cell) -> Result<()> {
        if !self.cells.contains(&cell) {
            return Err(Error::CellNotInSentence(cell));
        }
        if self.count == 0 {
            return Err(Error::InconsistentCount {
                count: -1,
                cells: self.cells.len() - 1,
            });
        }
        Ok(())
    }

    /// Checks that `cell` can be removed as a safe cell without breaking the sentence.
    pub(crate) fn check_safe(&self, cell: Cell) -> Result<()> {
        if !self.cells.contains(&cell) {
            return Err(Error::CellNotInSentence(cell));
        }
        if self.count == self.cells.len() {
            return Err(Error::InconsistentCount {
                count: self.count as isize,
                cells: self.cells.len() - 1,
            });
        }
        Ok(())
    }

    /// Removes a cell known to be a mine, which accounts for one of the mines.
    pub(crate) fn mark_mine(&mut self, cell: Cell) -> Result<()> {
        self.check_mine(cell)?;
        self.cells.remove(&cell);
        self.count -= 1;
        Ok(())
    }

    /// Removes a cell known to be safe. The count is untouched.
    pub(crate) fn mark_safe(&mut self, cell: Cell) -> Result<()> {
        self.check_safe(cell)?;
        self.cells.remove(&cell);
        Ok(())
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{cell}")?;
        }
        write!(f, "}} = {}", self.count)
    }
}
