//! The knowledge base: every sentence the agent believes, plus the cells it has
//! already resolved.
//!
//! The knowledge base is the only thing that edits sentence contents. Learning a
//! fact about a cell (`mark_mine` / `mark_safe`) rewrites every sentence that
//! mentions the cell, so sentences only ever talk about cells whose status is
//! still unknown.

use crate::cell::{Cell, Dimensions};
use crate::error::{Error, Result};
use crate::sentence::Sentence;
use itertools::iproduct;
use std::collections::HashSet;
use tracing::{debug, trace};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct KnowledgeBase {
    dims: Dimensions,
    /// Sentences in the order they were learned. Never holds duplicates.
    knowledge: Vec<Sentence>,
    safes: HashSet<Cell>,
    mines: HashSet<Cell>,
    moves_made: HashSet<Cell>,
}

impl KnowledgeBase {
    pub fn new(dims: Dimensions) -> Self {
        KnowledgeBase {
            dims,
            knowledge: Vec::new(),
            safes: HashSet::new(),
            mines: HashSet::new(),
            moves_made: HashSet::new(),
        }
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn knowledge(&self) -> &[Sentence] {
        &self.knowledge
    }

    pub fn safes(&self) -> &HashSet<Cell> {
        &self.safes
    }

    pub fn mines(&self) -> &HashSet<Cell> {
        &self.mines
    }

    pub fn moves_made(&self) -> &HashSet<Cell> {
        &self.moves_made
    }

    /// Records a move. Returns `false` if the cell was already played.
    pub(crate) fn record_move(&mut self, cell: Cell) -> Result<bool> {
        self.check_bounds(cell)?;
        Ok(self.moves_made.insert(cell))
    }

    /// Records that `cell` is a mine and removes it from every sentence.
    ///
    /// Returns whether this was new information. Marking a known mine again is a no-op.
    /// If any sentence cannot take the mark, nothing is changed.
    pub fn mark_mine(&mut self, cell: Cell) -> Result<bool> {
        self.check_bounds(cell)?;
        if self.safes.contains(&cell) {
            return Err(Error::Contradiction(cell));
        }

        self.knowledge
            .iter()
            .filter(|s| s.contains(cell))
            .try_for_each(|s| s.check_mine(cell))?;

        let learned = self.mines.insert(cell);
        for sentence in self.knowledge.iter_mut().filter(|s| s.contains(cell)) {
            sentence.mark_mine(cell)?;
        }

        if learned {
            debug!(%cell, "marked mine");
        }
        Ok(learned)
    }

    /// Records that `cell` is safe and removes it from every sentence.
    ///
    /// Returns whether this was new information. Marking a known safe cell again is a no-op.
    /// If any sentence cannot take the mark, nothing is changed.
    pub fn mark_safe(&mut self, cell: Cell) -> Result<bool> {
        self.check_bounds(cell)?;
        if self.mines.contains(&cell) {
            return Err(Error::Contradiction(cell));
        }

        self.knowledge
            .iter()
            .filter(|s| s.contains(cell))
            .try_for_each(|s| s.check_safe(cell))?;

        let learned = self.safes.insert(cell);
        for sentence in self.knowledge.iter_mut().filter(|s| s.contains(cell)) {
            sentence.mark_safe(cell)?;
        }

        if learned {
            debug!(%cell, "marked safe");
        }
        Ok(learned)
    }

    /// Adds "exactly `count` of `cells` are mines".
    ///
    /// Cells that are already resolved or already played are dropped first; each
    /// dropped mine accounts for one of the `count` mines. Returns `Ok(false)` if
    /// what remains is empty or already known.
    pub fn add_sentence(
        &mut self,
        cells: impl IntoIterator<Item = Cell>,
        count: usize,
    ) -> Result<bool> {
        let mut unresolved = Vec::new();
        let mut remaining = count as isize;

        for cell in cells {
            self.check_bounds(cell)?;
            if self.mines.contains(&cell) {
                remaining -= 1;
            } else if !self.safes.contains(&cell) && !self.moves_made.contains(&cell) {
                unresolved.push(cell);
            }
        }

        if remaining < 0 {
            return Err(Error::InconsistentCount {
                count: remaining,
                cells: unresolved.len(),
            });
        }

        let sentence = Sentence::new(unresolved, remaining as usize)?;
        if sentence.is_degenerate() || self.knowledge.contains(&sentence) {
            trace!(%sentence, "skipped sentence");
            return Ok(false);
        }

        debug!(%sentence, "added sentence");
        self.knowledge.push(sentence);
        Ok(true)
    }

    /// Applies subset resolution to every pair of sentences until a full pass
    /// derives nothing new. Returns how many sentences were added.
    ///
    /// Each derived sentence is checked against everything known so far,
    /// including sentences derived earlier in the same pass.
    pub fn infer_fixpoint(&mut self) -> Result<usize> {
        let mut seen: HashSet<Sentence> = self.knowledge.iter().cloned().collect();
        let mut added = 0;
        let mut passes = 0;

        loop {
            passes += 1;
            let snapshot = self.knowledge.clone();
            let mut updated = false;

            for (x, y) in iproduct!(snapshot.iter(), snapshot.iter()) {
                if x == y || y.is_degenerate() {
                    continue;
                }
                let Some(derived) = x.resolve(y)? else {
                    continue;
                };
                if derived.is_degenerate() {
                    continue;
                }
                if seen.insert(derived.clone()) {
                    trace!(%x, %y, %derived, "inferred sentence");
                    self.knowledge.push(derived);
                    added += 1;
                    updated = true;
                }
            }

            if !updated {
                break;
            }
        }

        trace!(passes, added, "inference reached fixpoint");
        Ok(added)
    }

    /// Marks every cell that some sentence fully determines, repeating until a
    /// pass marks nothing. Returns whether any cell was marked.
    pub fn propagate_resolved(&mut self) -> Result<bool> {
        let mut changed = false;

        loop {
            let mut safes = Vec::new();
            let mut mines = Vec::new();
            for sentence in &self.knowledge {
                if sentence.count() == 0 {
                    safes.extend(sentence.known_safes());
                } else {
                    mines.extend(sentence.known_mines());
                }
            }

            let mut marked = false;
            for cell in safes {
                marked |= self.mark_safe(cell)?;
            }
            for cell in mines {
                marked |= self.mark_mine(cell)?;
            }
            self.prune();

            if !marked {
                break;
            }
            changed = true;
        }

        Ok(changed)
    }

    /// Alternates propagation and inference until neither changes anything.
    pub fn saturate(&mut self) -> Result<()> {
        loop {
            let marked = self.propagate_resolved()?;
            let inferred = self.infer_fixpoint()?;
            if !marked && inferred == 0 {
                return Ok(());
            }
        }
    }

    /// Drops empty sentences and sentences that marking has turned into copies
    /// of earlier ones.
    fn prune(&mut self) {
        let mut seen = HashSet::new();
        self.knowledge
            .retain(|s| !s.is_degenerate() && seen.insert(s.clone()));
    }

    fn check_bounds(&self, cell: Cell) -> Result<()> {
        if self.dims.contains(cell) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                cell,
                height: self.dims.height,
                width: self.dims.width,
            })
        }
    }
}
