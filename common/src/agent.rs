use crate::cell::{Cell, Dimensions};
use crate::error::Result;
use crate::knowledge::KnowledgeBase;
use crate::sentence::Sentence;
use rand::Rng;
use rand::prelude::IndexedRandom;
use std::collections::HashSet;
use tracing::{debug, warn};

/// How the agent arrived at a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// The cell is proven safe by the knowledge base.
    Safe(Cell),
    /// Nothing is proven safe; the cell was picked at random among unresolved cells.
    Guess(Cell),
}

impl Move {
    pub fn cell(&self) -> Cell {
        match *self {
            Move::Safe(cell) | Move::Guess(cell) => cell,
        }
    }
}

/// A minesweeper player that only guesses when logic runs out.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Agent {
    kb: KnowledgeBase,
}

impl Agent {
    pub fn new(height: usize, width: usize) -> Self {
        Agent {
            kb: KnowledgeBase::new(Dimensions::new(height, width)),
        }
    }

    /// Deserializes an agent from bytes.
    pub fn from_bytes(bts: &[u8]) -> Result<Self> {
        Ok(bcs::from_bytes(bts)?)
    }

    /// Serializes the agent, knowledge base included, to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bcs::to_bytes(self)?)
    }

    pub fn dims(&self) -> Dimensions {
        self.kb.dims()
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn knowledge(&self) -> &[Sentence] {
        self.kb.knowledge()
    }

    pub fn mines(&self) -> &HashSet<Cell> {
        self.kb.mines()
    }

    pub fn safes(&self) -> &HashSet<Cell> {
        self.kb.safes()
    }

    pub fn moves_made(&self) -> &HashSet<Cell> {
        self.kb.moves_made()
    }

    /// Called when the board reports that the safe `cell` has `count` mines
    /// among its neighbors.
    ///
    /// 1. Records the move and marks the cell safe.
    /// 2. Adds a sentence over the neighbors whose status is still unknown.
    /// 3. Runs propagation and subset inference until nothing changes.
    ///
    /// On error the agent is left exactly as it was before the call.
    pub fn add_knowledge(&mut self, cell: Cell, count: usize) -> Result<()> {
        if self.kb.moves_made().contains(&cell) {
            warn!(%cell, "cell was already revealed, ignoring");
            return Ok(());
        }

        let snapshot = self.kb.clone();
        if let Err(err) = self.learn(cell, count) {
            warn!(%cell, count, %err, "rejected reveal");
            self.kb = snapshot;
            return Err(err);
        }

        debug!(
            %cell,
            count,
            sentences = self.kb.knowledge().len(),
            safes = self.kb.safes().len(),
            mines = self.kb.mines().len(),
            "knowledge updated"
        );
        Ok(())
    }

    fn learn(&mut self, cell: Cell, count: usize) -> Result<()> {
        self.kb.record_move(cell)?;
        self.kb.mark_safe(cell)?;

        let neighbors: Vec<Cell> = self.dims().neighbors(cell).collect();
        self.kb.add_sentence(neighbors, count)?;
        self.kb.saturate()
    }

    /// A cell known to be safe that hasn't been played yet, if any.
    ///
    /// Picks the first such cell in row-major order so play is reproducible.
    pub fn make_safe_move(&self) -> Option<Cell> {
        self.kb
            .safes()
            .difference(self.kb.moves_made())
            .copied()
            .min()
    }

    /// A uniformly random cell that hasn't been played and isn't a known mine.
    ///
    /// Returns `None` once every cell is either played or a known mine.
    pub fn make_random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Cell> {
        if self.kb.moves_made().len() + self.kb.mines().len() == self.dims().area() {
            return None;
        }

        let candidates: Vec<Cell> = self
            .dims()
            .cells()
            .filter(|cell| !self.kb.moves_made().contains(cell) && !self.kb.mines().contains(cell))
            .collect();
        candidates.choose(rng).copied()
    }

    /// Prioritize logically safe moves, guess randomly otherwise.
    pub fn next_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Move> {
        self.make_safe_move()
            .map(Move::Safe)
            .or_else(|| self.make_random_move(rng).map(Move::Guess))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_corridor_resolves_far_end() {
        // Middle of a 1x3 corridor sees one mine; the left end turns out to be a 0.
        let mut agent = Agent::new(1, 3);
        agent.add_knowledge(Cell::new(0, 1), 1).unwrap();
        assert!(agent.mines().is_empty());
        assert_eq!(
            agent.knowledge(),
            &[Sentence::new([Cell::new(0, 0), Cell::new(0, 2)], 1).unwrap()]
        );

        agent.add_knowledge(Cell::new(0, 0), 0).unwrap();
        assert_eq!(agent.mines(), &HashSet::from([Cell::new(0, 2)]));
        assert!(agent.knowledge().is_empty());
    }

    #[test]
    fn test_zero_count_marks_neighbors_safe() {
        let mut agent = Agent::new(3, 3);
        agent.add_knowledge(Cell::new(1, 1), 0).unwrap();

        // Every cell on the board is now safe.
        assert_eq!(agent.safes().len(), 9);
        assert_eq!(agent.make_safe_move(), Some(Cell::new(0, 0)));
    }

    #[test]
    fn test_known_mines_reduce_the_count() {
        let mut agent = Agent::new(3, 3);
        agent.add_knowledge(Cell::new(0, 0), 3).unwrap();
        // All three neighbors of the corner are mines.
        assert_eq!(agent.mines().len(), 3);

        // (0,2) touches two of them, (0,1) and (1,1); its other neighbor (1,2) must be safe.
        agent.add_knowledge(Cell::new(0, 2), 2).unwrap();
        assert!(agent.safes().contains(&Cell::new(1, 2)));
        assert!(agent.knowledge().is_empty());
    }

    #[test]
    fn test_safe_move_never_repeats() {
        let mut agent = Agent::new(2, 2);
        agent.add_knowledge(Cell::new(0, 0), 0).unwrap();

        let mv = agent.make_safe_move().unwrap();
        assert!(!agent.moves_made().contains(&mv));
        assert_ne!(mv, Cell::new(0, 0));
    }

    #[test]
    fn test_safe_move_is_none_without_safes() {
        let agent = Agent::new(2, 2);
        assert_eq!(agent.make_safe_move(), None);
    }

    #[test]
    fn test_make_safe_move_does_not_mutate() {
        let mut agent = Agent::new(2, 2);
        agent.add_knowledge(Cell::new(0, 0), 0).unwrap();
        let before = agent.to_bytes().unwrap();
        let _ = agent.make_safe_move();
        assert_eq!(agent.to_bytes().unwrap(), before);
    }

    #[test]
    fn test_random_move_avoids_mines_and_moves() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut agent = Agent::new(1, 3);
        agent.add_knowledge(Cell::new(0, 1), 1).unwrap();
        agent.add_knowledge(Cell::new(0, 0), 0).unwrap();

        // (0,0) and (0,1) are played, (0,2) is a mine.
        assert_eq!(agent.make_random_move(&mut rng), None);
        assert_eq!(agent.next_move(&mut rng), None);
    }

    #[test]
    fn test_random_move_picks_unresolved_cell() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut agent = Agent::new(3, 3);
        agent.add_knowledge(Cell::new(0, 0), 1).unwrap();

        for _ in 0..50 {
            let mv = agent.make_random_move(&mut rng).unwrap();
            assert!(!agent.moves_made().contains(&mv));
            assert!(!agent.mines().contains(&mv));
        }
        assert!(matches!(agent.next_move(&mut rng), Some(Move::Guess(_))));
    }

    #[test]
    fn test_readding_a_cell_is_a_no_op() {
        let mut agent = Agent::new(3, 3);
        agent.add_knowledge(Cell::new(0, 0), 1).unwrap();
        let before = agent.knowledge().to_vec();

        agent.add_knowledge(Cell::new(0, 0), 1).unwrap();
        assert_eq!(agent.knowledge(), before.as_slice());
        assert_eq!(agent.moves_made().len(), 1);
    }

    #[test]
    fn test_out_of_bounds_cell_is_rejected() {
        let mut agent = Agent::new(2, 2);
        let err = agent.add_knowledge(Cell::new(5, 0), 0).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds { .. }));
        assert!(agent.moves_made().is_empty());
    }

    #[test]
    fn test_count_too_large_is_rejected() {
        let mut agent = Agent::new(1, 2);
        let err = agent.add_knowledge(Cell::new(0, 0), 2).unwrap_err();
        assert!(matches!(err, Error::InconsistentCount { count: 2, cells: 1 }));

        // Nothing from the rejected call sticks.
        assert!(agent.moves_made().is_empty());
        assert!(agent.safes().is_empty());
        assert!(agent.knowledge().is_empty());
    }

    #[test]
    fn test_retry_after_rejected_count_is_learned() {
        let mut agent = Agent::new(1, 2);
        assert!(agent.add_knowledge(Cell::new(0, 0), 2).is_err());

        agent.add_knowledge(Cell::new(0, 0), 1).unwrap();
        assert_eq!(agent.moves_made(), &HashSet::from([Cell::new(0, 0)]));
        assert_eq!(agent.mines(), &HashSet::from([Cell::new(0, 1)]));
    }

    #[test]
    fn test_revealing_a_known_mine_is_rejected() {
        let mut agent = Agent::new(1, 3);
        agent.add_knowledge(Cell::new(0, 1), 1).unwrap();
        agent.add_knowledge(Cell::new(0, 0), 0).unwrap();
        assert!(agent.mines().contains(&Cell::new(0, 2)));
        let (moves, safes, mines) = (
            agent.moves_made().clone(),
            agent.safes().clone(),
            agent.mines().clone(),
        );

        let err = agent.add_knowledge(Cell::new(0, 2), 0).unwrap_err();
        assert!(matches!(err, Error::Contradiction(c) if c == Cell::new(0, 2)));
        assert_eq!(agent.moves_made(), &moves);
        assert_eq!(agent.safes(), &safes);
        assert_eq!(agent.mines(), &mines);
    }

    #[test]
    fn test_rejected_sentence_rolls_back_the_reveal() {
        // (0,1) pins mines on both sides, so (0,3) cannot report zero mines
        // when (0,2) is one of its neighbors.
        let mut agent = Agent::new(1, 5);
        agent.add_knowledge(Cell::new(0, 1), 2).unwrap();
        assert_eq!(
            agent.mines(),
            &HashSet::from([Cell::new(0, 0), Cell::new(0, 2)])
        );
        let safes = agent.safes().clone();

        let err = agent.add_knowledge(Cell::new(0, 3), 0).unwrap_err();
        assert!(matches!(err, Error::InconsistentCount { count: -1, .. }));
        assert!(agent.knowledge().is_empty());
        assert_eq!(agent.safes(), &safes);
        assert!(!agent.moves_made().contains(&Cell::new(0, 3)));
    }

    #[test]
    fn test_failed_propagation_rolls_back_the_reveal() {
        // (0,0) sees one mine among (0,1),(1,0),(1,1). (0,1) then claims it has
        // no mine around it, which clears all three.
        let mut agent = Agent::new(3, 3);
        agent.add_knowledge(Cell::new(0, 0), 1).unwrap();
        let knowledge = agent.knowledge().to_vec();
        let (moves, safes) = (agent.moves_made().clone(), agent.safes().clone());

        assert!(agent.add_knowledge(Cell::new(0, 1), 0).is_err());
        assert_eq!(agent.knowledge(), knowledge.as_slice());
        assert_eq!(agent.moves_made(), &moves);
        assert_eq!(agent.safes(), &safes);
        assert!(agent.mines().is_empty());

        // The true count is accepted afterwards.
        agent.add_knowledge(Cell::new(0, 1), 1).unwrap();
        assert!(agent.moves_made().contains(&Cell::new(0, 1)));
    }

    #[test]
    fn test_serialization_preserves_knowledge() {
        let mut agent = Agent::new(4, 4);
        agent.add_knowledge(Cell::new(0, 0), 1).unwrap();
        agent.add_knowledge(Cell::new(3, 3), 0).unwrap();

        let restored = Agent::from_bytes(&agent.to_bytes().unwrap()).unwrap();
        assert_eq!(restored.knowledge(), agent.knowledge());
        assert_eq!(restored.safes(), agent.safes());
        assert_eq!(restored.mines(), agent.mines());
        assert_eq!(restored.moves_made(), agent.moves_made());
        assert_eq!(restored.dims(), agent.dims());
    }
}
