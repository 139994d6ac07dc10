//! Error types for the knowledge base and the agent.
//!
//! Every variant except `Encoding` marks a broken invariant: either the caller
//! violated a precondition or the facts it reported contradict each other. None
//! of them are part of normal play ("no move available" is `None`, not an error).

use crate::cell::Cell;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("cell {cell} is outside the {height}x{width} board")]
    OutOfBounds {
        cell: Cell,
        height: usize,
        width: usize,
    },

    #[error("cell {0} is not part of the sentence")]
    CellNotInSentence(Cell),

    #[error("inconsistent mine count: {count} mines among {cells} unresolved cells")]
    InconsistentCount { count: isize, cells: usize },

    #[error("cell {0} is known to be both safe and a mine")]
    Contradiction(Cell),

    #[error("agent state encoding failed: {0}")]
    Encoding(#[from] bcs::Error),
}
