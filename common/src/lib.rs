//! A minesweeper agent that reasons with a propositional knowledge base.
//!
//! Every revealed cell becomes a [`Sentence`] ("exactly `count` of these cells are
//! mines"). The [`KnowledgeBase`] marks cells that a sentence fully determines and
//! derives new sentences by subset resolution until nothing changes. The [`Agent`]
//! plays a proven-safe cell whenever one exists and guesses among unresolved cells
//! otherwise.

pub mod agent;
pub mod board;
pub mod cell;
pub mod error;
pub mod game;
pub mod knowledge;
pub mod sentence;

pub use agent::{Agent, Move};
pub use board::Minesweeper;
pub use cell::{Cell, Dimensions};
pub use error::{Error, Result};
pub use game::{GameOutcome, play};
pub use knowledge::KnowledgeBase;
pub use sentence::Sentence;
