//! Plays a full game: the agent picks moves, the board answers.

use crate::agent::{Agent, Move};
use crate::board::Minesweeper;
use crate::cell::Cell;
use rand::Rng;
use tracing::{debug, info};

/// Represents how a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// Every mine was identified.
    Won { moves: usize },
    /// The agent revealed a mine.
    Lost { at: Cell, moves: usize },
    /// The agent ran out of moves without identifying every mine.
    Exhausted { moves: usize },
}

/// Runs the agent against `board` until the game ends.
///
/// `on_move` is called after every move with the move and the agent's updated
/// state; the bot binary uses it to pace and report play.
pub fn play<R, F>(
    board: &Minesweeper,
    agent: &mut Agent,
    rng: &mut R,
    mut on_move: F,
) -> anyhow::Result<GameOutcome>
where
    R: Rng + ?Sized,
    F: FnMut(Move, &Agent),
{
    if agent.dims() != board.dims {
        anyhow::bail!(
            "agent is sized {:?} but the board is {:?}",
            agent.dims(),
            board.dims
        );
    }

    let mut moves = 0;
    loop {
        if board.won(agent.mines()) {
            info!(moves, "all mines identified");
            return Ok(GameOutcome::Won { moves });
        }

        let Some(mv) = agent.next_move(rng) else {
            info!(moves, "no moves left");
            return Ok(GameOutcome::Exhausted { moves });
        };
        moves += 1;

        let cell = mv.cell();
        let (is_mine, nearby) = board.reveal(cell);
        if is_mine {
            info!(%cell, moves, "revealed a mine");
            return Ok(GameOutcome::Lost { at: cell, moves });
        }

        debug!(?mv, nearby, "revealed");
        agent.add_knowledge(cell, nearby)?;
        on_move(mv, &*agent);
    }
}
