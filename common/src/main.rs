use clap::Parser;
use minesweeper_ai::{Agent, Dimensions, GameOutcome, Minesweeper, Move, play};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::thread;
use std::time::Duration;
use tracing::info;

/// Autonomous minesweeper bot: plays logically safe moves, guesses otherwise.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Board height
    #[arg(long, default_value = "8")]
    height: usize,

    /// Board width
    #[arg(long, default_value = "8")]
    width: usize,

    /// Number of mines on the board
    #[arg(short, long, default_value = "8")]
    mines: usize,

    /// Number of games to play
    #[arg(short, long, default_value = "1")]
    games: usize,

    /// Seed for mine placement and guesses (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Pause between moves, to make the game watchable
    #[arg(long, default_value = "0")]
    delay_ms: u64,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("minesweeper_ai={default_level}").into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(args.verbose)
        .init();

    let dims = Dimensions::new(args.height, args.width);
    if args.mines >= dims.area() {
        anyhow::bail!(
            "{} mines do not fit on a {}x{} board",
            args.mines,
            args.height,
            args.width
        );
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let delay = Duration::from_millis(args.delay_ms);

    let (mut won, mut lost, mut exhausted) = (0, 0, 0);
    for game in 1..=args.games {
        let board = Minesweeper::new(dims, args.mines, &mut rng);
        let mut agent = Agent::new(args.height, args.width);

        let outcome = play(&board, &mut agent, &mut rng, |mv, agent| {
            match mv {
                Move::Safe(cell) => info!(game, %cell, "safe move"),
                Move::Guess(cell) => info!(game, %cell, "no safe move known, guessing"),
            }
            info!(
                game,
                mines_found = agent.mines().len(),
                known_safe = agent.safes().len(),
                sentences = agent.knowledge().len(),
                "board state"
            );
            if !delay.is_zero() {
                thread::sleep(delay);
            }
        })?;

        match outcome {
            GameOutcome::Won { moves } => {
                won += 1;
                info!(game, moves, "the bot won");
            }
            GameOutcome::Lost { at, moves } => {
                lost += 1;
                info!(game, %at, moves, "the bot hit a mine and lost");
            }
            GameOutcome::Exhausted { moves } => {
                exhausted += 1;
                info!(game, moves, "the bot ran out of moves");
            }
        }
    }

    println!(
        "Played {} game(s) on {}x{} with {} mines: {} won, {} lost, {} stalled",
        args.games, args.height, args.width, args.mines, won, lost, exhausted
    );
    Ok(())
}
