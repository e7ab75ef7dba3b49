use anyhow::{Context, Result};
use clap::Parser;
use match3_engine::animator::KinematicAnimator;
use match3_engine::config::{SessionArgs, SessionConfig};
use match3_engine::engine::Board;
use match3_engine::heuristics::{count_movable_tiles, suggest_swap};
use match3_engine::state_machine::{Mode, PuzzleStateMachine, TickOutcome};
use match3_engine::utils::board_from_str_array;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Run a whole session headless, swapping wherever the hint heuristic points.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    session: SessionArgs,

    /// Seed for tile colors; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Simulation ticks per second
    #[arg(long, default_value_t = 60.0)]
    tick_rate: f32,

    /// Starting board, one row per line, top row first. Overrides --width/--height.
    #[arg(long)]
    board_file: Option<PathBuf>,
}

fn read_board_file(path: &Path) -> Result<Board> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read board file {}", path.display()))?;
    let lines: Vec<&str> = content
        .lines()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    board_from_str_array(&lines).with_context(|| format!("invalid board in {}", path.display()))
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    anyhow::ensure!(args.tick_rate > 0.0, "--tick-rate must be positive");
    let dt = 1.0 / args.tick_rate;

    let mut config = SessionConfig::from(args.session);
    let mut game = match &args.board_file {
        Some(path) => {
            let board = read_board_file(path)?;
            println!("Loaded board from {}\n", path.display());
            println!("Initial board state:\n{}\n", board);
            config.width = board.width();
            config.height = board.height();
            PuzzleStateMachine::with_board(config, board, KinematicAnimator::new(), args.seed)
        }
        None => PuzzleStateMachine::new(config, KinematicAnimator::new(), args.seed),
    }
    .context("invalid session configuration")?;

    let mut swaps = 0u32;
    let mut best_combo = 0u32;
    let mut fewest_movable: Option<usize> = None;
    let final_score = loop {
        game.animator_mut().advance(dt);
        match game.tick(dt) {
            TickOutcome::Finished { final_score } => break final_score,
            TickOutcome::Running(hud) => {
                best_combo = best_combo.max(hud.combo.unwrap_or(0));
            }
        }

        if game.mode() != Mode::Touch {
            continue;
        }
        let movable = count_movable_tiles(game.board(), game.detector());
        fewest_movable = Some(fewest_movable.map_or(movable, |fewest| fewest.min(movable)));
        if let Some(hint) = suggest_swap(game.board(), game.detector()) {
            if game.swipe(hint.from, hint.direction) {
                swaps += 1;
                info!(
                    from = %hint.from,
                    direction = ?hint.direction,
                    clears = hint.immediate_clear,
                    movable,
                    "auto swap"
                );
            }
        }
    };

    println!("Session finished.\n");
    println!("Swaps made: {}", swaps);
    println!("Best combo: {}", best_combo);
    if let Some(fewest) = fewest_movable {
        println!("Fewest movable tiles at a turn: {}", fewest);
    }
    println!("Final score: {}\n", final_score);
    println!("Final board state:\n{}\n", game.board());
    Ok(())
}
