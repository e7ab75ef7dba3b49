use anyhow::{Context, Result};
use clap::Parser;
use match3_engine::animator::KinematicAnimator;
use match3_engine::config::{SessionArgs, SessionConfig};
use match3_engine::engine::{BoardIndex, Direction};
use match3_engine::heuristics::suggest_swap;
use match3_engine::state_machine::{Hud, Mode, PuzzleStateMachine, TickOutcome};
use std::io::{self, BufRead, Write};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Play a timed match-3 session in the terminal.
///
/// Animations are simulated at `--tick-rate` and the time spent thinking at the
/// prompt is charged to the session clock when the next command is entered.
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
}

enum Command {
    Swap(BoardIndex, Direction),
    Hint,
    Restart,
    Quit,
}

fn parse_direction(s: &str) -> Option<Direction> {
    match s {
        "l" | "left" => Some(Direction::Left),
        "r" | "right" => Some(Direction::Right),
        "u" | "up" => Some(Direction::Up),
        "d" | "down" => Some(Direction::Down),
        _ => None,
    }
}

fn parse_command(input: &str) -> Option<Command> {
    let parts: Vec<&str> = input.split_whitespace().collect();
    match parts.as_slice() {
        ["q"] => Some(Command::Quit),
        ["h"] => Some(Command::Hint),
        ["r"] => Some(Command::Restart),
        [x, y, dir] => {
            let x = x.parse::<i32>().ok()?;
            let y = y.parse::<i32>().ok()?;
            Some(Command::Swap(BoardIndex::new(x, y), parse_direction(dir)?))
        }
        _ => None,
    }
}

/// Ticks until the board waits for input. Returns `None` once the clock runs out.
fn run_until_input(game: &mut PuzzleStateMachine<KinematicAnimator>, dt: f32) -> Option<Hud> {
    loop {
        game.animator_mut().advance(dt);
        match game.tick(dt) {
            TickOutcome::Finished { .. } => return None,
            TickOutcome::Running(hud) if game.mode() == Mode::Touch => return Some(hud),
            TickOutcome::Running(_) => {}
        }
    }
}

fn print_status(game: &PuzzleStateMachine<KinematicAnimator>, hud: Hud) {
    println!("---------------------");
    match hud.combo {
        Some(combo) => println!(
            "Time: {}, Score: {}, Combo: {}",
            hud.remaining_seconds, hud.score, combo
        ),
        None => println!("Time: {}, Score: {}", hud.remaining_seconds, hud.score),
    }
    println!("{}", game.board().to_string_with_highlight(None));
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    anyhow::ensure!(args.tick_rate > 0.0, "--tick-rate must be positive");
    let dt = 1.0 / args.tick_rate;

    let config = SessionConfig::from(args.session);
    let mut game = PuzzleStateMachine::new(config, KinematicAnimator::new(), args.seed)
        .context("invalid session configuration")?;
    println!("Welcome to Match-3!");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut hud = run_until_input(&mut game, dt);

    while let Some(current) = hud {
        print_status(&game, current);
        print!("Enter a swap (x y l|r|u|d), 'h' for a hint, 'r' to restart, 'q' to quit: ");
        io::stdout().flush().context("failed to flush stdout")?;

        let thinking_started = Instant::now();
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read input")?;

        // Thinking time counts against the clock.
        if let TickOutcome::Finished { .. } = game.tick(thinking_started.elapsed().as_secs_f32()) {
            println!("Time's up!");
            hud = None;
            continue;
        }

        match parse_command(line.trim()) {
            Some(Command::Quit) => {
                println!("Thanks for playing!");
                return Ok(());
            }
            Some(Command::Restart) => {
                game.restart();
                println!("New board.");
                hud = run_until_input(&mut game, dt);
            }
            Some(Command::Hint) => {
                match suggest_swap(game.board(), game.detector()) {
                    Some(hint) => println!(
                        "Try {} {:?} (clears {}).",
                        hint.from, hint.direction, hint.immediate_clear
                    ),
                    None => println!("No swap clears anything."),
                }
                hud = Some(game.hud());
            }
            Some(Command::Swap(index, direction)) => {
                if game.board().is_out_of_range(index) {
                    println!(
                        "Invalid coordinates: x must be below {} and y below {}.",
                        game.board().width(),
                        game.board().height()
                    );
                    hud = Some(game.hud());
                } else if game.swipe(index, direction) {
                    hud = run_until_input(&mut game, dt);
                } else {
                    println!("Invalid move: no tile at {}.", index);
                    hud = Some(game.hud());
                }
            }
            None => {
                println!("Invalid input format. Use 'x y dir', 'h', 'r' or 'q'.");
                hud = Some(game.hud());
            }
        }
    }

    println!();
    println!("---------------------");
    println!("🎉 GAME OVER! 🎉");
    println!("Final Score: {}", game.score());
    println!("---------------------");
    Ok(())
}
