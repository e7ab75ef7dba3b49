//! # Match-3 Rules Engine
//!
//! This library provides the rules of a match-3 tile puzzle: which tiles match,
//! how player swaps resolve, how gravity refills the board, and how score and
//! combos accumulate over a timed session. Rendering, input capture and audio
//! live outside; the engine talks to them through the `TileAnimator` trait and
//! plain method calls.
//!
//! It is used by two binaries:
//! - `human_player`: play a session in the terminal by typing swaps.
//! - `auto_player`: run a whole session headless, driven by the hint heuristic.
//!
//! ## Modules
//! - `engine`: tiles, indices and the `Board` grid with get/set/swap.
//! - `matching`: `MatchDetector`, finding clearable runs and legal swaps.
//! - `gravity`: dropping tiles into gaps after a clear.
//! - `scoring`: `ScoreTracker`, score and combo bookkeeping.
//! - `world`: index/world coordinate conversion and drag resolution.
//! - `animator`: the animation collaborator trait and a headless implementation.
//! - `state_machine`: `PuzzleStateMachine`, the tick-driven session.
//! - `config`, `error`: session configuration and its validation errors.
//! - `heuristics`: swap suggestions.
//! - `utils`: text board fixtures.

pub mod animator;
pub mod config;
pub mod engine;
pub mod error;
pub mod gravity;
pub mod heuristics;
pub mod matching;
pub mod scoring;
pub mod state_machine;
pub mod utils;
pub mod world;
