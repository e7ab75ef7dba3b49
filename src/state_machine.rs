//! The puzzle session: a tick-driven state machine over the board.
//!
//! Each call to `PuzzleStateMachine::tick` counts down the session clock and
//! advances at most one mode transition:
//!
//! ```text
//! WaitFall -> Delete -> Fall -> Spawn -> WaitFall ...
//!               |
//!               +-> Touch -> WaitSwap -> Delete
//!                     ^         |
//!                     |         v
//!                     +--- WaitBackSwap
//! ```
//!
//! Waiting modes poll the animator every tick instead of blocking. Player input
//! is only accepted in `Touch`; a press/release pair becomes exactly one swap
//! attempt on the next tick.
use crate::animator::TileAnimator;
use crate::config::SessionConfig;
use crate::engine::{Board, BoardIndex, Direction, Tile, TileId};
use crate::error::ConfigError;
use crate::matching::MatchDetector;
use crate::scoring::ScoreTracker;
use crate::world::{drag_direction, WorldGrid, WorldPoint};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

/// The current phase of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Waiting for every tile to finish moving.
    WaitFall,
    /// Clearing runs, or the whole board when no move is possible.
    Delete,
    /// Dropping tiles into the gaps.
    Fall,
    /// Refilling empty cells from above.
    Spawn,
    /// Waiting for a player gesture.
    Touch,
    /// Waiting for a player swap to finish moving.
    WaitSwap,
    /// Waiting for a rejected swap to move back.
    WaitBackSwap,
}

/// The two cells a player gesture swapped, held until the swap is resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingSwap {
    pub index_a: BoardIndex,
    pub index_b: BoardIndex,
}

#[derive(Clone, Copy, Debug)]
struct Gesture {
    index: BoardIndex,
    press_point: WorldPoint,
    release_point: Option<WorldPoint>,
}

/// What a presentation layer shows each tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hud {
    pub score: u64,
    /// `None` until at least two clears have chained.
    pub combo: Option<u32>,
    pub remaining_seconds: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Running(Hud),
    /// The clock ran out. Returned on the expiring tick and every tick after.
    Finished { final_score: u64 },
}

/// One match-3 session: board, score, clock and the mode machine driving them.
pub struct PuzzleStateMachine<A: TileAnimator> {
    config: SessionConfig,
    board: Board,
    detector: MatchDetector,
    grid: WorldGrid,
    scores: ScoreTracker,
    animator: A,
    rng: SmallRng,
    next_tile_id: u64,
    mode: Mode,
    remaining_time: f32,
    gesture: Option<Gesture>,
    pending_swap: Option<PendingSwap>,
    finished: bool,
}

impl<A: TileAnimator> PuzzleStateMachine<A> {
    /// Starts a session on an empty board, spawning a full set of tiles that
    /// fall in from above. `seed` makes tile colors reproducible.
    #[instrument(skip_all, fields(width = config.width, height = config.height, seed = ?seed))]
    pub fn new(config: SessionConfig, animator: A, seed: Option<u64>) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::new_empty(config.width, config.height);
        Ok(Self::start(config, board, animator, seed))
    }

    /// Starts a session on a prepared board. Existing tiles are registered with
    /// the animator in place; any empty cells are spawned like a normal refill.
    #[instrument(skip_all, fields(width = config.width, height = config.height, seed = ?seed))]
    pub fn with_board(
        config: SessionConfig,
        board: Board,
        mut animator: A,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if board.width() != config.width || board.height() != config.height {
            return Err(ConfigError::BoardMismatch {
                width: config.width,
                height: config.height,
                actual_width: board.width(),
                actual_height: board.height(),
            });
        }
        if let Some((index, tile)) = board
            .occupied()
            .find(|(_, tile)| tile.color() >= config.color_count)
        {
            return Err(ConfigError::ColorOutOfRange {
                x: index.x,
                y: index.y,
                color: tile.color(),
                color_count: config.color_count,
            });
        }
        let grid = WorldGrid::new(config.width, config.height);
        for (index, tile) in board.occupied() {
            animator.spawn(tile.id(), grid.index_to_world(index));
        }
        Ok(Self::start(config, board, animator, seed))
    }

    fn start(config: SessionConfig, board: Board, animator: A, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let next_tile_id = board
            .occupied()
            .map(|(_, tile)| tile.id().0 + 1)
            .max()
            .unwrap_or(0);

        let mut session = PuzzleStateMachine {
            grid: WorldGrid::new(config.width, config.height),
            detector: MatchDetector::new(config.match_color_count),
            scores: ScoreTracker::new(config.base_score_per_tile),
            remaining_time: config.session_duration,
            config,
            board,
            animator,
            rng,
            next_tile_id,
            mode: Mode::WaitFall,
            gesture: None,
            pending_swap: None,
            finished: false,
        };
        session.spawn_tiles();
        info!(tiles = session.board.tile_count(), "session started");
        session
    }

    /// Throws the board away and starts over with the same configuration.
    pub fn restart(&mut self) {
        let indices: Vec<BoardIndex> = self.board.indices().collect();
        for index in indices {
            if let Some(tile) = self.board.take(index) {
                self.animator.despawn(tile.id());
            }
        }
        self.scores = ScoreTracker::new(self.config.base_score_per_tile);
        self.remaining_time = self.config.session_duration;
        self.gesture = None;
        self.pending_swap = None;
        self.finished = false;
        self.mode = Mode::WaitFall;
        self.spawn_tiles();
        info!("session restarted");
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn detector(&self) -> &MatchDetector {
        &self.detector
    }

    pub fn world_grid(&self) -> &WorldGrid {
        &self.grid
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }

    /// The animator is stepped by whoever owns the frame loop.
    pub fn animator_mut(&mut self) -> &mut A {
        &mut self.animator
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn score(&self) -> u64 {
        self.scores.score()
    }

    pub fn combo_count(&self) -> u32 {
        self.scores.combo_count()
    }

    pub fn remaining_time(&self) -> f32 {
        self.remaining_time
    }

    pub fn pending_swap(&self) -> Option<PendingSwap> {
        self.pending_swap
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn hud(&self) -> Hud {
        let remaining_seconds = if self.finished {
            0
        } else {
            (self.remaining_time + 1.0).max(0.0) as u32
        };
        Hud {
            score: self.scores.score(),
            combo: self.scores.displayed_combo(),
            remaining_seconds,
        }
    }

    /// Player pressed on the tile at `index`. Ignored outside `Touch`, while a
    /// gesture is already in progress, or when the cell holds no tile.
    pub fn press_at(&mut self, index: BoardIndex, point: WorldPoint) -> bool {
        if self.finished || self.mode != Mode::Touch || self.gesture.is_some() {
            return false;
        }
        if self.board.get(index).is_none() {
            return false;
        }
        self.gesture = Some(Gesture {
            index,
            press_point: point,
            release_point: None,
        });
        true
    }

    /// `press_at` on the cell whose square contains the world position.
    pub fn press_at_world(&mut self, point: WorldPoint) -> bool {
        let index = self.grid.point_to_index(point);
        self.press_at(index, point)
    }

    /// Player released at `point`. The swap happens on the next tick.
    pub fn release_at(&mut self, point: WorldPoint) -> bool {
        if self.finished || self.mode != Mode::Touch {
            return false;
        }
        match self.gesture.as_mut() {
            Some(gesture) if gesture.release_point.is_none() => {
                gesture.release_point = Some(point);
                true
            }
            _ => false,
        }
    }

    /// A complete drag from the centre of `index` toward `direction`.
    pub fn swipe(&mut self, index: BoardIndex, direction: Direction) -> bool {
        let from = self.grid.index_to_world(index);
        let (dx, dy) = direction.delta();
        let to = WorldPoint::new(from.x + dx as f32 * 0.6, from.y + dy as f32 * 0.6);
        self.press_at(index, from) && self.release_at(to)
    }

    /// Advances the session by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> TickOutcome {
        if self.finished {
            return TickOutcome::Finished {
                final_score: self.scores.score(),
            };
        }

        self.remaining_time -= dt;
        if self.remaining_time <= 0.0 {
            self.finished = true;
            self.gesture = None;
            info!(score = self.scores.score(), "session over");
            return TickOutcome::Finished {
                final_score: self.scores.score(),
            };
        }

        let next = match self.mode {
            Mode::WaitFall => self.wait_fall_mode(),
            Mode::Delete => self.delete_mode(),
            Mode::Fall => self.fall_mode(),
            Mode::Spawn => self.spawn_mode(),
            Mode::Touch => self.touch_mode(),
            Mode::WaitSwap => self.wait_swap_mode(),
            Mode::WaitBackSwap => self.wait_back_swap_mode(),
        };
        if next != self.mode {
            debug!(from = ?self.mode, to = ?next, "mode transition");
            self.mode = next;
        }
        TickOutcome::Running(self.hud())
    }

    fn wait_fall_mode(&mut self) -> Mode {
        if self.is_settled() {
            Mode::Delete
        } else {
            Mode::WaitFall
        }
    }

    fn delete_mode(&mut self) -> Mode {
        let clearable = self.detector.find_all_clearable(&self.board);
        if !clearable.is_empty() {
            self.clear_tiles(&clearable);
            return Mode::Fall;
        }

        if self.detector.has_any_legal_move(&self.board) {
            return Mode::Touch;
        }

        let everything: BTreeSet<BoardIndex> =
            self.board.occupied().map(|(index, _)| index).collect();
        info!(tiles = everything.len(), "no legal moves left, clearing the board");
        self.clear_tiles(&everything);
        Mode::Fall
    }

    fn fall_mode(&mut self) -> Mode {
        for fall in self.board.fall_all() {
            self.animator
                .begin_gravity_fall_to(fall.tile, self.grid.index_to_world(fall.to));
        }
        Mode::Spawn
    }

    fn spawn_mode(&mut self) -> Mode {
        self.spawn_tiles();
        Mode::WaitFall
    }

    fn touch_mode(&mut self) -> Mode {
        let Some(gesture) = self.gesture else {
            return Mode::Touch;
        };
        let Some(release_point) = gesture.release_point else {
            return Mode::Touch;
        };
        self.gesture = None;

        let index_b = match drag_direction(gesture.press_point, release_point) {
            Some(direction) => gesture.index.neighbor(direction),
            None => gesture.index,
        };
        let swap = PendingSwap {
            index_a: gesture.index,
            index_b,
        };
        debug!(a = %swap.index_a, b = %swap.index_b, "player swap");
        self.swap_tiles(swap.index_a, swap.index_b);
        self.scores.begin_player_swap();
        self.pending_swap = Some(swap);
        Mode::WaitSwap
    }

    fn wait_swap_mode(&mut self) -> Mode {
        if !self.is_settled() {
            return Mode::WaitSwap;
        }
        if !self.detector.find_all_clearable(&self.board).is_empty() {
            self.pending_swap = None;
            return Mode::Delete;
        }
        if let Some(swap) = self.pending_swap {
            self.swap_tiles(swap.index_a, swap.index_b);
        }
        Mode::WaitBackSwap
    }

    fn wait_back_swap_mode(&mut self) -> Mode {
        if !self.is_settled() {
            return Mode::WaitBackSwap;
        }
        self.pending_swap = None;
        Mode::Touch
    }

    /// True when no tile on the board has motion in flight.
    fn is_settled(&self) -> bool {
        self.board
            .occupied()
            .all(|(_, tile)| !self.animator.is_animating(tile.id()))
    }

    /// Swaps two cells and animates both tiles to their new cells.
    fn swap_tiles(&mut self, a: BoardIndex, b: BoardIndex) {
        if !self.board.swap_cells(a, b) {
            return;
        }
        for index in [a, b] {
            if let Some(tile) = self.board.get(index) {
                self.animator
                    .begin_move_to(tile.id(), self.grid.index_to_world(index));
            }
        }
    }

    /// Removes the tiles at `indices` and scores them as one clear cycle.
    fn clear_tiles(&mut self, indices: &BTreeSet<BoardIndex>) {
        for &index in indices {
            if let Some(tile) = self.board.take(index) {
                self.animator.play_clear_effect(tile.id());
            }
        }
        let gained = self.scores.record_clear(indices.len());
        debug!(
            cleared = indices.len(),
            gained,
            combo = self.scores.combo_count(),
            score = self.scores.score(),
            "clear cycle"
        );
    }

    /// Fills every empty cell, column by column from the lowest gap up. New tiles
    /// start stacked above the top row and fall into place.
    fn spawn_tiles(&mut self) {
        let width = self.config.width as i32;
        let height = self.config.height as i32;
        for x in 0..width {
            let mut staged = 0;
            for y in 0..height {
                let index = BoardIndex::new(x, y);
                if self.board.get(index).is_some() {
                    continue;
                }
                let color = self.rng.gen_range(0..self.config.color_count);
                let tile = Tile::new(self.allocate_id(), color);
                let staging = BoardIndex::new(x, height + staged);
                self.animator.spawn(tile.id(), self.grid.index_to_world(staging));
                self.animator
                    .begin_gravity_fall_to(tile.id(), self.grid.index_to_world(index));
                self.board.set(index, Some(tile));
                staged += 1;
            }
        }
    }

    fn allocate_id(&mut self) -> TileId {
        let id = TileId(self.next_tile_id);
        self.next_tile_id += 1;
        id
    }
}
