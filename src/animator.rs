//! The animation collaborator seen from the rules engine, plus a headless
//! kinematic implementation.
//!
//! The state machine never moves anything visually itself. It tells the animator
//! where tiles should end up and polls `is_animating` to know when the board has
//! settled. Frontends supply their own `TileAnimator`; `KinematicAnimator` steps
//! the same motion model without rendering, for terminal play and tests.
use crate::engine::TileId;
use crate::world::WorldPoint;
use std::collections::HashMap;

/// Per-tile motion and effects, driven by the state machine.
pub trait TileAnimator {
    /// A freshly spawned tile appears at `at` (usually above the board).
    fn spawn(&mut self, tile: TileId, at: WorldPoint);

    /// Constant-speed move toward `target`. Marks the tile animating.
    fn begin_move_to(&mut self, tile: TileId, target: WorldPoint);

    /// Accelerating fall toward `target`. Marks the tile animating.
    fn begin_gravity_fall_to(&mut self, tile: TileId, target: WorldPoint);

    /// Whether the tile still has motion in flight.
    fn is_animating(&self, tile: TileId) -> bool;

    /// Start the removal effect. The tile is already gone from the board when
    /// this is called; disposal timing is the animator's business.
    fn play_clear_effect(&mut self, tile: TileId);

    /// Drop the tile with no effect, as when the whole session is thrown away.
    fn despawn(&mut self, tile: TileId);
}

/// Swap speed in world units per second.
pub const MOVE_SPEED: f32 = 3.5;

/// Falls accelerate at `GRAVITY * FALL_GRAVITY_SCALE` units/s².
pub const GRAVITY: f32 = 9.81;
pub const FALL_GRAVITY_SCALE: f32 = 3.5;

/// Seconds a cleared tile's effect lingers before disposal.
pub const CLEAR_EFFECT_LIFETIME: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Motion {
    Idle,
    Linear,
    Falling { speed: f32 },
}

#[derive(Clone, Copy, Debug)]
struct Sprite {
    position: WorldPoint,
    target: WorldPoint,
    remaining_distance: f32,
    motion: Motion,
}

impl Sprite {
    fn start(&mut self, target: WorldPoint, motion: Motion) {
        self.target = target;
        self.remaining_distance = self.position.distance(target);
        self.motion = motion;
    }

    fn step(&mut self, dt: f32) {
        let travelled = match self.motion {
            Motion::Idle => return,
            Motion::Linear => MOVE_SPEED * dt,
            Motion::Falling { ref mut speed } => {
                *speed += GRAVITY * FALL_GRAVITY_SCALE * dt;
                *speed * dt
            }
        };

        self.position = move_towards(self.position, self.target, travelled);
        self.remaining_distance -= travelled;
        if self.remaining_distance < 0.0 {
            self.position = self.target;
            self.motion = Motion::Idle;
        }
    }
}

fn move_towards(from: WorldPoint, to: WorldPoint, max_step: f32) -> WorldPoint {
    let distance = from.distance(to);
    if distance <= max_step || distance == 0.0 {
        return to;
    }
    let t = max_step / distance;
    WorldPoint::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t)
}

/// Headless animator: tracks positions and steps motion on `advance`.
#[derive(Debug, Default)]
pub struct KinematicAnimator {
    sprites: HashMap<TileId, Sprite>,
    effects: Vec<(TileId, f32)>,
}

impl KinematicAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Steps every moving tile and ages clear effects by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        for sprite in self.sprites.values_mut() {
            sprite.step(dt);
        }
        for (_, remaining) in self.effects.iter_mut() {
            *remaining -= dt;
        }
        self.effects.retain(|&(_, remaining)| remaining > 0.0);
    }

    pub fn position(&self, tile: TileId) -> Option<WorldPoint> {
        self.sprites.get(&tile).map(|s| s.position)
    }

    /// Clear effects still playing.
    pub fn active_effects(&self) -> usize {
        self.effects.len()
    }

    /// Tiles the animator is tracking on the board.
    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    fn sprite_mut(&mut self, tile: TileId, fallback: WorldPoint) -> &mut Sprite {
        self.sprites.entry(tile).or_insert(Sprite {
            position: fallback,
            target: fallback,
            remaining_distance: 0.0,
            motion: Motion::Idle,
        })
    }
}

impl TileAnimator for KinematicAnimator {
    fn spawn(&mut self, tile: TileId, at: WorldPoint) {
        self.sprites.insert(
            tile,
            Sprite {
                position: at,
                target: at,
                remaining_distance: 0.0,
                motion: Motion::Idle,
            },
        );
    }

    fn begin_move_to(&mut self, tile: TileId, target: WorldPoint) {
        self.sprite_mut(tile, target).start(target, Motion::Linear);
    }

    fn begin_gravity_fall_to(&mut self, tile: TileId, target: WorldPoint) {
        self.sprite_mut(tile, target)
            .start(target, Motion::Falling { speed: 0.0 });
    }

    fn is_animating(&self, tile: TileId) -> bool {
        self.sprites
            .get(&tile)
            .is_some_and(|s| s.motion != Motion::Idle)
    }

    fn play_clear_effect(&mut self, tile: TileId) {
        self.sprites.remove(&tile);
        self.effects.push((tile, CLEAR_EFFECT_LIFETIME));
    }

    fn despawn(&mut self, tile: TileId) {
        self.sprites.remove(&tile);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_move_settles_at_target() {
        let mut animator = KinematicAnimator::new();
        let tile = TileId(1);
        animator.spawn(tile, WorldPoint::new(0.0, 0.0));
        animator.begin_move_to(tile, WorldPoint::new(1.0, 0.0));
        assert!(animator.is_animating(tile));

        animator.advance(0.1);
        let halfway = animator.position(tile).unwrap();
        assert!((halfway.x - 0.35).abs() < 1e-5);
        assert!(animator.is_animating(tile));

        for _ in 0..10 {
            animator.advance(0.1);
        }
        assert!(!animator.is_animating(tile));
        assert_eq!(animator.position(tile), Some(WorldPoint::new(1.0, 0.0)));
    }

    #[test]
    fn test_gravity_fall_accelerates() {
        let mut animator = KinematicAnimator::new();
        let tile = TileId(7);
        animator.spawn(tile, WorldPoint::new(0.0, 10.0));
        animator.begin_gravity_fall_to(tile, WorldPoint::new(0.0, 0.0));

        animator.advance(0.1);
        let first = 10.0 - animator.position(tile).unwrap().y;
        animator.advance(0.1);
        let second = 10.0 - animator.position(tile).unwrap().y - first;
        assert!(second > first, "fall should speed up: {} then {}", first, second);

        for _ in 0..50 {
            animator.advance(0.1);
        }
        assert!(!animator.is_animating(tile));
        assert_eq!(animator.position(tile), Some(WorldPoint::new(0.0, 0.0)));
    }

    #[test]
    fn test_clear_effect_expires() {
        let mut animator = KinematicAnimator::new();
        let tile = TileId(3);
        animator.spawn(tile, WorldPoint::default());
        animator.play_clear_effect(tile);

        assert_eq!(animator.sprite_count(), 0);
        assert!(!animator.is_animating(tile));
        assert_eq!(animator.active_effects(), 1);

        animator.advance(1.5);
        assert_eq!(animator.active_effects(), 1);
        animator.advance(0.6);
        assert_eq!(animator.active_effects(), 0);
    }

    #[test]
    fn test_unknown_tile_is_idle() {
        let animator = KinematicAnimator::new();
        assert!(!animator.is_animating(TileId(42)));
        assert_eq!(animator.position(TileId(42)), None);
    }
}
