//! Runner state and core simulation types
//!
//! A `RunState` is the single mutable aggregate one runner run operates on.
//! It is built fresh at run start and replaced wholesale on the next start.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::collision::Aabb;
use crate::platform::Viewport;
use crate::tuning::RunnerTuning;

/// The player-controlled runner
#[derive(Debug, Clone)]
pub struct Actor {
    /// Top-left corner (x never changes during a run)
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (units/tick, negative is up)
    pub vel_y: f32,
    pub grounded: bool,
    /// Jumps spent since last touching the floor
    pub jumps_used: u8,
}

impl Actor {
    /// Actor standing on the floor
    pub fn on_floor(x: f32, size: f32, floor_y: f32) -> Self {
        Self {
            pos: Vec2::new(x, floor_y - size),
            size: Vec2::splat(size),
            vel_y: 0.0,
            grounded: true,
            jumps_used: 0,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    /// Advance one tick under constant acceleration, then clamp to the floor
    pub fn integrate(&mut self, gravity: f32, floor_y: f32) {
        self.vel_y += gravity;
        self.pos.y += self.vel_y;

        if self.pos.y + self.size.y >= floor_y {
            self.pos.y = floor_y - self.size.y;
            self.vel_y = 0.0;
            self.grounded = true;
            self.jumps_used = 0;
        }
    }

    /// Jump if the budget allows it; exhausted requests are dropped
    pub fn jump(&mut self, impulse: f32, max_jumps: u8) -> bool {
        if self.jumps_used >= max_jumps {
            return false;
        }
        self.vel_y = impulse;
        self.grounded = false;
        self.jumps_used += 1;
        true
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ObstacleKind {
    /// Sits on the floor, jump over it
    Ground,
    /// Hangs above a standing actor, dangerous only mid-jump
    Air,
}

/// A scrolling obstacle
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Obstacle {
    /// New obstacle at the right edge of the field
    pub fn spawn(id: u32, kind: ObstacleKind, tuning: &RunnerTuning, field: &Viewport) -> Self {
        let floor_y = floor_y(tuning, field);
        let (y, height) = match kind {
            ObstacleKind::Ground => (
                floor_y - tuning.ground_obstacle_height,
                tuning.ground_obstacle_height,
            ),
            ObstacleKind::Air => (
                floor_y - tuning.air_obstacle_lift,
                tuning.air_obstacle_height,
            ),
        };
        Self {
            id,
            kind,
            pos: Vec2::new(field.width, y),
            size: Vec2::new(tuning.obstacle_width, height),
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    /// Trailing edge has left the field
    pub fn is_off_screen(&self) -> bool {
        self.pos.x + self.size.x < 0.0
    }
}

/// Floor line for a field: everything rests on top of the ground strip
pub fn floor_y(tuning: &RunnerTuning, field: &Viewport) -> f32 {
    field.height - tuning.ground_height
}

/// Complete runner state for one run (deterministic)
#[derive(Debug, Clone)]
pub struct RunState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub field: Viewport,
    pub floor_y: f32,
    pub actor: Actor,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Scroll speed (never decreases)
    pub speed: f32,
    /// Ticks simulated so far
    pub frame: u64,
    pub score: u64,
    /// Obstacles spawned / pruned this run (prune accounting)
    pub spawned: u64,
    pub passed: u64,
    /// Cleared when the actor collides
    pub playing: bool,
    /// Jump queued by input for the next tick
    pub pending_jump: bool,
    next_id: u32,
}

impl RunState {
    /// Create a new run with the given seed
    pub fn new(seed: u64, tuning: &RunnerTuning, field: Viewport) -> Self {
        let floor_y = floor_y(tuning, &field);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            field,
            floor_y,
            actor: Actor::on_floor(tuning.actor_x, tuning.actor_size, floor_y),
            obstacles: Vec::new(),
            speed: tuning.start_speed,
            frame: 0,
            score: 0,
            spawned: 0,
            passed: 0,
            playing: true,
            pending_jump: false,
            next_id: 1,
        }
    }

    /// Allocate a new obstacle ID
    pub fn next_obstacle_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
