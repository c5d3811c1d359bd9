//! Ramadan Arcade - gameplay core for a browser mini-game hub
//!
//! Core modules:
//! - `sim`: Deterministic simulation (runner physics, tap grid, decision tree, session FSM)
//! - `tuning`: Data-driven game balance
//! - `scores`: Best-score cache, score payloads and leaderboard data
//! - `platform`: Browser/native platform abstraction (viewport, storage)
//! - `renderer`: Screen layout and Canvas2D drawing of simulation snapshots

pub mod error;
pub mod platform;
pub mod renderer;
pub mod scores;
pub mod sim;
pub mod tuning;

pub use error::{ArcadeError, Result};
pub use scores::{BestScores, GameKind, Leaderboard, ScoreSubmission};
pub use tuning::{DilemmaTuning, RunnerTuning, TapTuning, Tuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz display frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta accepted by the clock (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default logical field size (canvas CSS pixels)
    pub const FIELD_WIDTH: f32 = 640.0;
    pub const FIELD_HEIGHT: f32 = 300.0;

    /// Runner physics (units per tick / per tick²)
    pub const GRAVITY: f32 = 0.6;
    pub const JUMP_IMPULSE: f32 = -12.0;
    pub const MAX_JUMPS: u8 = 2;
    pub const GROUND_HEIGHT: f32 = 50.0;

    /// Runner actor box
    pub const ACTOR_X: f32 = 50.0;
    pub const ACTOR_SIZE: f32 = 40.0;

    /// Runner obstacles
    pub const OBSTACLE_WIDTH: f32 = 30.0;
    pub const GROUND_OBSTACLE_HEIGHT: f32 = 40.0;
    pub const AIR_OBSTACLE_HEIGHT: f32 = 30.0;
    /// Top edge of an air obstacle, measured up from the floor
    pub const AIR_OBSTACLE_LIFT: f32 = 110.0;
    pub const AIR_CHANCE: f64 = 0.4;

    /// Runner difficulty and scoring
    pub const START_SPEED: f32 = 5.0;
    pub const SPEED_STEP: f32 = 0.5;
    pub const RAMP_INTERVAL_TICKS: u64 = 600;
    pub const SPAWN_DISTANCE: f32 = 1000.0;
    pub const SPAWN_PADDING: u64 = 20;
    pub const MIN_SPAWN_CADENCE: u64 = 200;
    pub const COLLISION_MARGIN: f32 = 5.0;
    pub const SURVIVAL_POINTS: u64 = 5;

    /// Tap grid
    pub const GRID_CELLS: usize = 9;
    pub const TAP_DURATION_SECS: u32 = 60;

    /// Decision game attributes
    pub const ATTRIBUTE_MIN: i32 = 0;
    pub const ATTRIBUTE_MAX: i32 = 100;
}
