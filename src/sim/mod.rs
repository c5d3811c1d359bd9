//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep ticks and virtual milliseconds only
//! - Seeded RNG only
//! - Stable iteration order (spawn order, then id)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod dilemma;
pub mod runner;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod tap;
pub mod tick;
pub mod timers;

pub use clock::{FrameClock, FrameSteps};
pub use collision::{Aabb, any_hit};
pub use dilemma::{
    Choice, DilemmaGame, DilemmaRules, DilemmaRun, Effect, Ending, LoseReason, Next, Node,
    Scenario, ScenarioGraph,
};
pub use runner::{Runner, RunnerRules, RunnerRun};
pub use session::{GameOver, GameRules, Outcome, Phase, Session};
pub use snapshot::{DilemmaView, ObstacleView, RunnerView, SessionSnapshot, TapView};
pub use state::{Actor, Obstacle, ObstacleKind, RunState};
pub use tap::{BAD_ITEMS, Cell, CellKind, GOOD_ITEMS, Hit, TapGame, TapRules, TapRun};
pub use tick::{TickInput, TickReport, tick};
pub use timers::{Scheduler, TaskId};
