//! Fixed timestep runner tick
//!
//! Core game loop that advances a runner run deterministically. One call is
//! one tick: jump input, physics, spawning, scrolling and pruning, collision,
//! then the difficulty ramp.

use rand::Rng;

use super::collision::any_hit;
use super::state::{Obstacle, ObstacleKind, RunState};
use crate::tuning::RunnerTuning;

/// Ticks of lead the autopilot gives itself before a ground obstacle
const AUTOPILOT_LEAD_TICKS: f32 = 10.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (space/tap/click)
    pub jump: bool,
    /// Idle/demo mode - the runner jumps by itself
    pub autopilot: bool,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub spawned: bool,
    /// Obstacles that scrolled off the field this tick
    pub passed: u32,
    pub collided: bool,
}

/// Advance the run by one fixed timestep
pub fn tick(state: &mut RunState, input: &TickInput, tuning: &RunnerTuning) -> TickReport {
    let mut report = TickReport::default();

    // Nothing moves once the run has ended
    if !state.playing {
        return report;
    }

    let queued = std::mem::take(&mut state.pending_jump);
    let wants_jump =
        queued || input.jump || (input.autopilot && autopilot_wants_jump(state, tuning));
    if wants_jump {
        state.actor.jump(tuning.jump_impulse, tuning.max_jumps);
    }

    state.actor.integrate(tuning.gravity, state.floor_y);

    if state.frame % tuning.spawn_cadence(state.speed) == 0 {
        spawn_obstacle(state, tuning);
        report.spawned = true;
    }

    report.passed = advance_and_prune(state, tuning);

    let actor = state.actor.aabb();
    if any_hit(
        &actor,
        state.obstacles.iter().map(Obstacle::aabb),
        tuning.collision_margin,
    ) {
        state.playing = false;
        report.collided = true;
        log::info!(
            "Runner hit an obstacle at tick {} (score {}, speed {})",
            state.frame,
            state.score,
            state.speed
        );
        return report;
    }

    state.frame += 1;
    if state.frame % tuning.ramp_interval == 0 {
        state.speed += tuning.speed_step;
        log::debug!("Speed up to {} at tick {}", state.speed, state.frame);
    }

    report
}

/// Append a new obstacle at the right edge
fn spawn_obstacle(state: &mut RunState, tuning: &RunnerTuning) {
    let kind = if state.rng.random_bool(tuning.air_chance) {
        ObstacleKind::Air
    } else {
        ObstacleKind::Ground
    };
    let id = state.next_obstacle_id();
    state
        .obstacles
        .push(Obstacle::spawn(id, kind, tuning, &state.field));
    state.spawned += 1;
    log::debug!("Spawned {:?} obstacle #{} at tick {}", kind, id, state.frame);
}

/// Scroll every obstacle left and drop the ones that left the field.
///
/// Each dropped obstacle credits the survival bonus once: it is removed from
/// the live set in the same step, so it can never be counted again.
fn advance_and_prune(state: &mut RunState, tuning: &RunnerTuning) -> u32 {
    let speed = state.speed;
    for obstacle in &mut state.obstacles {
        obstacle.pos.x -= speed;
    }

    let before = state.obstacles.len();
    state.obstacles.retain(|o| !o.is_off_screen());
    let passed = (before - state.obstacles.len()) as u32;

    if passed > 0 {
        state.passed += u64::from(passed);
        state.score += u64::from(passed) * tuning.survival_points;
    }
    passed
}

/// Demo-mode heuristic: hop when the nearest ground obstacle is close
fn autopilot_wants_jump(state: &RunState, tuning: &RunnerTuning) -> bool {
    if !state.actor.grounded {
        return false;
    }
    let front = state.actor.pos.x + state.actor.size.x - tuning.collision_margin;
    let lead = state.speed * AUTOPILOT_LEAD_TICKS;

    state
        .obstacles
        .iter()
        .filter(|o| o.kind == ObstacleKind::Ground)
        .map(|o| o.pos.x - front)
        .any(|gap| gap > 0.0 && gap <= lead)
}
