//! Endless runner ("Slide to Jannah")
//!
//! Plugs the runner tick into the shared session FSM and drives it from
//! display frames through a [`FrameClock`].

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::clock::FrameClock;
use super::session::{GameRules, Outcome, Session};
use super::snapshot::RunnerView;
use super::state::RunState;
use super::tick::{TickInput, TickReport, tick};
use crate::platform::Viewport;
use crate::scores::GameKind;
use crate::tuning::RunnerTuning;

/// One runner run: simulation state plus its frame clock
#[derive(Debug, Clone)]
pub struct RunnerRun {
    pub state: RunState,
    clock: FrameClock,
}

impl RunnerRun {
    pub fn new(seed: u64, tuning: &RunnerTuning, field: Viewport) -> Self {
        Self {
            state: RunState::new(seed, tuning, field),
            clock: FrameClock::new(),
        }
    }

    /// Run the ticks owed for one display frame, stopping at a collision
    pub fn frame(&mut self, dt_secs: f32, input: &TickInput, tuning: &RunnerTuning) -> u32 {
        let steps = self.clock.advance(dt_secs);
        let mut ran = 0;
        for _ in 0..steps.ticks {
            let report = tick(&mut self.state, input, tuning);
            ran += 1;
            if report.collided {
                self.clock.reset();
                break;
            }
        }
        ran
    }
}

/// Runner rules for a [`Session`]
#[derive(Debug, Clone)]
pub struct RunnerRules {
    pub tuning: RunnerTuning,
    /// Field size used for the next run
    pub field: Viewport,
    seeder: Pcg32,
}

impl RunnerRules {
    pub fn new(tuning: RunnerTuning, field: Viewport, seed: u64) -> Self {
        Self {
            tuning,
            field,
            seeder: Pcg32::seed_from_u64(seed),
        }
    }
}

impl GameRules for RunnerRules {
    type Run = RunnerRun;
    type View = RunnerView;

    fn game(&self) -> GameKind {
        GameKind::SlideJannah
    }

    fn new_run(&mut self) -> RunnerRun {
        RunnerRun::new(self.seeder.random(), &self.tuning, self.field)
    }

    fn outcome(&self, run: &RunnerRun) -> Option<Outcome> {
        (!run.state.playing).then_some(Outcome::Lose)
    }

    fn score(&self, run: &RunnerRun) -> u64 {
        run.state.score
    }

    fn view(&self, run: &RunnerRun) -> RunnerView {
        RunnerView::from_state(&run.state)
    }
}

/// Runner game session
pub type Runner = Session<RunnerRules>;

impl Session<RunnerRules> {
    /// Queue a jump for the next tick; ignored outside PLAYING
    pub fn jump(&mut self) -> bool {
        self.update(|_, run| run.state.pending_jump = true).is_some()
    }

    /// Exactly one fixed tick
    pub fn tick(&mut self, input: &TickInput) -> Option<TickReport> {
        self.update(|rules, run| tick(&mut run.state, input, &rules.tuning))
    }

    /// One display frame; returns the number of ticks simulated
    pub fn frame(&mut self, dt_secs: f32, input: &TickInput) -> u32 {
        self.update(|rules, run| run.frame(dt_secs, input, &rules.tuning)).unwrap_or(0)
    }
}
