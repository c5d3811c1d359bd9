//! Session state machine shared by every game
//!
//! READY -> PLAYING -> GAME OVER (finished / win / lose). A game plugs in its
//! own run state, terminal predicate and score formula through [`GameRules`];
//! the transitions themselves live here once.
//!
//! Starting a run always builds a brand-new run value. The old one is dropped
//! with everything it owns (obstacles, grid, pending timers), so nothing from a
//! previous run can leak into or fire against the next one.

use serde::Serialize;

use super::snapshot::SessionSnapshot;
use crate::scores::GameKind;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// Ran out of time
    Finished,
    Win,
    Lose,
}

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Idle, waiting for a start command
    Ready,
    /// Active gameplay
    Playing,
    /// Run ended, score is final
    GameOver(Outcome),
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::GameOver(_))
    }
}

/// Emitted exactly once when a run ends; the host submits and caches the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameOver {
    pub game: GameKind,
    pub outcome: Outcome,
    pub score: u64,
}

/// Per-game behaviour plugged into a [`Session`]
pub trait GameRules {
    /// Mutable state of one run
    type Run;
    /// Read-only view handed to renderers
    type View: Serialize;

    fn game(&self) -> GameKind;

    /// Build a fresh run
    fn new_run(&mut self) -> Self::Run;

    /// Terminal predicate, checked after every update
    fn outcome(&self, run: &Self::Run) -> Option<Outcome>;

    /// Score formula
    fn score(&self, run: &Self::Run) -> u64;

    fn view(&self, run: &Self::Run) -> Self::View;

    /// Called once when the run leaves PLAYING
    fn finish(&self, _run: &mut Self::Run) {}
}

/// One game instance: exactly one phase is active at a time
pub struct Session<R: GameRules> {
    rules: R,
    phase: Phase,
    run: Option<R::Run>,
    /// Bumped whenever the run value is replaced or discarded
    epoch: u64,
    final_score: Option<u64>,
    game_over: Option<GameOver>,
}

impl<R: GameRules> Session<R> {
    pub fn new(rules: R) -> Self {
        Self {
            rules,
            phase: Phase::Ready,
            run: None,
            epoch: 0,
            final_score: None,
            game_over: None,
        }
    }

    /// Start command: READY or GAME OVER -> PLAYING with a fresh run.
    ///
    /// Ignored while a run is already in progress.
    pub fn start(&mut self) -> bool {
        if self.phase == Phase::Playing {
            return false;
        }
        self.run = Some(self.rules.new_run());
        self.epoch += 1;
        self.phase = Phase::Playing;
        self.final_score = None;
        self.game_over = None;
        log::info!("{:?} run #{} started", self.rules.game(), self.epoch);
        true
    }

    /// Exit command: discard the run and go back to READY
    pub fn exit(&mut self) {
        if self.phase == Phase::Playing {
            if let Some(run) = self.run.as_mut() {
                self.rules.finish(run);
            }
            log::info!("{:?} run #{} abandoned", self.rules.game(), self.epoch);
        }
        self.run = None;
        self.epoch += 1;
        self.phase = Phase::Ready;
        self.final_score = None;
        self.game_over = None;
    }

    /// Apply one mutation to the live run, then check for the end of the run.
    ///
    /// Returns `None` (and does nothing) outside PLAYING.
    pub fn update<T>(&mut self, f: impl FnOnce(&R, &mut R::Run) -> T) -> Option<T> {
        if self.phase != Phase::Playing {
            return None;
        }
        let run = self.run.as_mut()?;
        let value = f(&self.rules, run);

        if let Some(outcome) = self.rules.outcome(run) {
            self.rules.finish(run);
            let score = self.rules.score(run);
            self.phase = Phase::GameOver(outcome);
            self.final_score = Some(score);
            self.game_over = Some(GameOver {
                game: self.rules.game(),
                outcome,
                score,
            });
            log::info!(
                "{:?} run #{} over: {:?} with score {}",
                self.rules.game(),
                self.epoch,
                outcome,
                score
            );
        }
        Some(value)
    }

    /// Game-over event for the host, handed out once
    pub fn take_game_over(&mut self) -> Option<GameOver> {
        self.game_over.take()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    /// Live (or just-finished) run, if any
    pub fn run(&self) -> Option<&R::Run> {
        self.run.as_ref()
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    /// Rule changes apply from the next run
    pub fn rules_mut(&mut self) -> &mut R {
        &mut self.rules
    }

    /// Immutable view of the whole session for rendering
    pub fn snapshot(&self) -> SessionSnapshot<R::View> {
        SessionSnapshot {
            game: self.rules.game(),
            phase: self.phase,
            epoch: self.epoch,
            final_score: self.final_score,
            view: self.run.as_ref().map(|run| self.rules.view(run)),
        }
    }
}
