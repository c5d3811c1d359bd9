//! Tap-grid game ("War Takjil")
//!
//! A 3x3 board where food pops up and gets cleared. Tap GOOD items for
//! points, avoid BAD ones. Five GOOD hits in a row start a frenzy that
//! doubles points for a few seconds.
//!
//! Two periodic timers drive a run: a one-second countdown and a spawn
//! cadence that speeds up as the clock runs down. Both live in the run's own
//! [`Scheduler`] and are cancelled together when the run stops.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::clock::FrameClock;
use super::session::{GameRules, Outcome, Session};
use super::snapshot::TapView;
use super::timers::{Scheduler, TaskId};
use crate::scores::GameKind;
use crate::tuning::TapTuning;

/// Halal food worth tapping
pub const GOOD_ITEMS: [&str; 6] = ["🌮", "🍹", "🥯", "🍗", "🥗", "🥣"];
/// Temptations and angry moms
pub const BAD_ITEMS: [&str; 4] = ["🚬", "🍺", "👹", "😡"];

/// What occupies a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CellKind {
    Empty,
    Good,
    Bad,
}

/// One board cell; the token changes every time the cell changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Cell {
    pub token: u32,
    pub kind: CellKind,
    pub glyph: &'static str,
}

impl Cell {
    fn empty(token: u32) -> Self {
        Self {
            token,
            kind: CellKind::Empty,
            glyph: "",
        }
    }
}

/// Result of tapping an occupied cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Hit {
    Good { points: u64 },
    Bad { penalty: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TapTimer {
    Countdown,
    Spawn,
    FrenzyEnd,
}

/// State of one tap-grid run
#[derive(Debug, Clone)]
pub struct TapRun {
    pub seed: u64,
    rng: Pcg32,
    pub cells: Vec<Cell>,
    pub score: u64,
    /// Whole seconds left on the clock
    pub time_left: u32,
    /// Consecutive GOOD hits
    pub combo: u32,
    pub frenzy: bool,
    duration_secs: u32,
    spawn_period: u64,
    timers: Scheduler<TapTimer>,
    spawn_task: TaskId,
    frenzy_task: Option<TaskId>,
    next_token: u32,
    clock: FrameClock,
}

impl TapRun {
    pub fn new(seed: u64, tuning: &TapTuning) -> Self {
        let mut timers = Scheduler::new();
        timers.every(tuning.countdown_ms, TapTimer::Countdown);
        let spawn_period = tuning.spawn_period(0);
        let spawn_task = timers.every(spawn_period, TapTimer::Spawn);

        let mut run = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            cells: Vec::with_capacity(tuning.cells),
            score: 0,
            time_left: tuning.duration_secs,
            combo: 0,
            frenzy: false,
            duration_secs: tuning.duration_secs,
            spawn_period,
            timers,
            spawn_task,
            frenzy_task: None,
            next_token: 1,
            clock: FrameClock::new(),
        };
        for _ in 0..tuning.cells {
            let token = run.next_token();
            run.cells.push(Cell::empty(token));
        }
        run
    }

    pub fn is_over(&self) -> bool {
        self.time_left == 0
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.duration_secs - self.time_left
    }

    /// Current spawn cadence in ms
    pub fn spawn_period(&self) -> u64 {
        self.spawn_period
    }

    /// Virtual time since the run started (ms)
    pub fn now_ms(&self) -> u64 {
        self.timers.now()
    }

    /// True while any countdown/spawn/frenzy timer is still armed
    pub fn has_pending_timers(&self) -> bool {
        !self.timers.is_empty()
    }

    /// Let `dt_ms` of play time pass, firing due timers in order
    pub fn advance(&mut self, dt_ms: u64, tuning: &TapTuning) {
        if self.is_over() {
            return;
        }
        let until = self.timers.now() + dt_ms;
        while let Some(timer) = self.timers.pop_due(until) {
            match timer {
                TapTimer::Countdown => self.count_down(tuning),
                TapTimer::Spawn => self.spawn(tuning),
                TapTimer::FrenzyEnd => self.end_frenzy(),
            }
            if self.is_over() {
                self.stop();
                return;
            }
        }
        self.timers.settle(until);
    }

    /// Tap a cell. Empty or out-of-range cells are ignored.
    pub fn click(&mut self, index: usize, tuning: &TapTuning) -> Option<Hit> {
        if self.is_over() {
            return None;
        }
        let kind = self.cells.get(index)?.kind;
        let hit = match kind {
            CellKind::Empty => return None,
            CellKind::Good => {
                let multiplier = if self.frenzy {
                    tuning.frenzy_multiplier
                } else {
                    1
                };
                let points = tuning.good_points * multiplier;
                self.score += points;
                self.combo += 1;
                if self.combo >= tuning.frenzy_streak && !self.frenzy {
                    self.frenzy = true;
                    let task = self.timers.once(tuning.frenzy_ms, TapTimer::FrenzyEnd);
                    self.frenzy_task = Some(task);
                    log::debug!("Frenzy on at {} ms", self.timers.now());
                }
                Hit::Good { points }
            }
            CellKind::Bad => {
                self.score = self.score.saturating_sub(tuning.bad_penalty);
                self.combo = 0;
                self.cancel_frenzy();
                Hit::Bad {
                    penalty: tuning.bad_penalty,
                }
            }
        };

        let token = self.next_token();
        self.cells[index] = Cell::empty(token);
        Some(hit)
    }

    /// Cancel every timer; nothing fires for this run afterwards
    pub fn stop(&mut self) {
        self.timers.cancel_all();
        self.frenzy_task = None;
        self.frenzy = false;
    }

    fn count_down(&mut self, tuning: &TapTuning) {
        if self.time_left <= 1 {
            self.time_left = 0;
            return;
        }
        self.time_left -= 1;
        let period = tuning.spawn_period(self.elapsed_secs());
        if period != self.spawn_period {
            self.spawn_period = period;
            self.timers.set_period(self.spawn_task, period);
        }
    }

    /// Maybe clear one occupied cell, then fill one empty cell.
    ///
    /// On a full board with no clear this tick the board stays as is.
    fn spawn(&mut self, tuning: &TapTuning) {
        if self.rng.random_bool(tuning.clear_chance) {
            if let Some(index) = self.pick(|c| c.kind != CellKind::Empty) {
                let token = self.next_token();
                self.cells[index] = Cell::empty(token);
            }
        }

        if let Some(index) = self.pick(|c| c.kind == CellKind::Empty) {
            let (kind, glyph) = if self.rng.random_bool(tuning.bad_chance) {
                (CellKind::Bad, BAD_ITEMS[self.rng.random_range(0..BAD_ITEMS.len())])
            } else {
                (CellKind::Good, GOOD_ITEMS[self.rng.random_range(0..GOOD_ITEMS.len())])
            };
            let token = self.next_token();
            self.cells[index] = Cell { token, kind, glyph };
        }
    }

    /// Random index among cells matching `filter`
    fn pick(&mut self, filter: impl Fn(&Cell) -> bool) -> Option<usize> {
        let candidates: Vec<usize> = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, c)| filter(c))
            .map(|(i, _)| i)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[self.rng.random_range(0..candidates.len())])
    }

    fn end_frenzy(&mut self) {
        self.frenzy = false;
        self.combo = 0;
        self.frenzy_task = None;
        log::debug!("Frenzy over at {} ms", self.timers.now());
    }

    fn cancel_frenzy(&mut self) {
        if let Some(task) = self.frenzy_task.take() {
            self.timers.cancel(task);
        }
        self.frenzy = false;
    }

    fn next_token(&mut self) -> u32 {
        let token = self.next_token;
        self.next_token += 1;
        token
    }
}

/// Tap-grid rules for a [`Session`]
#[derive(Debug, Clone)]
pub struct TapRules {
    pub tuning: TapTuning,
    seeder: Pcg32,
}

impl TapRules {
    pub fn new(tuning: TapTuning, seed: u64) -> Self {
        Self {
            tuning,
            seeder: Pcg32::seed_from_u64(seed),
        }
    }
}

impl GameRules for TapRules {
    type Run = TapRun;
    type View = TapView;

    fn game(&self) -> GameKind {
        GameKind::WarTakjil
    }

    fn new_run(&mut self) -> TapRun {
        TapRun::new(self.seeder.random(), &self.tuning)
    }

    fn outcome(&self, run: &TapRun) -> Option<Outcome> {
        run.is_over().then_some(Outcome::Finished)
    }

    fn score(&self, run: &TapRun) -> u64 {
        run.score
    }

    fn view(&self, run: &TapRun) -> TapView {
        TapView {
            cells: run.cells.clone(),
            score: run.score,
            time_left: run.time_left,
            combo: run.combo,
            frenzy: run.frenzy,
        }
    }

    fn finish(&self, run: &mut TapRun) {
        run.stop();
    }
}

/// Tap-grid game session
pub type TapGame = Session<TapRules>;

impl Session<TapRules> {
    /// Pump both timers with elapsed wall time
    pub fn advance(&mut self, dt_ms: u64) {
        self.update(|rules, run| run.advance(dt_ms, &rules.tuning));
    }

    /// One display frame of `dt_secs`, converted to whole milliseconds
    pub fn frame(&mut self, dt_secs: f32) {
        self.update(|rules, run| {
            let elapsed = run.clock.advance(dt_secs).elapsed_ms;
            run.advance(elapsed, &rules.tuning);
        });
    }

    /// Tap command, ignored outside PLAYING
    pub fn click(&mut self, index: usize) -> Option<Hit> {
        self.update(|rules, run| run.click(index, &rules.tuning)).flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::session::Phase;

    fn put(run: &mut TapRun, index: usize, kind: CellKind) {
        run.cells[index] = Cell {
            token: 1000 + index as u32,
            kind,
            glyph: "?",
        };
    }

    fn occupied(run: &TapRun) -> usize {
        run.cells.iter().filter(|c| c.kind != CellKind::Empty).count()
    }

    #[test]
    fn test_new_board_is_empty() {
        let run = TapRun::new(1, &TapTuning::default());
        assert_eq!(run.cells.len(), 9);
        assert_eq!(occupied(&run), 0);
        assert_eq!(run.time_left, 60);
        assert!(run.has_pending_timers());
    }

    #[test]
    fn test_first_spawn_fills_one_cell() {
        let tuning = TapTuning::default();
        let mut run = TapRun::new(2, &tuning);
        run.advance(599, &tuning);
        assert_eq!(occupied(&run), 0);
        run.advance(1, &tuning);
        assert_eq!(occupied(&run), 1);
        let cell = run.cells.iter().find(|c| c.kind != CellKind::Empty).unwrap();
        let table: &[&str] = match cell.kind {
            CellKind::Good => &GOOD_ITEMS,
            _ => &BAD_ITEMS,
        };
        assert!(table.contains(&cell.glyph));
    }

    #[test]
    fn test_fill_is_bad_about_thirty_percent() {
        let tuning = TapTuning {
            clear_chance: 0.0,
            ..TapTuning::default()
        };
        let mut run = TapRun::new(21, &tuning);
        let mut bad = 0;
        for _ in 0..10_000 {
            run.spawn(&tuning);
            let filled: Vec<usize> = (0..run.cells.len())
                .filter(|&i| run.cells[i].kind != CellKind::Empty)
                .collect();
            assert_eq!(filled.len(), 1);
            if run.cells[filled[0]].kind == CellKind::Bad {
                bad += 1;
            }
            run.cells[filled[0]] = Cell::empty(0);
        }
        assert!((2_700..=3_300).contains(&bad), "bad fills: {}", bad);
    }

    #[test]
    fn test_full_board_clears_about_thirty_percent() {
        let tuning = TapTuning::default();
        let mut run = TapRun::new(22, &tuning);
        for i in 0..run.cells.len() {
            put(&mut run, i, CellKind::Good);
        }
        let mut clears = 0;
        for _ in 0..10_000 {
            let before = run.cells.clone();
            run.spawn(&tuning);
            // A clear frees one cell and the fill takes it straight back
            assert_eq!(occupied(&run), run.cells.len());
            if run.cells != before {
                clears += 1;
            }
        }
        assert!((2_700..=3_300).contains(&clears), "clears: {}", clears);
    }

    #[test]
    fn test_countdown_ends_run_and_cancels_timers() {
        let tuning = TapTuning::default();
        let mut run = TapRun::new(3, &tuning);
        run.advance(30_000, &tuning);
        assert_eq!(run.time_left, 30);
        assert_eq!(run.spawn_period(), 600 - 30 * 5);

        run.advance(30_000, &tuning);
        assert_eq!(run.time_left, 0);
        assert!(run.is_over());
        assert!(!run.has_pending_timers());

        let board = run.cells.clone();
        run.advance(10_000, &tuning);
        assert_eq!(run.cells, board);
    }

    #[test]
    fn test_good_streak_triggers_frenzy() {
        let tuning = TapTuning::default();
        let mut run = TapRun::new(4, &tuning);
        for _ in 0..4 {
            put(&mut run, 0, CellKind::Good);
            assert_eq!(run.click(0, &tuning), Some(Hit::Good { points: 10 }));
        }
        assert!(!run.frenzy);

        put(&mut run, 0, CellKind::Good);
        assert_eq!(run.click(0, &tuning), Some(Hit::Good { points: 10 }));
        assert!(run.frenzy);
        assert_eq!(run.combo, 5);

        put(&mut run, 0, CellKind::Good);
        assert_eq!(run.click(0, &tuning), Some(Hit::Good { points: 20 }));
        assert_eq!(run.score, 70);
        assert_eq!(run.cells[0].kind, CellKind::Empty);
    }

    #[test]
    fn test_frenzy_expires() {
        let tuning = TapTuning::default();
        let mut run = TapRun::new(5, &tuning);
        for _ in 0..5 {
            put(&mut run, 4, CellKind::Good);
            run.click(4, &tuning);
        }
        assert!(run.frenzy);
        run.advance(4_999, &tuning);
        assert!(run.frenzy);
        run.advance(1, &tuning);
        assert!(!run.frenzy);
        assert_eq!(run.combo, 0);
    }

    #[test]
    fn test_bad_hit_resets_combo_and_cancels_frenzy() {
        let tuning = TapTuning::default();
        let mut run = TapRun::new(6, &tuning);
        for _ in 0..5 {
            put(&mut run, 1, CellKind::Good);
            run.click(1, &tuning);
        }
        assert!(run.frenzy);

        put(&mut run, 2, CellKind::Bad);
        assert_eq!(run.click(2, &tuning), Some(Hit::Bad { penalty: 50 }));
        assert_eq!(run.score, 0);
        assert_eq!(run.combo, 0);
        assert!(!run.frenzy);

        // The cancelled frenzy timer must not reset a new streak later
        put(&mut run, 1, CellKind::Good);
        run.click(1, &tuning);
        run.advance(6_000, &tuning);
        assert_eq!(run.combo, 1);
    }

    #[test]
    fn test_score_never_negative() {
        let tuning = TapTuning::default();
        let mut run = TapRun::new(7, &tuning);
        put(&mut run, 3, CellKind::Good);
        run.click(3, &tuning);
        put(&mut run, 3, CellKind::Bad);
        run.click(3, &tuning);
        assert_eq!(run.score, 0);
    }

    #[test]
    fn test_empty_and_out_of_range_clicks_ignored() {
        let tuning = TapTuning::default();
        let mut run = TapRun::new(8, &tuning);
        assert_eq!(run.click(0, &tuning), None);
        assert_eq!(run.click(42, &tuning), None);
        assert_eq!(run.score, 0);
    }

    #[test]
    fn test_session_finishes_and_restarts_clean() {
        let mut game = TapGame::new(TapRules::new(TapTuning::default(), 77));
        assert_eq!(game.click(0), None);
        game.start();
        game.advance(20_000);
        assert!(game.run().is_some_and(|r| r.cells.iter().any(|c| c.kind != CellKind::Empty)));

        game.advance(40_000);
        assert_eq!(game.phase(), Phase::GameOver(Outcome::Finished));
        let over = game.take_game_over().unwrap();
        assert_eq!(over.game, GameKind::WarTakjil);

        game.start();
        let run = game.run().unwrap();
        assert_eq!(run.time_left, 60);
        assert_eq!(run.score, 0);
        assert_eq!(run.now_ms(), 0);
        assert!(run.cells.iter().all(|c| c.kind == CellKind::Empty));
    }

    #[test]
    fn test_display_frames_drive_timers() {
        let mut game = TapGame::new(TapRules::new(TapTuning::default(), 5));
        game.start();
        // 0.1 s clamp: a hundred long frames are ten seconds of play
        for _ in 0..100 {
            game.frame(0.1);
        }
        let run = game.run().unwrap();
        assert_eq!(run.now_ms(), 10_000);
        assert_eq!(run.time_left, 50);
    }
}
