//! Property-based tests for the simulation invariants.
//!
//! Run with: cargo test --release properties

#![allow(clippy::unwrap_used)]

use glam::Vec2;
use proptest::prelude::*;

use ramadan_arcade::platform::Viewport;
use ramadan_arcade::sim::{
    Aabb, CellKind, DilemmaGame, DilemmaRules, DilemmaRun, Node, Phase, RunState, Runner,
    RunnerRules, ScenarioGraph, TapRun, TickInput, tick,
};
use ramadan_arcade::{DilemmaTuning, RunnerTuning, TapTuning};

fn aabb(x: f32, y: f32, w: f32, h: f32) -> Aabb {
    Aabb::from_pos_size(Vec2::new(x, y), Vec2::new(w, h))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The actor never sinks below the floor, whatever is pressed.
    #[test]
    fn prop_actor_stays_above_floor(
        seed in any::<u64>(),
        jumps in proptest::collection::vec(any::<bool>(), 1..600)
    ) {
        let tuning = RunnerTuning::default();
        let mut state = RunState::new(seed, &tuning, Viewport::default());
        for jump in jumps {
            tick(&mut state, &TickInput { jump, autopilot: false }, &tuning);
            prop_assert!(state.actor.pos.y + state.actor.size.y <= state.floor_y);
            prop_assert!(state.actor.jumps_used <= tuning.max_jumps);
        }
    }

    /// Every spawned obstacle is either live or was pruned once for 5 points.
    #[test]
    fn prop_prune_accounting(seed in any::<u64>(), ticks in 1usize..3000) {
        let tuning = RunnerTuning::default();
        let mut state = RunState::new(seed, &tuning, Viewport::default());
        let input = TickInput { jump: false, autopilot: true };
        for _ in 0..ticks {
            tick(&mut state, &input, &tuning);
            prop_assert_eq!(state.spawned, state.passed + state.obstacles.len() as u64);
            prop_assert_eq!(state.score, state.passed * tuning.survival_points);
            prop_assert!(state.obstacles.iter().all(|o| !o.is_off_screen()));
        }
    }

    /// Speed only ever grows, in steps tied to the tick counter.
    #[test]
    fn prop_speed_ramp_monotonic(seed in any::<u64>(), ticks in 1usize..2500) {
        let tuning = RunnerTuning::default();
        let mut state = RunState::new(seed, &tuning, Viewport::default());
        let input = TickInput { jump: false, autopilot: true };
        let mut last = state.speed;
        for _ in 0..ticks {
            tick(&mut state, &input, &tuning);
            prop_assert!(state.speed >= last);
            last = state.speed;
            let steps = (state.frame / tuning.ramp_interval) as f32;
            prop_assert_eq!(state.speed, tuning.start_speed + tuning.speed_step * steps);
        }
    }

    /// Collision does not depend on argument order.
    #[test]
    fn prop_collision_symmetric(
        a in (0f32..600.0, 0f32..300.0, 1f32..80.0, 1f32..80.0),
        b in (0f32..600.0, 0f32..300.0, 1f32..80.0, 1f32..80.0),
        margin in 0f32..10.0
    ) {
        let a = aabb(a.0, a.1, a.2, a.3);
        let b = aabb(b.0, b.1, b.2, b.3);
        prop_assert_eq!(a.overlaps_with_margin(&b, margin), b.overlaps_with_margin(&a, margin));
    }

    /// Contact shallower than the margin is a graze, not a hit.
    #[test]
    fn prop_graze_within_margin_misses(
        x in 0f32..500.0,
        y in 0f32..200.0,
        margin in 1f32..10.0,
        depth in 0f32..0.9
    ) {
        let actor = aabb(x, y, 40.0, 40.0);
        let obstacle = aabb(x + 40.0 - margin * depth, y, 30.0, 40.0);
        prop_assert!(!actor.overlaps_with_margin(&obstacle, margin));
        prop_assert!(!obstacle.overlaps_with_margin(&actor, margin));
    }

    /// Restarting always yields a pristine run.
    #[test]
    fn prop_restart_is_pristine(seed in any::<u64>(), frames in 1usize..400) {
        let tuning = RunnerTuning::default();
        let mut game = Runner::new(RunnerRules::new(tuning.clone(), Viewport::default(), seed));
        game.start();
        let input = TickInput { jump: false, autopilot: true };
        for _ in 0..frames {
            game.frame(1.0 / 60.0, &input);
        }
        game.exit();
        game.start();
        let state = &game.run().unwrap().state;
        prop_assert_eq!(game.phase(), Phase::Playing);
        prop_assert!(state.obstacles.is_empty());
        prop_assert_eq!(state.score, 0);
        prop_assert_eq!(state.frame, 0);
        prop_assert_eq!(state.speed, tuning.start_speed);
    }

    /// Attributes stay within 0..=100 and a zero always means LOSE.
    #[test]
    fn prop_dilemma_attributes_clamped(choices in proptest::collection::vec(0usize..3, 0..10)) {
        let graph = ScenarioGraph::ramadan();
        let mut run = DilemmaRun::new(graph.start(), &DilemmaTuning::default());
        for choice in choices {
            run.choose(choice, &graph);
            prop_assert!((0..=100).contains(&run.iman));
            prop_assert!((0..=100).contains(&run.social));
            if run.iman == 0 || run.social == 0 {
                prop_assert_eq!(run.node, Node::Lose);
            }
        }
        prop_assert_eq!(run.survived as usize, run.history.len());
    }

    /// A finished story's score matches the formula.
    #[test]
    fn prop_dilemma_score_formula(choices in proptest::collection::vec(0usize..2, 5)) {
        let tuning = DilemmaTuning::default();
        let rules = DilemmaRules::new(ScenarioGraph::ramadan(), tuning.clone());
        let mut game = DilemmaGame::new(rules);
        game.start();
        for choice in choices {
            game.choose(choice);
        }
        // Every path through the story ends within five answers
        prop_assert!(game.phase().is_terminal());
        let run = game.run().unwrap();
        let expected = u64::from(run.survived) * tuning.points_per_scenario
            + run.iman as u64
            + run.social as u64;
        prop_assert_eq!(game.final_score(), Some(expected));
    }

    /// Frenzy implies a streak, the board keeps its size, and time only runs down.
    #[test]
    fn prop_tap_run_consistent(
        seed in any::<u64>(),
        steps in proptest::collection::vec((0u64..700, proptest::option::of(0usize..9)), 1..200)
    ) {
        let tuning = TapTuning::default();
        let mut run = TapRun::new(seed, &tuning);
        let mut time_left = run.time_left;
        for (dt, click) in steps {
            run.advance(dt, &tuning);
            if let Some(index) = click {
                let before = run.cells[index].kind;
                let hit = run.click(index, &tuning);
                prop_assert_eq!(hit.is_some(), before != CellKind::Empty && !run.is_over());
            }
            prop_assert_eq!(run.cells.len(), tuning.cells);
            prop_assert!(run.time_left <= time_left);
            time_left = run.time_left;
            if run.frenzy {
                prop_assert!(run.combo >= tuning.frenzy_streak);
            }
            if run.is_over() {
                prop_assert!(!run.has_pending_timers());
            }
        }
    }
}
