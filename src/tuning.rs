//! Data-driven game balance
//!
//! Every gameplay constant the three games use lives here so a host can ship
//! overrides as JSON. Missing fields fall back to the reference values in
//! [`crate::consts`]. Persisted separately from scores in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ArcadeError, Result};
use crate::platform;

/// Endless-runner physics, spawning and difficulty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerTuning {
    /// Downward acceleration (units/tick²)
    pub gravity: f32,
    /// Vertical velocity set by a jump (negative is up)
    pub jump_impulse: f32,
    /// Jumps allowed before touching the ground again
    pub max_jumps: u8,
    /// Height of the ground strip below the floor line
    pub ground_height: f32,
    pub actor_x: f32,
    pub actor_size: f32,
    pub obstacle_width: f32,
    pub ground_obstacle_height: f32,
    pub air_obstacle_height: f32,
    /// Distance from the floor line up to an air obstacle's top edge
    pub air_obstacle_lift: f32,
    /// Probability that a spawn is an air obstacle
    pub air_chance: f64,
    pub start_speed: f32,
    pub speed_step: f32,
    /// Ticks between speed increases
    pub ramp_interval: u64,
    pub spawn_distance: f32,
    pub spawn_padding: u64,
    /// Spawns never happen more often than this many ticks
    pub min_spawn_cadence: u64,
    /// Inward shrink applied to obstacle boxes before the overlap test
    pub collision_margin: f32,
    pub survival_points: u64,
}

impl Default for RunnerTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            max_jumps: MAX_JUMPS,
            ground_height: GROUND_HEIGHT,
            actor_x: ACTOR_X,
            actor_size: ACTOR_SIZE,
            obstacle_width: OBSTACLE_WIDTH,
            ground_obstacle_height: GROUND_OBSTACLE_HEIGHT,
            air_obstacle_height: AIR_OBSTACLE_HEIGHT,
            air_obstacle_lift: AIR_OBSTACLE_LIFT,
            air_chance: AIR_CHANCE,
            start_speed: START_SPEED,
            speed_step: SPEED_STEP,
            ramp_interval: RAMP_INTERVAL_TICKS,
            spawn_distance: SPAWN_DISTANCE,
            spawn_padding: SPAWN_PADDING,
            min_spawn_cadence: MIN_SPAWN_CADENCE,
            collision_margin: COLLISION_MARGIN,
            survival_points: SURVIVAL_POINTS,
        }
    }
}

impl RunnerTuning {
    /// Ticks between spawns at the given speed (shrinks as speed grows)
    pub fn spawn_cadence(&self, speed: f32) -> u64 {
        let travel = (self.spawn_distance / speed).floor().max(0.0) as u64;
        (travel + self.spawn_padding).max(self.min_spawn_cadence)
    }

    fn validate(&self) -> Result<()> {
        if self.gravity <= 0.0 {
            return invalid("runner.gravity must be positive");
        }
        if self.jump_impulse >= 0.0 {
            return invalid("runner.jump_impulse must point up (negative)");
        }
        if self.max_jumps == 0 {
            return invalid("runner.max_jumps must be at least 1");
        }
        if self.start_speed <= 0.0 || self.speed_step < 0.0 {
            return invalid("runner speed must start positive and never decrease");
        }
        if self.ramp_interval == 0 || self.min_spawn_cadence == 0 {
            return invalid("runner intervals must be non-zero");
        }
        if !(0.0..=1.0).contains(&self.air_chance) {
            return invalid("runner.air_chance must be a probability");
        }
        if self.collision_margin < 0.0 {
            return invalid("runner.collision_margin must not be negative");
        }
        Ok(())
    }
}

/// Tap-grid timing and scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TapTuning {
    pub cells: usize,
    pub duration_secs: u32,
    pub countdown_ms: u64,
    /// Spawn period at the start of a run
    pub spawn_base_ms: u64,
    /// Spawn period shrinks by this much per elapsed second
    pub spawn_decay_ms: u64,
    pub spawn_min_ms: u64,
    /// Chance a spawn tick first clears an occupied cell
    pub clear_chance: f64,
    /// Chance a filled cell is BAD
    pub bad_chance: f64,
    pub good_points: u64,
    pub frenzy_multiplier: u64,
    pub bad_penalty: u64,
    /// Consecutive GOOD hits that trigger frenzy
    pub frenzy_streak: u32,
    pub frenzy_ms: u64,
}

impl Default for TapTuning {
    fn default() -> Self {
        Self {
            cells: GRID_CELLS,
            duration_secs: TAP_DURATION_SECS,
            countdown_ms: 1000,
            spawn_base_ms: 600,
            spawn_decay_ms: 5,
            spawn_min_ms: 200,
            clear_chance: 0.3,
            bad_chance: 0.3,
            good_points: 10,
            frenzy_multiplier: 2,
            bad_penalty: 50,
            frenzy_streak: 5,
            frenzy_ms: 5000,
        }
    }
}

impl TapTuning {
    /// Spawn period after `elapsed_secs` seconds of play
    pub fn spawn_period(&self, elapsed_secs: u32) -> u64 {
        self.spawn_base_ms
            .saturating_sub(u64::from(elapsed_secs) * self.spawn_decay_ms)
            .max(self.spawn_min_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.cells == 0 {
            return invalid("tap.cells must be non-zero");
        }
        if self.duration_secs == 0 || self.countdown_ms == 0 || self.spawn_min_ms == 0 {
            return invalid("tap timings must be non-zero");
        }
        if !(0.0..=1.0).contains(&self.clear_chance) || !(0.0..=1.0).contains(&self.bad_chance) {
            return invalid("tap chances must be probabilities");
        }
        if self.frenzy_streak == 0 {
            return invalid("tap.frenzy_streak must be at least 1");
        }
        Ok(())
    }
}

/// Decision-game attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DilemmaTuning {
    pub start_iman: i32,
    pub start_social: i32,
    pub points_per_scenario: u64,
}

impl Default for DilemmaTuning {
    fn default() -> Self {
        Self {
            start_iman: 100,
            start_social: 50,
            points_per_scenario: 100,
        }
    }
}

impl DilemmaTuning {
    fn validate(&self) -> Result<()> {
        let bounds = ATTRIBUTE_MIN..=ATTRIBUTE_MAX;
        if !bounds.contains(&self.start_iman) || !bounds.contains(&self.start_social) {
            return invalid("dilemma starting attributes must be within 0..=100");
        }
        Ok(())
    }
}

/// Balance for every game in the hub
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub runner: RunnerTuning,
    pub tap: TapTuning,
    pub dilemma: DilemmaTuning,
}

impl Tuning {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "ramadan_arcade_tuning";

    /// Parse (possibly partial) overrides and validate them
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<()> {
        self.runner.validate()?;
        self.tap.validate()?;
        self.dilemma.validate()
    }

    /// Load tuning from storage, falling back to defaults
    pub fn load() -> Self {
        match platform::load_json::<Tuning>(Self::STORAGE_KEY) {
            Some(tuning) => match tuning.validate() {
                Ok(()) => {
                    log::info!("Loaded tuning overrides");
                    tuning
                }
                Err(e) => {
                    log::warn!("Stored tuning rejected ({}), using defaults", e);
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }
}

fn invalid(msg: &str) -> Result<()> {
    Err(ArcadeError::InvalidTuning(msg.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{"runner": {"gravity": 0.8}}"#).unwrap();
        assert_eq!(tuning.runner.gravity, 0.8);
        assert_eq!(tuning.runner.max_jumps, 2);
        assert_eq!(tuning.tap, TapTuning::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Tuning::from_json(r#"{"runner": {"jump_impulse": 3.0}}"#).unwrap_err();
        assert!(matches!(err, ArcadeError::InvalidTuning(_)));

        let err = Tuning::from_json(r#"{"tap": {"bad_chance": 1.5}}"#).unwrap_err();
        assert!(matches!(err, ArcadeError::InvalidTuning(_)));

        assert!(matches!(
            Tuning::from_json("{not json"),
            Err(ArcadeError::Json(_))
        ));
    }

    #[test]
    fn test_spawn_cadence_shrinks_with_speed_and_floors() {
        let runner = RunnerTuning::default();
        assert_eq!(runner.spawn_cadence(5.0), 220);
        assert_eq!(runner.spawn_cadence(5.5), 201);
        assert_eq!(runner.spawn_cadence(6.0), 200);
        assert_eq!(runner.spawn_cadence(50.0), 200);
        assert!(runner.spawn_cadence(5.5) < runner.spawn_cadence(5.0));
    }

    #[test]
    fn test_tap_spawn_period_ramp() {
        let tap = TapTuning::default();
        assert_eq!(tap.spawn_period(0), 600);
        assert_eq!(tap.spawn_period(10), 550);
        assert_eq!(tap.spawn_period(59), 305);
        assert_eq!(tap.spawn_period(200), 200);
    }
}
