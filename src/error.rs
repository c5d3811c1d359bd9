//! Error types for the arcade core.
//!
//! Only load-time and host-setup failures are errors. Gameplay commands that
//! make no sense in the current state (jumping with no jumps left, tapping an
//! empty cell, choosing after the story ended) are ignored instead.

use thiserror::Error;

/// Errors surfaced by the arcade core.
#[derive(Debug, Error)]
pub enum ArcadeError {
    /// No drawable target: the loop must not start.
    #[error("render surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// A scenario option points at a scenario that does not exist.
    #[error("scenario {scenario} option {option} points at missing scenario {target}")]
    DanglingReference {
        scenario: u32,
        option: usize,
        target: u32,
    },

    /// Two scenarios share the same id.
    #[error("duplicate scenario id {0}")]
    DuplicateScenario(u32),

    /// The configured start scenario does not exist.
    #[error("start scenario {0} is missing")]
    MissingStart(u32),

    /// A tuning value outside its legal domain.
    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    /// Malformed JSON input (tuning, scenarios, leaderboard).
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias for the arcade core.
pub type Result<T> = std::result::Result<T, ArcadeError>;
