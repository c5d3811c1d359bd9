//! Render snapshots
//!
//! Renderers never touch live run state. Each frame they get an owned copy of
//! what they need to draw, built from the session after the simulation step.
//! Snapshots serialize to JSON so a JS front end can consume them as-is.

use serde::Serialize;

use super::collision::Aabb;
use super::dilemma::{LoseReason, Node, Scenario};
use super::session::Phase;
use super::state::{ObstacleKind, RunState};
use super::tap::Cell;
use crate::scores::GameKind;

/// Session-level snapshot wrapping a per-game view
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot<V> {
    pub game: GameKind,
    pub phase: Phase,
    pub epoch: u64,
    pub final_score: Option<u64>,
    /// `None` while READY
    pub view: Option<V>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ObstacleView {
    pub id: u32,
    pub kind: ObstacleKind,
    pub bounds: Aabb,
}

/// Everything needed to draw one runner frame
#[derive(Debug, Clone, Serialize)]
pub struct RunnerView {
    pub field_width: f32,
    pub field_height: f32,
    pub floor_y: f32,
    pub actor: Aabb,
    pub grounded: bool,
    pub jumps_used: u8,
    pub obstacles: Vec<ObstacleView>,
    pub score: u64,
    pub speed: f32,
    pub frame: u64,
}

impl RunnerView {
    pub fn from_state(state: &RunState) -> Self {
        Self {
            field_width: state.field.width,
            field_height: state.field.height,
            floor_y: state.floor_y,
            actor: state.actor.aabb(),
            grounded: state.actor.grounded,
            jumps_used: state.actor.jumps_used,
            obstacles: state
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    kind: o.kind,
                    bounds: o.aabb(),
                })
                .collect(),
            score: state.score,
            speed: state.speed,
            frame: state.frame,
        }
    }
}

/// Tap-grid board and HUD
#[derive(Debug, Clone, Serialize)]
pub struct TapView {
    pub cells: Vec<Cell>,
    pub score: u64,
    pub time_left: u32,
    pub combo: u32,
    pub frenzy: bool,
}

/// Current chat bubble and attribute bars
#[derive(Debug, Clone, Serialize)]
pub struct DilemmaView {
    pub node: Node,
    /// `None` once the story reached WIN or LOSE
    pub scenario: Option<Scenario>,
    pub iman: i32,
    pub social: i32,
    pub survived: u32,
    pub lose_reason: Option<LoseReason>,
}
