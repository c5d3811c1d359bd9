//! Canvas2D renderer for the three games and the hub menu

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::layout::{back_rect, grid_cell_rect, menu_rect, option_rect, wrap_text};
use crate::error::{ArcadeError, Result};
use crate::platform::Viewport;
use crate::scores::{BestScores, GameKind, Leaderboard};
use crate::sim::{
    Aabb, CellKind, DilemmaView, LoseReason, ObstacleKind, Outcome, Phase, RunnerView,
    SessionSnapshot, TapView,
};

const BACKGROUND: &str = "#0f0518";
const PANEL: &str = "#2D0A31";
const NEON: &str = "#39ff14";
const MAGENTA: &str = "#ff00ff";
const GOLD: &str = "#ffd700";
const TEXT: &str = "#ffffff";

/// Rough glyph width of the body font, used for wrapping chat bubbles
const BODY_CHAR_WIDTH: f32 = 9.0;

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    viewport: Viewport,
}

impl CanvasRenderer {
    /// Bind to a canvas; fails when there is no usable 2D context
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self> {
        let viewport = Viewport::new(canvas.width() as f32, canvas.height() as f32)?;
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .ok_or_else(|| ArcadeError::SurfaceUnavailable("no 2d context".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| ArcadeError::SurfaceUnavailable("context is not 2d".to_string()))?;
        Ok(Self { ctx, viewport })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn draw_menu(&self, best: &BestScores) {
        self.clear();
        let center = f64::from(self.viewport.width) / 2.0;
        self.text("RAMADAN ARCADE", center, 50.0, "bold 28px monospace", GOLD, "center");
        for (i, game) in GameKind::ALL.iter().enumerate() {
            let line = format!("[{}] {}  (best {})", i + 1, game.title(), best.get(*game));
            self.button(&menu_rect(&self.viewport, i), &line, NEON);
        }
        let board = menu_rect(&self.viewport, GameKind::ALL.len());
        self.button(&board, "[4] Top Pemain", GOLD);

        let total = format!("Total {}", best.total());
        let y = f64::from(board.max.y) + 28.0;
        self.text(&total, center, y, "16px monospace", MAGENTA, "center");
    }

    /// Ranked list with the local player's row highlighted
    pub fn draw_leaderboard(&self, board: &Leaderboard, you: &str) {
        self.clear();
        let center = f64::from(self.viewport.width) / 2.0;
        self.text("TOP PEMAIN", center, 36.0, "bold 24px monospace", GOLD, "center");
        self.back_button();

        if board.is_empty() {
            self.text("Belum ada skor.", center, 120.0, "16px monospace", TEXT, "center");
            return;
        }
        let left = f64::from(self.viewport.width) * 0.15;
        let right = f64::from(self.viewport.width) * 0.85;
        for (i, entry) in board.entries.iter().enumerate() {
            let y = 70.0 + i as f64 * 22.0;
            let color = if entry.username == you { GOLD } else { NEON };
            let name = format!("#{:<3} {}", i + 1, entry.username);
            self.text(&name, left, y, "15px monospace", color, "left");
            let total = entry.total_score.to_string();
            self.text(&total, right, y, "15px monospace", color, "right");
        }
        if board.rank_of(you).is_none() {
            let bottom = f64::from(self.viewport.height) - 10.0;
            let note = "Kamu belum masuk 10 besar";
            self.text(note, center, bottom, "13px monospace", MAGENTA, "center");
        }
    }

    pub fn draw_runner(&self, snapshot: &SessionSnapshot<RunnerView>) {
        self.clear();
        let Some(view) = &snapshot.view else {
            self.overlay("SLIDE TO JANNAH", "SPASI / klik untuk mulai");
            self.back_button();
            return;
        };

        self.ctx.set_fill_style_str(PANEL);
        self.ctx.fill_rect(
            0.0,
            f64::from(view.floor_y),
            f64::from(view.field_width),
            f64::from(view.field_height - view.floor_y),
        );
        self.ctx.set_fill_style_str(NEON);
        self.ctx
            .fill_rect(0.0, f64::from(view.floor_y), f64::from(view.field_width), 2.0);

        for obstacle in &view.obstacles {
            let color = match obstacle.kind {
                ObstacleKind::Ground => MAGENTA,
                ObstacleKind::Air => NEON,
            };
            self.rect(&obstacle.bounds, color);
        }
        self.rect(&view.actor, GOLD);

        let hud = format!("Skor {}  Speed {:.1}", view.score, view.speed);
        self.text(&hud, 10.0, 24.0, "16px monospace", TEXT, "left");
        self.back_button();
        self.draw_game_over(snapshot.phase, snapshot.final_score);
    }

    pub fn draw_tap(&self, snapshot: &SessionSnapshot<TapView>) {
        self.clear();
        let Some(view) = &snapshot.view else {
            self.overlay("WAR TAKJIL", "Klik untuk mulai");
            self.back_button();
            return;
        };

        let cells = view.cells.len();
        for (i, cell) in view.cells.iter().enumerate() {
            let bounds = grid_cell_rect(&self.viewport, cells, i);
            let inset = Aabb {
                min: bounds.min + Vec2::splat(2.0),
                max: bounds.max - Vec2::splat(2.0),
            };
            let color = match cell.kind {
                CellKind::Empty => PANEL,
                CellKind::Good if view.frenzy => MAGENTA,
                CellKind::Good | CellKind::Bad => BACKGROUND,
            };
            self.rect(&inset, color);
            if cell.kind != CellKind::Empty {
                let center = (bounds.min + bounds.max) / 2.0;
                self.text(
                    cell.glyph,
                    f64::from(center.x),
                    f64::from(center.y) + 14.0,
                    "40px sans-serif",
                    TEXT,
                    "center",
                );
            }
        }

        let hud = format!("Skor {}  Waktu {}s", view.score, view.time_left);
        self.text(&hud, 10.0, 24.0, "16px monospace", TEXT, "left");
        if view.frenzy {
            self.text("FRENZY x2!", 10.0, 48.0, "bold 16px monospace", MAGENTA, "left");
        } else if view.combo > 0 {
            let combo = format!("Combo {}", view.combo);
            self.text(&combo, 10.0, 48.0, "16px monospace", GOLD, "left");
        }
        self.back_button();
        self.draw_game_over(snapshot.phase, snapshot.final_score);
    }

    pub fn draw_dilemma(&self, snapshot: &SessionSnapshot<DilemmaView>) {
        self.clear();
        let Some(view) = &snapshot.view else {
            self.overlay("DILEMA RAMADAN", "Klik untuk mulai");
            self.back_button();
            return;
        };

        self.bar("Iman", view.iman, 10.0, NEON);
        self.bar("Sosial", view.social, 30.0, MAGENTA);

        if let Some(scenario) = &view.scenario {
            self.text(&scenario.sender, 20.0, 70.0, "bold 16px monospace", GOLD, "left");
            let max_chars = ((self.viewport.width - 40.0) / BODY_CHAR_WIDTH) as usize;
            for (i, line) in wrap_text(&scenario.text, max_chars).iter().enumerate() {
                self.text(line, 20.0, 94.0 + i as f64 * 20.0, "15px monospace", TEXT, "left");
            }

            let count = scenario.options.len();
            for (i, choice) in scenario.options.iter().enumerate() {
                let bounds = option_rect(&self.viewport, count, i);
                self.rect(&bounds, PANEL);
                self.text(
                    &choice.text,
                    f64::from(bounds.min.x) + 10.0,
                    f64::from(bounds.max.y) - 14.0,
                    "14px monospace",
                    NEON,
                    "left",
                );
            }
        }

        if let Some(reason) = view.lose_reason {
            let why = match reason {
                LoseReason::Iman => "Imanmu habis...",
                LoseReason::Social => "Kamu dijauhi semua orang...",
                LoseReason::Choice => "Pilihan yang salah...",
            };
            let center = f64::from(self.viewport.width) / 2.0;
            self.text(why, center, 150.0, "16px monospace", MAGENTA, "center");
        }
        self.back_button();
        self.draw_game_over(snapshot.phase, snapshot.final_score);
    }

    fn draw_game_over(&self, phase: Phase, score: Option<u64>) {
        let Phase::GameOver(outcome) = phase else {
            return;
        };
        let title = match outcome {
            Outcome::Finished => "WAKTU HABIS",
            Outcome::Win => "MENANG!",
            Outcome::Lose => "GAME OVER",
        };
        let detail = format!("Skor {}  -  SPASI untuk main lagi", score.unwrap_or(0));
        self.overlay(title, &detail);
    }

    fn back_button(&self) {
        self.button(&back_rect(&self.viewport), "< Menu", TEXT);
    }

    fn button(&self, bounds: &Aabb, label: &str, color: &str) {
        self.rect(bounds, PANEL);
        let center = (bounds.min + bounds.max) / 2.0;
        self.text(
            label,
            f64::from(center.x),
            f64::from(center.y) + 5.0,
            "14px monospace",
            color,
            "center",
        );
    }

    fn overlay(&self, title: &str, detail: &str) {
        let center = f64::from(self.viewport.width) / 2.0;
        let middle = f64::from(self.viewport.height) / 2.0;
        self.text(title, center, middle - 10.0, "bold 28px monospace", GOLD, "center");
        self.text(detail, center, middle + 24.0, "16px monospace", TEXT, "center");
    }

    fn bar(&self, label: &str, value: i32, y: f64, color: &str) {
        let width = f64::from(self.viewport.width) * 0.4;
        self.ctx.set_fill_style_str(PANEL);
        self.ctx.fill_rect(90.0, y, width, 12.0);
        self.ctx.set_fill_style_str(color);
        self.ctx
            .fill_rect(90.0, y, width * f64::from(value.clamp(0, 100)) / 100.0, 12.0);
        self.text(label, 10.0, y + 11.0, "12px monospace", TEXT, "left");
    }

    fn clear(&self) {
        self.ctx.set_fill_style_str(BACKGROUND);
        self.ctx.fill_rect(
            0.0,
            0.0,
            f64::from(self.viewport.width),
            f64::from(self.viewport.height),
        );
    }

    fn rect(&self, bounds: &Aabb, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(
            f64::from(bounds.min.x),
            f64::from(bounds.min.y),
            f64::from(bounds.width()),
            f64::from(bounds.height()),
        );
    }

    fn text(&self, text: &str, x: f64, y: f64, font: &str, color: &str, align: &str) {
        self.ctx.set_font(font);
        self.ctx.set_text_align(align);
        self.ctx.set_fill_style_str(color);
        let _ = self.ctx.fill_text(text, x, y);
    }
}
