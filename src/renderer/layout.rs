//! Screen layout shared by drawing and pointer hit-testing
//!
//! Pure geometry in canvas pixels, so the same rectangles are used to draw a
//! cell or button and to decide what a click landed on.

use glam::Vec2;

use crate::platform::Viewport;
use crate::sim::Aabb;

/// Share of the shorter viewport side used by the tap grid
const GRID_FILL: f32 = 0.8;
const BUTTON_HEIGHT: f32 = 40.0;
const BUTTON_GAP: f32 = 10.0;
/// Space kept below the last option button
const BUTTON_BOTTOM: f32 = 20.0;
const BUTTON_SIDE: f32 = 0.1;
/// Hub menu rows
const MENU_TOP: f32 = 80.0;
const MENU_ROW: f32 = 32.0;
const MENU_GAP: f32 = 8.0;
const MENU_WIDTH: f32 = 0.6;
/// Back button in the top-right corner
const BACK_SIZE: Vec2 = Vec2::new(80.0, 28.0);
const BACK_INSET: f32 = 8.0;

/// Columns of a square-ish grid holding `cells`
fn grid_columns(cells: usize) -> usize {
    let mut cols = 1;
    while cols * cols < cells {
        cols += 1;
    }
    cols
}

/// Screen rectangle of tap-grid cell `index`
pub fn grid_cell_rect(viewport: &Viewport, cells: usize, index: usize) -> Aabb {
    let cols = grid_columns(cells);
    let side = viewport.width.min(viewport.height) * GRID_FILL;
    let cell = side / cols as f32;
    let origin = Vec2::new(
        (viewport.width - side) / 2.0,
        (viewport.height - side) / 2.0,
    );
    let (row, col) = (index / cols, index % cols);
    Aabb::from_pos_size(
        origin + Vec2::new(col as f32 * cell, row as f32 * cell),
        Vec2::splat(cell),
    )
}

/// Tap-grid cell under a pointer position
pub fn grid_cell_at(viewport: &Viewport, cells: usize, point: Vec2) -> Option<usize> {
    (0..cells).find(|&i| grid_cell_rect(viewport, cells, i).contains(point))
}

/// Screen rectangle of decision option `index` (stacked at the bottom)
pub fn option_rect(viewport: &Viewport, options: usize, index: usize) -> Aabb {
    let stack = options as f32 * (BUTTON_HEIGHT + BUTTON_GAP) - BUTTON_GAP;
    let top = viewport.height - BUTTON_BOTTOM - stack + index as f32 * (BUTTON_HEIGHT + BUTTON_GAP);
    let left = viewport.width * BUTTON_SIDE;
    Aabb::from_pos_size(
        Vec2::new(left, top),
        Vec2::new(viewport.width - 2.0 * left, BUTTON_HEIGHT),
    )
}

/// Decision option under a pointer position
pub fn option_at(viewport: &Viewport, options: usize, point: Vec2) -> Option<usize> {
    (0..options).find(|&i| option_rect(viewport, options, i).contains(point))
}

/// Screen rectangle of hub menu entry `index` (stacked from the top)
pub fn menu_rect(viewport: &Viewport, index: usize) -> Aabb {
    let width = viewport.width * MENU_WIDTH;
    let top = MENU_TOP + index as f32 * (MENU_ROW + MENU_GAP);
    Aabb::from_pos_size(
        Vec2::new((viewport.width - width) / 2.0, top),
        Vec2::new(width, MENU_ROW),
    )
}

/// Hub menu entry under a pointer position
pub fn menu_at(viewport: &Viewport, entries: usize, point: Vec2) -> Option<usize> {
    (0..entries).find(|&i| menu_rect(viewport, i).contains(point))
}

/// Back-to-menu button shown on every non-menu screen
pub fn back_rect(viewport: &Viewport) -> Aabb {
    let pos = Vec2::new(viewport.width - BACK_SIZE.x - BACK_INSET, BACK_INSET);
    Aabb::from_pos_size(pos, BACK_SIZE)
}

/// Greedy word wrap to at most `max_chars` characters per line
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
