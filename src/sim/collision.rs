//! Collision detection for the runner
//!
//! Everything in the runner is an axis-aligned box. Obstacle boxes are shrunk
//! inward by a tolerance margin before the overlap test so that edge grazes
//! do not end a run.

use glam::Vec2;
use serde::Serialize;

/// Axis-aligned bounding box (y grows downward, like the canvas)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box from its top-left corner and size
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Point test, edges inclusive on the min side only
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x < self.max.x
            && point.y >= self.min.y
            && point.y < self.max.y
    }

    /// Overlap test with `margin` taken off every side of the contact.
    ///
    /// Each edge must penetrate the other box by more than `margin`, so the
    /// result does not depend on argument order.
    pub fn overlaps_with_margin(&self, other: &Aabb, margin: f32) -> bool {
        self.min.x < other.max.x - margin
            && self.max.x > other.min.x + margin
            && self.min.y < other.max.y - margin
            && self.max.y > other.min.y + margin
    }
}

/// True if `actor` hits any of `obstacles`.
///
/// Evaluated against the whole set, so the result is the same in any
/// iteration order.
pub fn any_hit(actor: &Aabb, obstacles: impl IntoIterator<Item = Aabb>, margin: f32) -> bool {
    obstacles
        .into_iter()
        .any(|obstacle| actor.overlaps_with_margin(&obstacle, margin))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aabb(x: f32, y: f32, w: f32, h: f32) -> Aabb {
        Aabb::from_pos_size(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[test]
    fn test_clear_overlap_hits() {
        let actor = aabb(50.0, 210.0, 40.0, 40.0);
        let obstacle = aabb(60.0, 210.0, 30.0, 40.0);
        assert!(actor.overlaps_with_margin(&obstacle, 5.0));
        assert!(obstacle.overlaps_with_margin(&actor, 5.0));
    }

    #[test]
    fn test_graze_within_margin_misses() {
        let actor = aabb(50.0, 210.0, 40.0, 40.0);
        // Actor's right edge (90) reaches 4 units into the obstacle
        let obstacle = aabb(86.0, 210.0, 30.0, 40.0);
        assert!(!actor.overlaps_with_margin(&obstacle, 5.0));
        // Without tolerance the same contact counts
        assert!(actor.overlaps_with_margin(&obstacle, 0.0));
    }

    #[test]
    fn test_vertical_graze_misses() {
        // Actor bottom (250) just clips the top of an obstacle starting at 246
        let actor = aabb(50.0, 210.0, 40.0, 40.0);
        let obstacle = aabb(55.0, 246.0, 30.0, 40.0);
        assert!(!actor.overlaps_with_margin(&obstacle, 5.0));
    }

    #[test]
    fn test_separated_boxes_miss() {
        let actor = aabb(0.0, 0.0, 10.0, 10.0);
        let obstacle = aabb(20.0, 0.0, 10.0, 10.0);
        assert!(!actor.overlaps_with_margin(&obstacle, 0.0));
    }

    #[test]
    fn test_any_hit_order_independent() {
        let actor = aabb(50.0, 210.0, 40.0, 40.0);
        let far = aabb(400.0, 210.0, 30.0, 40.0);
        let near = aabb(70.0, 210.0, 30.0, 40.0);
        assert!(any_hit(&actor, [far, near], 5.0));
        assert!(any_hit(&actor, [near, far], 5.0));
        assert!(!any_hit(&actor, [far], 5.0));
    }
}
