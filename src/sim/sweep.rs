//! Sweep and crossing detection
//!
//! Each step shifts every non-pivot point's side into its "before" slot and
//! reclassifies it at the new ray angle. A crossing is a point whose two
//! slots disagree. The pivot itself is skipped by identity, never by position.

use glam::Vec2;

use super::registry::{PointId, PointRegistry};
use super::side::on_clockwise_side;

/// Shift current sides into "before" and reclassify at `ray_angle`
pub fn sweep(points: &mut PointRegistry, pivot: PointId, pivot_pos: Vec2, ray_angle: f64) {
    for p in points.iter_mut().filter(|p| p.id() != pivot) {
        p.on_clockwise_side_before = p.on_clockwise_side;
        p.on_clockwise_side = on_clockwise_side(pivot_pos, p.position(), ray_angle);
    }
}

/// Classify every non-pivot point from scratch, leaving no pending crossings
pub fn reseed(points: &mut PointRegistry, pivot: PointId, pivot_pos: Vec2, ray_angle: f64) {
    for p in points.iter_mut().filter(|p| p.id() != pivot) {
        let side = on_clockwise_side(pivot_pos, p.position(), ray_angle);
        p.seed_side(side);
    }
}

/// Points whose side flipped this step, in insertion order
pub fn crossings(points: &PointRegistry, pivot: PointId) -> Vec<PointId> {
    points
        .iter()
        .filter(|p| p.id() != pivot && p.crossed())
        .map(|p| p.id())
        .collect()
}
