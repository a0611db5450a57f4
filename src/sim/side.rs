//! Side classification against the rotating ray
//!
//! The ray through the pivot at angle θ splits the plane in two. A point is on
//! the clockwise side when the ray, turning from θ, would reach the point's
//! bearing within half a turn:
//! - bearing β < π: clockwise iff θ ∈ (β, β + π)
//! - bearing β ≥ π: clockwise iff θ ∈ (β, 2π) ∪ [0, β − π)

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec2;

/// Bearing of `point` seen from `pivot`, in [0, 2π)
///
/// Points sharing the pivot's x coordinate take the vertical branch, so a
/// coincident point yields π/2 rather than a division by zero.
pub fn bearing(pivot: Vec2, point: Vec2) -> f64 {
    let dx = f64::from(point.x) - f64::from(pivot.x);
    let dy = f64::from(point.y) - f64::from(pivot.y);

    if dx == 0.0 {
        return if dy >= 0.0 { FRAC_PI_2 } else { 3.0 * FRAC_PI_2 };
    }

    let angle = (dy / dx).atan();
    let angle = if dx < 0.0 {
        angle + PI
    } else if angle < 0.0 {
        angle + TAU
    } else {
        angle
    };
    crate::wrap_angle(angle)
}

/// Half-turn rule for a bearing and a ray angle, both in [0, 2π)
#[inline]
pub fn is_clockwise_of(bearing: f64, ray_angle: f64) -> bool {
    if bearing < PI {
        ray_angle > bearing && ray_angle < bearing + PI
    } else {
        ray_angle > bearing || ray_angle < bearing - PI
    }
}

/// Classify `point` against the ray through `pivot` at `ray_angle`
#[inline]
pub fn on_clockwise_side(pivot: Vec2, point: Vec2, ray_angle: f64) -> bool {
    is_clockwise_of(bearing(pivot, point), ray_angle)
}
