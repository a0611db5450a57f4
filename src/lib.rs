//! Windmill - a rotating line that hops between pivot points
//!
//! Core modules:
//! - `sim`: Deterministic simulation (points, side classification, pivot switching)
//! - `settings`: Data-driven tuning, persisted as JSON
//! - `error`: Error type shared by the fallible operations
//!
//! The simulation is single-threaded and step-driven. None of the mutating
//! operations on [`sim::Windmill`] are reentrant; drive an instance from one
//! logical thread of control.

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{Result, WindmillError};
pub use settings::{CueSettings, WindmillSettings};
pub use sim::{PointId, SimMode, Windmill};

use glam::Vec2;
use std::f64::consts::TAU;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the native driver (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Angular speed after construction or restart (rad/s)
    pub const DEFAULT_ANGULAR_SPEED: f64 = 0.45;
    /// Slowest allowed angular speed magnitude
    pub const MIN_ANGULAR_SPEED: f64 = 0.001;
    /// Fastest allowed angular speed magnitude
    pub const MAX_ANGULAR_SPEED: f64 = 2.0;
    /// Rotation required before switching back to the previous pivot
    pub const DEBOUNCE_RADIANS: f64 = 0.3;

    /// Point radius as a fraction of the world view height
    pub const POINT_SIZE_PROPORTION: f32 = 0.005;
    /// Pivot marker radius relative to a regular point
    pub const PIVOT_SIZE_FACTOR: f32 = 1.5;
    /// Click tolerance relative to the marker radius
    pub const HIT_RADIUS_FACTOR: f32 = 1.5;
    /// World view height assumed until the host reports one
    pub const DEFAULT_VIEW_HEIGHT: f32 = 1000.0;

    /// "Pop" ring defaults
    pub const CUE_DURATION: f32 = 0.6;
    pub const CUE_THICKNESS: f32 = 0.25;
    pub const CUE_INITIAL_RADIUS: f32 = 1.1;
    pub const CUE_SPEED: f32 = 6.0;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f64) -> Vec2 {
    Vec2::new(r * theta.cos() as f32, r * theta.sin() as f32)
}
