//! Windmill state and user operations
//!
//! Owns the point registry, the pivot, the angular state and the transition
//! history. Stepping lives in `tick.rs`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::cue::SwitchCue;
use super::history::{TransitionEdge, TransitionHistory};
use super::registry::{PointId, PointRegistry};
use super::side::on_clockwise_side;
use super::sweep::reseed;
use crate::error::{Result, WindmillError};
use crate::polar_to_cartesian;
use crate::settings::{WindmillSettings, clamp_magnitude};

/// Simulation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimMode {
    /// No rotation; angle held at 0
    #[default]
    Stopped,
    /// Angle advances and crossings switch the pivot
    Running,
    /// Angle frozen; pivot and history kept
    Paused,
}

/// The rendered line through the pivot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec2,
    pub angle: f64,
    /// Total visual length, centred on the origin
    pub length: f32,
}

impl Ray {
    /// Both ends of the visible line
    pub fn endpoints(&self) -> (Vec2, Vec2) {
        let half = polar_to_cartesian(self.length / 2.0, self.angle);
        (self.origin - half, self.origin + half)
    }
}

/// A committed pivot switch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PivotSwitch {
    pub from: PointId,
    pub to: PointId,
    /// Position of the new pivot
    pub position: Vec2,
}

/// A point as seen by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointView {
    pub id: PointId,
    pub position: Vec2,
    pub is_pivot: bool,
}

/// Owned copy of everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindmillSnapshot {
    pub mode: SimMode,
    pub angle: f64,
    pub angular_speed: f64,
    pub ray: Option<Ray>,
    pub points: Vec<PointView>,
    pub edges: Vec<TransitionEdge>,
    pub cues: Vec<SwitchCue>,
}

/// A single windmill simulation
#[derive(Debug, Clone)]
pub struct Windmill {
    pub(crate) settings: WindmillSettings,
    pub(crate) points: PointRegistry,
    pub(crate) pivot: Option<PointId>,
    /// Pivot active immediately before the current one
    pub(crate) previous_pivot: Option<PointId>,
    /// Ray angle in [0, 2π)
    pub(crate) angle: f64,
    /// Signed angular velocity (rad/s)
    pub(crate) angular_speed: f64,
    /// Rotation since the last switch (always non-negative)
    pub(crate) rad_since_switch: f64,
    pub(crate) mode: SimMode,
    pub(crate) history: TransitionHistory,
    pub(crate) cues: Vec<SwitchCue>,
    pub(crate) ray: Option<Ray>,
}

impl Default for Windmill {
    fn default() -> Self {
        Self::new(WindmillSettings::default())
    }
}

impl Windmill {
    pub fn new(settings: WindmillSettings) -> Self {
        let settings = settings.validated();
        Self {
            angular_speed: settings.default_angular_speed,
            settings,
            points: PointRegistry::new(),
            pivot: None,
            previous_pivot: None,
            angle: 0.0,
            rad_since_switch: 0.0,
            mode: SimMode::Stopped,
            history: TransitionHistory::new(),
            cues: Vec::new(),
            ray: None,
        }
    }

    // === Point registry ===

    /// Place a new point
    pub fn add_point(&mut self, position: Vec2) -> PointId {
        let id = self.points.push(position);
        if self.mode == SimMode::Stopped {
            return id;
        }
        if let Some(pivot_pos) = self.pivot_position() {
            let side = on_clockwise_side(pivot_pos, position, self.angle);
            if let Some(p) = self.points.get_mut(id) {
                p.seed_side(side);
            }
        }
        id
    }

    /// Delete the first point under `position`, if any
    ///
    /// Deleting the pivot stops the simulation and unsets the pivot.
    pub fn try_delete(&mut self, position: Vec2) -> Option<PointId> {
        let id = self.points.first_within(position, self.settings.delete_radius())?;
        self.points.remove(id);

        if self.pivot == Some(id) {
            log::debug!("Pivot {} deleted, stopping", id);
            self.pivot = None;
            self.previous_pivot = None;
            self.mode = SimMode::Stopped;
            self.angle = 0.0;
            self.ray = None;
            // Stopped cues never age, so drop them with the run
            self.cues.clear();
        }
        if self.previous_pivot == Some(id) {
            self.previous_pivot = None;
        }
        Some(id)
    }

    /// Make the nearest point under `position` the pivot
    ///
    /// Clears the transition history. Returns false if nothing was hit.
    pub fn choose_pivot(&mut self, position: Vec2) -> bool {
        let Some(id) = self
            .points
            .nearest_within(position, self.settings.choose_radius())
        else {
            return false;
        };

        self.pivot = Some(id);
        self.previous_pivot = None;
        self.rad_since_switch = 0.0;
        self.history.clear();
        self.reseed_sides();
        log::debug!("Pivot chosen: {}", id);
        true
    }

    pub fn is_pivot_set(&self) -> bool {
        self.pivot.is_some()
    }

    pub fn pivot(&self) -> Option<PointId> {
        self.pivot
    }

    pub fn pivot_position(&self) -> Option<Vec2> {
        self.pivot.and_then(|id| self.points.position_of(id))
    }

    // === Lifecycle ===

    /// Begin rotating
    ///
    /// With no pivot chosen, the most recently placed point becomes the pivot.
    /// Fails without touching any state when no points exist. Starting again
    /// mid-run on the same pivot keeps the debounce state.
    pub fn start(&mut self) -> Result<()> {
        let resumed = self.mode != SimMode::Stopped;
        let pivot = match self.pivot.filter(|id| self.points.contains(*id)) {
            Some(id) => id,
            None => match self.points.last_id() {
                Some(id) => id,
                None => {
                    log::warn!("Start ignored: no points placed");
                    return Err(WindmillError::EmptyRegistry);
                }
            },
        };

        if !resumed || self.pivot != Some(pivot) {
            self.previous_pivot = None;
            self.rad_since_switch = 0.0;
        }
        self.pivot = Some(pivot);
        self.cues.clear();
        self.reseed_sides();
        self.mode = SimMode::Running;
        log::info!(
            "Windmill started: pivot {}, {} points, {:.3} rad/s",
            pivot,
            self.points.len(),
            self.angular_speed
        );
        Ok(())
    }

    /// Flip between Running and Paused; does nothing while Stopped
    pub fn toggle_pause(&mut self) -> SimMode {
        self.mode = match self.mode {
            SimMode::Running => SimMode::Paused,
            SimMode::Paused => SimMode::Running,
            SimMode::Stopped => SimMode::Stopped,
        };
        self.mode
    }

    /// Clear everything back to a fresh, stopped windmill
    pub fn restart(&mut self) {
        self.points.clear();
        self.history.clear();
        self.cues.clear();
        self.pivot = None;
        self.previous_pivot = None;
        self.mode = SimMode::Stopped;
        self.angular_speed = self.settings.default_angular_speed;
        self.angle = 0.0;
        self.rad_since_switch = 0.0;
        self.ray = None;
        log::info!("Windmill restarted");
    }

    /// Scale the angular speed, clamping its magnitude and keeping its sign
    pub fn multiply_angular_speed(&mut self, factor: f64) -> f64 {
        self.angular_speed = clamp_magnitude(
            self.angular_speed * factor,
            self.settings.min_angular_speed,
            self.settings.max_angular_speed,
        );
        self.angular_speed
    }

    /// Re-derive point sizes (and hit radii) from the world view height
    pub fn set_view_height(&mut self, view_height: f32) {
        self.settings.view_height = view_height.abs();
    }

    // === Pivot switching ===

    /// Try to hand the pivot to `candidate`
    ///
    /// Returning to the previous pivot is refused until the ray has turned
    /// at least `debounce_radians` since the last switch.
    pub(crate) fn switch_pivot(&mut self, candidate: PointId) -> Option<PivotSwitch> {
        let current = self.pivot?;
        debug_assert_ne!(candidate, current, "pivot is never a crossing candidate");

        if self.previous_pivot == Some(candidate)
            && self.rad_since_switch < self.settings.debounce_radians
        {
            log::trace!(
                "Switch back to {} debounced ({:.3} rad)",
                candidate,
                self.rad_since_switch
            );
            return None;
        }

        let from_pos = self.points.position_of(current);
        let to_pos = self.points.position_of(candidate);
        debug_assert!(from_pos.is_some(), "pivot missing from registry");
        let (from_pos, to_pos) = (from_pos?, to_pos?);

        self.history.record(from_pos, to_pos);
        self.previous_pivot = Some(current);
        self.pivot = Some(candidate);
        self.rad_since_switch = 0.0;

        // The old pivot rejoins the regular points, lying on the line
        let side = on_clockwise_side(to_pos, from_pos, self.angle);
        if let Some(p) = self.points.get_mut(current) {
            p.seed_side(side);
        }

        log::debug!("Pivot {} -> {} at {:.4} rad", current, candidate, self.angle);
        Some(PivotSwitch {
            from: current,
            to: candidate,
            position: to_pos,
        })
    }

    pub(crate) fn reseed_sides(&mut self) {
        let Some(pivot) = self.pivot else { return };
        if let Some(pivot_pos) = self.points.position_of(pivot) {
            reseed(&mut self.points, pivot, pivot_pos, self.angle);
        }
    }

    // === Read-only views ===

    pub fn mode(&self) -> SimMode {
        self.mode
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn angular_speed(&self) -> f64 {
        self.angular_speed
    }

    pub fn settings(&self) -> &WindmillSettings {
        &self.settings
    }

    pub fn points(&self) -> &PointRegistry {
        &self.points
    }

    pub fn history(&self) -> &TransitionHistory {
        &self.history
    }

    pub fn cues(&self) -> &[SwitchCue] {
        &self.cues
    }

    pub fn ray(&self) -> Option<Ray> {
        self.ray
    }

    /// (position, is_pivot) for every point in insertion order
    pub fn point_views(&self) -> Vec<PointView> {
        self.points
            .iter()
            .map(|p| PointView {
                id: p.id(),
                position: p.position(),
                is_pivot: self.pivot == Some(p.id()),
            })
            .collect()
    }

    pub fn snapshot(&self) -> WindmillSnapshot {
        WindmillSnapshot {
            mode: self.mode,
            angle: self.angle,
            angular_speed: self.angular_speed,
            ray: self.ray,
            points: self.point_views(),
            edges: self.history.edges().to_vec(),
            cues: self.cues.clone(),
        }
    }
}
