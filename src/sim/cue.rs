//! Transient "pop" cues
//!
//! A cue is an expanding, fading ring spawned at the new pivot on every
//! switch. Each cue owns its data and ages on its own clock.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::settings::CueSettings;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwitchCue {
    pub position: Vec2,
    /// Seconds since the switch
    pub age: f32,
    pub duration: f32,
    /// Outline thickness relative to the ring radius
    pub thickness: f32,
    pub initial_radius: f32,
    pub speed: f32,
}

impl SwitchCue {
    pub fn new(position: Vec2, settings: &CueSettings) -> Self {
        Self {
            position,
            age: 0.0,
            duration: settings.duration,
            thickness: settings.thickness,
            initial_radius: settings.initial_radius,
            speed: settings.speed,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.age += dt;
    }

    /// Ring radius in pivot-marker radii
    pub fn radius_scale(&self) -> f32 {
        self.initial_radius + self.age * self.speed
    }

    /// Opacity in [0, 1]
    pub fn alpha(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (1.0 - self.age / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.age > self.duration
    }
}
