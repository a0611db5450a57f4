//! Simulation settings and tuning
//!
//! Persisted as a JSON document, separate from any simulation state.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::Result;

/// Shape of the expanding ring shown at a new pivot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CueSettings {
    /// Lifetime in seconds
    pub duration: f32,
    /// Outline thickness relative to the ring radius
    pub thickness: f32,
    /// Starting radius in pivot-marker radii
    pub initial_radius: f32,
    /// Growth in pivot-marker radii per second
    pub speed: f32,
}

impl Default for CueSettings {
    fn default() -> Self {
        Self {
            duration: CUE_DURATION,
            thickness: CUE_THICKNESS,
            initial_radius: CUE_INITIAL_RADIUS,
            speed: CUE_SPEED,
        }
    }
}

/// Windmill tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindmillSettings {
    // === Rotation ===
    /// Angular speed after construction or restart (rad/s)
    pub default_angular_speed: f64,
    /// Lower bound on the angular speed magnitude
    pub min_angular_speed: f64,
    /// Upper bound on the angular speed magnitude
    pub max_angular_speed: f64,
    /// Rotation required before returning to the previous pivot
    pub debounce_radians: f64,

    // === Hit testing ===
    /// Point radius as a fraction of the view height
    pub point_size_proportion: f32,
    /// Pivot marker radius relative to a point
    pub pivot_size_factor: f32,
    /// Click tolerance relative to the marker radius
    pub hit_radius_factor: f32,
    /// World view height used to size points
    pub view_height: f32,

    // === Feedback ===
    pub cue: CueSettings,
}

impl Default for WindmillSettings {
    fn default() -> Self {
        Self {
            default_angular_speed: DEFAULT_ANGULAR_SPEED,
            min_angular_speed: MIN_ANGULAR_SPEED,
            max_angular_speed: MAX_ANGULAR_SPEED,
            debounce_radians: DEBOUNCE_RADIANS,

            point_size_proportion: POINT_SIZE_PROPORTION,
            pivot_size_factor: PIVOT_SIZE_FACTOR,
            hit_radius_factor: HIT_RADIUS_FACTOR,
            view_height: DEFAULT_VIEW_HEIGHT,

            cue: CueSettings::default(),
        }
    }
}

impl WindmillSettings {
    /// Repair bounds a hand-edited document may have broken
    pub fn validated(mut self) -> Self {
        self.min_angular_speed = self.min_angular_speed.abs();
        self.max_angular_speed = self.max_angular_speed.abs();
        if self.min_angular_speed > self.max_angular_speed {
            std::mem::swap(&mut self.min_angular_speed, &mut self.max_angular_speed);
        }
        self.default_angular_speed = clamp_magnitude(
            self.default_angular_speed,
            self.min_angular_speed,
            self.max_angular_speed,
        );
        self.debounce_radians = self.debounce_radians.max(0.0);
        self.view_height = self.view_height.abs();
        self
    }

    /// Radius of a regular point marker in world units
    pub fn point_radius(&self) -> f32 {
        self.point_size_proportion * self.view_height
    }

    /// Radius of the pivot marker in world units
    pub fn pivot_radius(&self) -> f32 {
        self.pivot_size_factor * self.point_radius()
    }

    /// Distance under which a click deletes a point
    pub fn delete_radius(&self) -> f32 {
        self.hit_radius_factor * self.point_radius()
    }

    /// Distance under which a click selects a pivot
    pub fn choose_radius(&self) -> f32 {
        self.hit_radius_factor * self.pivot_radius()
    }

    /// Parse settings from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings.validated())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if let Ok(json) = std::fs::read_to_string(path) {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path.as_ref(), json)
            .map_err(|e| crate::WindmillError::Settings(e.to_string()))?;
        log::info!("Settings saved");
        Ok(())
    }
}

/// Clamp the magnitude of `value` into [min, max], keeping its sign
pub(crate) fn clamp_magnitude(value: f64, min: f64, max: f64) -> f64 {
    let sign = if value.is_sign_negative() { -1.0 } else { 1.0 };
    sign * value.abs().clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_radii() {
        let s = WindmillSettings::default();
        assert!((s.point_radius() - 5.0).abs() < 1e-5);
        assert!((s.pivot_radius() - 7.5).abs() < 1e-5);
        assert!((s.delete_radius() - 7.5).abs() < 1e-5);
        assert!((s.choose_radius() - 11.25).abs() < 1e-5);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let s = WindmillSettings::from_json(r#"{ "debounce_radians": 0.5 }"#).unwrap();
        assert_eq!(s.debounce_radians, 0.5);
        assert_eq!(s.default_angular_speed, DEFAULT_ANGULAR_SPEED);
        assert_eq!(s.cue, CueSettings::default());
    }

    #[test]
    fn test_bad_json_is_settings_error() {
        let err = WindmillSettings::from_json("{ nope").unwrap_err();
        assert!(matches!(err, crate::WindmillError::Settings(_)));
    }

    #[test]
    fn test_validated_swaps_inverted_bounds() {
        let s = WindmillSettings {
            min_angular_speed: 3.0,
            max_angular_speed: -0.5,
            default_angular_speed: 10.0,
            ..Default::default()
        }
        .validated();
        assert_eq!(s.min_angular_speed, 0.5);
        assert_eq!(s.max_angular_speed, 3.0);
        assert_eq!(s.default_angular_speed, 3.0);
    }

    #[test]
    fn test_json_roundtrip_preserves_cue() {
        let mut s = WindmillSettings::default();
        s.cue.duration = 1.25;
        let back = WindmillSettings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let s = WindmillSettings::load("/nonexistent/windmill/settings.json");
        assert_eq!(s, WindmillSettings::default());
    }

    #[test]
    fn test_clamp_magnitude_keeps_sign() {
        assert_eq!(clamp_magnitude(-5.0, 0.001, 2.0), -2.0);
        assert_eq!(clamp_magnitude(0.0, 0.001, 2.0), 0.001);
        assert_eq!(clamp_magnitude(-0.0001, 0.001, 2.0), -0.001);
    }
}
