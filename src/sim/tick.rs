//! Simulation step
//!
//! One call per externally supplied elapsed time. Per step: rotate the ray,
//! reclassify every point, then hand crossings one at a time to the pivot
//! resolver until one switch is accepted.

use glam::Vec2;

use super::cue::SwitchCue;
use super::state::{PivotSwitch, Ray, SimMode, Windmill};
use super::sweep::{crossings, sweep};
use crate::wrap_angle;

/// One-shot commands gathered by the host since the last tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Clear everything before anything else runs
    pub restart: bool,
    /// Delete the point under this position
    pub delete_at: Option<Vec2>,
    /// Points to place, in order
    pub add_points: Vec<Vec2>,
    /// Pick the pivot under this position
    pub choose_pivot_at: Option<Vec2>,
    /// Multiply the angular speed
    pub speed_factor: Option<f64>,
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
}

impl Windmill {
    /// Advance the simulation by `dt` seconds
    ///
    /// `ray_length` only sizes the rendered ray. Returns the switch committed
    /// this step, if any; at most one switch happens per step.
    pub fn advance(&mut self, dt: f32, ray_length: f32) -> Option<PivotSwitch> {
        if self.mode == SimMode::Stopped {
            return None;
        }
        let pivot = self.pivot?;

        if self.mode == SimMode::Paused {
            self.update_ray(ray_length);
            return None;
        }

        // A broken host timer must not poison the angle
        let dt = if dt.is_finite() {
            dt
        } else {
            log::warn!("Ignoring non-finite dt: {}", dt);
            0.0
        };

        let delta = self.angular_speed * f64::from(dt);
        self.angle = wrap_angle(self.angle + delta);
        self.rad_since_switch += delta.abs();

        for cue in &mut self.cues {
            cue.advance(dt);
        }

        let Some(pivot_pos) = self.points.position_of(pivot) else {
            debug_assert!(false, "pivot {} missing from registry", pivot);
            return None;
        };
        sweep(&mut self.points, pivot, pivot_pos, self.angle);

        let switch = crossings(&self.points, pivot)
            .into_iter()
            .find_map(|candidate| self.switch_pivot(candidate));

        if let Some(switch) = switch {
            self.cues.push(SwitchCue::new(switch.position, &self.settings.cue));
        }
        self.cues.retain(|cue| !cue.is_finished());

        self.update_ray(ray_length);
        switch
    }

    fn update_ray(&mut self, ray_length: f32) {
        self.ray = self.pivot_position().map(|origin| Ray {
            origin,
            angle: self.angle,
            length: ray_length,
        });
    }
}

/// Apply `input` then advance one step
pub fn tick(
    windmill: &mut Windmill,
    input: &TickInput,
    dt: f32,
    ray_length: f32,
) -> Option<PivotSwitch> {
    if input.restart {
        windmill.restart();
    }

    if let Some(pos) = input.delete_at {
        windmill.try_delete(pos);
    }
    for &pos in &input.add_points {
        windmill.add_point(pos);
    }
    if let Some(pos) = input.choose_pivot_at {
        windmill.choose_pivot(pos);
    }

    if let Some(factor) = input.speed_factor {
        let speed = windmill.multiply_angular_speed(factor);
        log::debug!("Angular speed: {:.4} rad/s", speed);
    }

    if input.start {
        if let Err(e) = windmill.start() {
            log::debug!("Start command dropped: {}", e);
        }
    }
    if input.pause {
        windmill.toggle_pause();
    }

    windmill.advance(dt, ray_length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::WindmillSettings;
    use crate::sim::PointId;
    use proptest::prelude::*;
    use std::f64::consts::TAU;

    /// 0.45 rad/s * 0.05 s = 0.0225 rad per step
    const DT: f32 = 0.05;
    const RAY: f32 = 1000.0;

    fn triangle(settings: WindmillSettings) -> (Windmill, [PointId; 3]) {
        let mut w = Windmill::new(settings);
        let p0 = w.add_point(Vec2::new(0.0, 0.0));
        let p1 = w.add_point(Vec2::new(10.0, 0.0));
        let p2 = w.add_point(Vec2::new(0.0, 10.0));
        assert!(w.choose_pivot(Vec2::ZERO));
        w.start().unwrap();
        (w, [p0, p1, p2])
    }

    #[test]
    fn test_stopped_is_noop() {
        let mut w = Windmill::default();
        w.add_point(Vec2::ZERO);
        assert!(w.advance(DT, RAY).is_none());
        assert_eq!(w.angle(), 0.0);
        assert!(w.ray().is_none());
    }

    #[test]
    fn test_triangle_first_two_switches() {
        let (mut w, [p0, p1, p2]) = triangle(WindmillSettings::default());

        // P1 lies on the ray at θ = 0, so the first step already crosses it
        let first = w.advance(DT, RAY).unwrap();
        assert_eq!((first.from, first.to), (p0, p1));

        // From P1, P2's bearing is 3π/4; nothing else flips before that
        let mut switches = vec![first];
        while w.angle() < 2.5 {
            switches.extend(w.advance(DT, RAY));
        }
        assert_eq!(switches.len(), 2);
        assert_eq!((switches[1].from, switches[1].to), (p1, p2));

        let edges = w.history().edges();
        assert_eq!(edges.len(), 2);
        assert_eq!((edges[0].from, edges[0].to), (Vec2::ZERO, Vec2::new(10.0, 0.0)));
        assert_eq!((edges[1].from, edges[1].to), (Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)));
        assert_eq!(w.pivot(), Some(p2));
    }

    #[test]
    fn test_triangle_full_revolution_reuses_edge() {
        let (mut w, [p0, p1, p2]) = triangle(WindmillSettings::default());

        let mut turned = 0.0;
        let mut switches = Vec::new();
        while turned < TAU + 0.1 {
            switches.extend(w.advance(DT, RAY));
            turned += w.angular_speed() * f64::from(DT);
        }

        let hops: Vec<_> = switches.iter().map(|s| (s.from, s.to)).collect();
        assert_eq!(hops, vec![(p0, p1), (p1, p2), (p2, p0), (p0, p1)]);
        assert_eq!(w.history().len(), 3);
        assert_eq!(w.pivot(), Some(p1));
    }

    #[test]
    fn test_reversal_is_debounced() {
        let (mut w, [_, p1, _]) = triangle(WindmillSettings::default());
        w.advance(DT, RAY).unwrap();
        assert_eq!(w.pivot(), Some(p1));

        // Swing back across P0 straight away
        w.multiply_angular_speed(-1.0);
        for _ in 0..3 {
            assert!(w.advance(DT, RAY).is_none());
        }
        assert_eq!(w.pivot(), Some(p1));
        assert_eq!(w.history().len(), 1);
    }

    #[test]
    fn test_reversal_without_debounce_switches_back() {
        let settings = WindmillSettings {
            debounce_radians: 0.0,
            ..Default::default()
        };
        let (mut w, [p0, p1, _]) = triangle(settings);
        w.advance(DT, RAY).unwrap();

        w.multiply_angular_speed(-1.0);
        let back = (0..3).find_map(|_| w.advance(DT, RAY)).unwrap();
        assert_eq!((back.from, back.to), (p1, p0));
        assert_eq!(w.history().len(), 2);
    }

    #[test]
    fn test_non_finite_dt_is_ignored() {
        let (mut w, [_, p1, _]) = triangle(WindmillSettings::default());
        w.advance(DT, RAY).unwrap();
        let angle = w.angle();

        for dt in [f32::INFINITY, f32::NEG_INFINITY, f32::NAN] {
            assert!(w.advance(dt, RAY).is_none());
            assert_eq!(w.angle(), angle);
            assert!(w.rad_since_switch.is_finite());
            assert_eq!(w.pivot(), Some(p1));
        }

        // Normal steps carry on from where the run left off
        w.advance(DT, RAY);
        assert!((0.0..TAU).contains(&w.angle()));
        assert!(w.angle() > angle);
    }

    #[test]
    fn test_paused_freezes_angle_but_tracks_ray() {
        let (mut w, _) = triangle(WindmillSettings::default());
        w.advance(DT, RAY);
        w.toggle_pause();

        let angle = w.angle();
        let cues = w.cues().to_vec();
        for _ in 0..20 {
            assert!(w.advance(DT, 42.0).is_none());
        }
        assert_eq!(w.angle(), angle);
        assert_eq!(w.cues(), cues.as_slice());
        let ray = w.ray().unwrap();
        assert_eq!(ray.length, 42.0);
        assert_eq!(Some(ray.origin), w.pivot_position());
    }

    #[test]
    fn test_switch_spawns_cue_that_expires() {
        let (mut w, _) = triangle(WindmillSettings::default());
        assert!(w.advance(DT, RAY).is_some());
        assert_eq!(w.cues().len(), 1);
        assert_eq!(w.cues()[0].position, Vec2::new(10.0, 0.0));
        assert_eq!(w.cues()[0].age, 0.0);

        // Next switch is ~100 steps away; the cue lasts 0.6 s
        for _ in 0..13 {
            assert!(w.advance(DT, RAY).is_none());
        }
        assert!(w.cues().is_empty());
    }

    #[test]
    fn test_start_clears_cues() {
        let (mut w, _) = triangle(WindmillSettings::default());
        w.advance(DT, RAY);
        assert!(!w.cues().is_empty());
        w.start().unwrap();
        assert!(w.cues().is_empty());
    }

    #[test]
    fn test_tick_input_lifecycle() {
        let mut w = Windmill::default();

        // Start with nothing placed is ignored
        let input = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut w, &input, DT, RAY);
        assert_eq!(w.mode(), SimMode::Stopped);

        let input = TickInput {
            add_points: vec![Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(0.0, 10.0)],
            choose_pivot_at: Some(Vec2::ZERO),
            start: true,
            ..Default::default()
        };
        let switch = tick(&mut w, &input, DT, RAY);
        assert_eq!(w.mode(), SimMode::Running);
        assert!(switch.is_some());

        // Deleting the pivot stops the run but leaves the other points
        let pivot_pos = w.pivot_position().unwrap();
        let input = TickInput {
            delete_at: Some(pivot_pos),
            ..Default::default()
        };
        tick(&mut w, &input, DT, RAY);
        assert_eq!(w.mode(), SimMode::Stopped);
        assert!(!w.is_pivot_set());
        assert_eq!(w.points().len(), 2);

        let input = TickInput {
            restart: true,
            speed_factor: Some(2.0),
            ..Default::default()
        };
        tick(&mut w, &input, DT, RAY);
        assert!(w.points().is_empty());
        assert!(w.history().is_empty());
        assert!((w.angular_speed() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_tick_pause_toggle() {
        let (mut w, _) = triangle(WindmillSettings::default());
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut w, &pause, DT, RAY);
        assert_eq!(w.mode(), SimMode::Paused);
        tick(&mut w, &pause, DT, RAY);
        assert_eq!(w.mode(), SimMode::Running);
    }

    #[test]
    fn test_points_added_mid_run_do_not_cross_immediately() {
        let (mut w, _) = triangle(WindmillSettings::default());
        for _ in 0..10 {
            w.advance(DT, RAY);
        }
        let pivot = w.pivot();
        let history = w.history().len();
        // Far from every bearing the ray is about to reach
        w.add_point(Vec2::new(-7.0, 3.0));
        w.advance(0.0, RAY);
        assert_eq!(w.pivot(), pivot);
        assert_eq!(w.history().len(), history);
    }

    proptest! {
        #[test]
        fn prop_invariants_hold_over_random_runs(
            points in prop::collection::vec((-50.0f32..50.0, -50.0f32..50.0), 1..10),
            steps in prop::collection::vec(0.0f32..0.2, 1..300),
            speed in 0.1f64..4.0
        ) {
            let mut w = Windmill::default();
            for (x, y) in &points {
                w.add_point(Vec2::new(*x, *y));
            }
            w.multiply_angular_speed(speed);
            w.start().unwrap();

            for dt in steps {
                w.advance(dt, RAY);

                prop_assert!((0.0..TAU).contains(&w.angle()));
                let pivots = w.point_views().iter().filter(|p| p.is_pivot).count();
                prop_assert_eq!(pivots, 1);
                prop_assert!(w.points().contains(w.pivot().unwrap()));

                let edges = w.history().edges();
                for i in 0..edges.len() {
                    for j in (i + 1)..edges.len() {
                        prop_assert!(edges[i] != edges[j]);
                    }
                }
            }
        }
    }
}
