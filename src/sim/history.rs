//! Transition history
//!
//! Every committed pivot switch is recorded as a directed edge between the two
//! pivot positions. An ordered (from, to) pair is stored at most once.

use std::f64::consts::{FRAC_PI_2, PI};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A recorded pivot switch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionEdge {
    pub from: Vec2,
    pub to: Vec2,
}

impl TransitionEdge {
    pub fn new(from: Vec2, to: Vec2) -> Self {
        Self { from, to }
    }

    pub fn length(&self) -> f32 {
        self.from.distance(self.to)
    }

    /// Direction of travel in radians (vertical edges take an explicit branch)
    pub fn heading(&self) -> f64 {
        let dx = f64::from(self.to.x) - f64::from(self.from.x);
        let dy = f64::from(self.to.y) - f64::from(self.from.y);
        if dx == 0.0 {
            if dy > 0.0 { FRAC_PI_2 } else { 3.0 * FRAC_PI_2 }
        } else if dx < 0.0 {
            (dy / dx).atan() + PI
        } else {
            (dy / dx).atan()
        }
    }
}

/// Append-only set of edges, kept in first-recorded order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransitionHistory {
    edges: Vec<TransitionEdge>,
}

impl TransitionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an edge; returns false if the same ordered pair already exists
    pub fn record(&mut self, from: Vec2, to: Vec2) -> bool {
        if self.contains(from, to) {
            return false;
        }
        self.edges.push(TransitionEdge::new(from, to));
        true
    }

    pub fn contains(&self, from: Vec2, to: Vec2) -> bool {
        self.edges.iter().any(|e| e.from == from && e.to == to)
    }

    pub fn edges(&self) -> &[TransitionEdge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn clear(&mut self) {
        self.edges.clear();
    }

    /// RGB shade for edge `index`, fading from deep blue (oldest) to teal (newest)
    pub fn shade(&self, index: usize) -> [u8; 3] {
        let n = self.edges.len();
        let t = if n > 1 {
            index as f32 / (n - 1) as f32
        } else {
            0.0
        };
        let t = t.clamp(0.0, 1.0);
        [(30.0 * t) as u8, (90.0 * t) as u8, (90.0 * (1.0 - t)) as u8]
    }
}
