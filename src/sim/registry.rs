//! Point registry
//!
//! Points keep insertion order, which is also the order crossings are
//! resolved in. Identities come from a per-registry counter and are never
//! handed out twice, even after deletions or a clear.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Stable identity of a placed point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointId(u32);

impl std::fmt::Display for PointId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A user-placed point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Point {
    id: PointId,
    position: Vec2,
    /// Side of the ray at the current step
    pub on_clockwise_side: bool,
    /// Side of the ray at the previous step
    pub on_clockwise_side_before: bool,
}

impl Point {
    fn new(id: PointId, position: Vec2) -> Self {
        Self {
            id,
            position,
            on_clockwise_side: false,
            on_clockwise_side_before: false,
        }
    }

    #[inline]
    pub fn id(&self) -> PointId {
        self.id
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Set both side flags so no crossing is reported next step
    #[inline]
    pub fn seed_side(&mut self, side: bool) {
        self.on_clockwise_side = side;
        self.on_clockwise_side_before = side;
    }

    /// True if the side changed between the last two steps
    #[inline]
    pub fn crossed(&self) -> bool {
        self.on_clockwise_side != self.on_clockwise_side_before
    }
}

/// Ordered collection of points with arena-style identities
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointRegistry {
    points: Vec<Point>,
    next_id: u32,
}

impl PointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point and return its fresh identity
    pub fn push(&mut self, position: Vec2) -> PointId {
        let id = PointId(self.next_id);
        self.next_id += 1;
        self.points.push(Point::new(id, position));
        id
    }

    pub fn get(&self, id: PointId) -> Option<&Point> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: PointId) -> Option<&mut Point> {
        self.points.iter_mut().find(|p| p.id == id)
    }

    pub fn contains(&self, id: PointId) -> bool {
        self.get(id).is_some()
    }

    pub fn position_of(&self, id: PointId) -> Option<Vec2> {
        self.get(id).map(Point::position)
    }

    pub fn remove(&mut self, id: PointId) -> Option<Point> {
        let index = self.points.iter().position(|p| p.id == id)?;
        Some(self.points.remove(index))
    }

    /// First point (insertion order) strictly closer than `radius`
    pub fn first_within(&self, position: Vec2, radius: f32) -> Option<PointId> {
        self.points
            .iter()
            .find(|p| p.position.distance(position) < radius)
            .map(Point::id)
    }

    /// Closest point strictly closer than `radius`; ties go to the earlier point
    pub fn nearest_within(&self, position: Vec2, radius: f32) -> Option<PointId> {
        let mut best: Option<(PointId, f32)> = None;
        for p in &self.points {
            let dist = p.position.distance(position);
            if dist >= radius {
                continue;
            }
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((p.id, dist));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Most recently added point still present
    pub fn last_id(&self) -> Option<PointId> {
        self.points.last().map(Point::id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.points.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Point> {
        self.points.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Remove every point; the identity counter keeps running
    pub fn clear(&mut self) {
        self.points.clear();
    }
}
