//! Capsule Collider
//!
//! A vertical line segment (`start` below `end`) swept by a fixed radius.
//! The character owns exactly one of these and translates it every physics
//! substep; the logical character position is derived from it afterwards.

use glam::Vec3;

use super::collision::Aabb;

/// Swept-sphere collider defined by a segment and a radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    /// Lower segment endpoint
    pub start: Vec3,
    /// Upper segment endpoint
    pub end: Vec3,
    /// Sphere radius around the segment
    pub radius: f32,
}

impl Capsule {
    pub fn new(start: Vec3, end: Vec3, radius: f32) -> Self {
        Self { start, end, radius }
    }

    /// Build a capsule whose bottom-most point sits at `feet`.
    ///
    /// `segment_height` is the distance between the two segment endpoints.
    pub fn standing_at(feet: Vec3, segment_height: f32, radius: f32) -> Self {
        let start = feet + Vec3::Y * radius;
        Self {
            start,
            end: start + Vec3::Y * segment_height,
            radius,
        }
    }

    /// Move both endpoints by `delta`.
    pub fn translate(&mut self, delta: Vec3) {
        self.start += delta;
        self.end += delta;
    }

    /// Place the capsule so its bottom-most point sits at `feet`, keeping its shape.
    pub fn set_feet(&mut self, feet: Vec3) {
        let height = self.end - self.start;
        self.start = feet + Vec3::Y * self.radius;
        self.end = self.start + height;
    }

    /// Snap both endpoints to the given X without touching Y/Z.
    pub fn set_x(&mut self, x: f32) {
        self.start.x = x;
        self.end.x = x;
    }

    /// Bottom-most point of the capsule.
    pub fn feet(&self) -> Vec3 {
        self.start - Vec3::Y * self.radius
    }

    pub fn center(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    /// World-space bounds including the radius.
    pub fn bounds(&self) -> Aabb {
        let r = Vec3::splat(self.radius);
        Aabb::new(self.start.min(self.end) - r, self.start.max(self.end) + r)
    }

    pub fn is_finite(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.radius.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standing_at_places_feet() {
        let capsule = Capsule::standing_at(Vec3::new(2.0, 1.0, 0.0), 1.0, 0.35);
        assert!((capsule.start.y - 1.35).abs() < 1e-6);
        assert!((capsule.end.y - 2.35).abs() < 1e-6);
        assert!((capsule.feet().y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_translate_moves_both_ends() {
        let mut capsule = Capsule::standing_at(Vec3::ZERO, 1.0, 0.35);
        capsule.translate(Vec3::new(1.0, -0.5, 0.0));
        assert_eq!(capsule.start.x, 1.0);
        assert_eq!(capsule.end.x, 1.0);
        assert!((capsule.feet().y + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_set_feet_keeps_height() {
        let mut capsule = Capsule::standing_at(Vec3::ZERO, 1.0, 0.35);
        capsule.set_feet(Vec3::new(-3.0, 4.0, 0.0));
        assert!(((capsule.end.y - capsule.start.y) - 1.0).abs() < 1e-6);
        assert!((capsule.feet() - Vec3::new(-3.0, 4.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_bounds_include_radius() {
        let capsule = Capsule::standing_at(Vec3::ZERO, 1.0, 0.5);
        let bounds = capsule.bounds();
        assert!((bounds.min - Vec3::new(-0.5, 0.0, -0.5)).length() < 1e-6);
        assert!((bounds.max - Vec3::new(0.5, 2.0, 0.5)).length() < 1e-6);
    }
}
