//! Collision primitives
//!
//! Low-level intersection tests used by [`super::CollisionWorld`]:
//!
//! - [`Aabb`] with the slab-method ray test ([`ray_aabb_intersect`])
//! - [`Triangle`] ray test (Möller-Trumbore, back faces culled)
//! - [`Triangle`] capsule test returning a push-out normal and depth
//!
//! # Example
//!
//! ```ignore
//! use island_portfolio_engine::physics::{Capsule, Triangle};
//! use glam::Vec3;
//!
//! let floor = Triangle::new(
//!     Vec3::new(-5.0, 0.0, -5.0),
//!     Vec3::new(-5.0, 0.0, 5.0),
//!     Vec3::new(5.0, 0.0, 5.0),
//! );
//! let capsule = Capsule::standing_at(Vec3::new(0.0, -0.1, 0.0), 1.0, 0.35);
//! if let Some(hit) = floor.intersect_capsule(&capsule) {
//!     println!("push out by {} along {:?}", hit.depth, hit.normal);
//! }
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::capsule::Capsule;

const EPSILON: f32 = 1e-8;

/// Result of a ray query against the static world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin to the hit point
    pub distance: f32,
    /// World-space hit point
    pub position: Vec3,
    /// Surface normal of the hit triangle (normalized)
    pub normal: Vec3,
}

/// Push-out information for an overlapping capsule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleHit {
    /// Direction to move the capsule out of the geometry (normalized)
    pub normal: Vec3,
    /// How far to move along `normal`
    pub depth: f32,
}

// =============================================================================
// Aabb
// =============================================================================

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// An inverted box that any `grow` call replaces.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn from_points(points: &[Vec3]) -> Self {
        points.iter().fold(Self::empty(), |mut acc, p| {
            acc.grow(*p);
            acc
        })
    }

    pub fn grow(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Box grown by `margin` on every side.
    pub fn padded(&self, margin: f32) -> Aabb {
        let m = Vec3::splat(margin);
        Aabb::new(self.min - m, self.max + m)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// True when min <= max on every axis and all coordinates are finite.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min.cmple(self.max).all()
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Containment test on the play plane only (Z ignored), bounds inclusive.
    pub fn contains_xy(&self, x: f32, y: f32) -> bool {
        x >= self.min.x && x <= self.max.x && y >= self.min.y && y <= self.max.y
    }
}

/// Performs ray-AABB intersection using the slab method.
///
/// Finds entry and exit times against each pair of axis-aligned planes. A
/// ray starting inside the box reports distance 0.
///
/// # Returns
///
/// * `Some(t)` - Distance along the ray to the intersection point (t >= 0)
/// * `None` - No intersection or intersection is behind the ray origin
pub fn ray_aabb_intersect(ray_origin: Vec3, ray_dir: Vec3, aabb: &Aabb) -> Option<f32> {
    // Near-zero components produce huge inverses so that axis never limits the interval
    let inv = |d: f32| {
        if d.abs() > 1e-10 {
            1.0 / d
        } else {
            f32::MAX * if d.is_sign_negative() { -1.0 } else { 1.0 }
        }
    };
    let inv_dir = Vec3::new(inv(ray_dir.x), inv(ray_dir.y), inv(ray_dir.z));

    let t1 = (aabb.min - ray_origin) * inv_dir;
    let t2 = (aabb.max - ray_origin) * inv_dir;

    let t_min = t1.min(t2).max_element();
    let t_max = t1.max(t2).min_element();

    if t_max >= t_min && t_max >= 0.0 {
        Some(t_min.max(0.0))
    } else {
        None
    }
}

// =============================================================================
// Triangle
// =============================================================================

/// A single static collision triangle. Winding is counter-clockwise when
/// viewed from the front face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Unit front-face normal, or `Vec3::ZERO` for a degenerate triangle.
    pub fn normal(&self) -> Vec3 {
        (self.b - self.a).cross(self.c - self.a).normalize_or_zero()
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(&[self.a, self.b, self.c])
    }

    pub fn centroid(&self) -> Vec3 {
        (self.a + self.b + self.c) / 3.0
    }

    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.c.is_finite()
    }

    pub fn is_degenerate(&self) -> bool {
        self.normal() == Vec3::ZERO
    }

    /// Barycentric containment of `point` projected onto the triangle's plane.
    pub fn contains_point(&self, point: Vec3) -> bool {
        let v0 = self.c - self.a;
        let v1 = self.b - self.a;
        let v2 = point - self.a;

        let dot00 = v0.dot(v0);
        let dot01 = v0.dot(v1);
        let dot02 = v0.dot(v2);
        let dot11 = v1.dot(v1);
        let dot12 = v1.dot(v2);

        let denom = dot00 * dot11 - dot01 * dot01;
        if denom.abs() < EPSILON {
            return false;
        }
        let inv = 1.0 / denom;
        let u = (dot11 * dot02 - dot01 * dot12) * inv;
        let v = (dot00 * dot12 - dot01 * dot02) * inv;
        u >= 0.0 && v >= 0.0 && u + v <= 1.0
    }

    /// Ray test against the front face only.
    ///
    /// `ray_dir` must be normalized so the returned distance is in world units.
    pub fn intersect_ray(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<RayHit> {
        let edge1 = self.b - self.a;
        let edge2 = self.c - self.a;
        let pvec = ray_dir.cross(edge2);
        let det = edge1.dot(pvec);

        // det <= 0 means the ray approaches from behind (or runs parallel)
        if det < EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let tvec = ray_origin - self.a;
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let qvec = tvec.cross(edge1);
        let v = ray_dir.dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(qvec) * inv_det;
        if t < 0.0 {
            return None;
        }

        Some(RayHit {
            distance: t,
            position: ray_origin + ray_dir * t,
            normal: self.normal(),
        })
    }

    /// Overlap test between this triangle and a capsule.
    ///
    /// Face contacts push along the plane normal; edge contacts push away from
    /// the closest point on the offending edge.
    pub fn intersect_capsule(&self, capsule: &Capsule) -> Option<CapsuleHit> {
        let normal = self.normal();
        if normal == Vec3::ZERO {
            return None;
        }

        let r = capsule.radius;
        let plane_d = -normal.dot(self.a);
        let d1 = normal.dot(capsule.start) + plane_d - r;
        let d2 = normal.dot(capsule.end) + plane_d - r;

        if (d1 > 0.0 && d2 > 0.0) || (d1 < -r && d2 < -r) {
            return None;
        }

        let span = d1.abs() + d2.abs();
        let t = if span > EPSILON { (d1 / span).abs() } else { 0.0 };
        let sample = capsule.start.lerp(capsule.end, t);
        if self.contains_point(sample) {
            return Some(CapsuleHit {
                normal,
                depth: d1.min(d2).abs(),
            });
        }

        let r2 = r * r;
        for (p, q) in [(self.a, self.b), (self.b, self.c), (self.c, self.a)] {
            let (on_capsule, on_edge) = closest_points_on_segments(capsule.start, capsule.end, p, q);
            let dist_sq = on_capsule.distance_squared(on_edge);
            if dist_sq < r2 {
                let push = (on_capsule - on_edge).normalize_or_zero();
                if push == Vec3::ZERO {
                    continue;
                }
                return Some(CapsuleHit {
                    normal: push,
                    depth: r - dist_sq.sqrt(),
                });
            }
        }

        None
    }
}

/// Closest points between segments `p1-q1` and `p2-q2`.
///
/// Returns `(point_on_first, point_on_second)`.
pub fn closest_points_on_segments(p1: Vec3, q1: Vec3, p2: Vec3, q2: Vec3) -> (Vec3, Vec3) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.dot(d1);
    let e = d2.dot(d2);
    let f = d2.dot(r);

    if a <= EPSILON && e <= EPSILON {
        return (p1, p2);
    }

    let (s, t) = if a <= EPSILON {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(r);
        if e <= EPSILON {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;
            let s = if denom.abs() > EPSILON {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let t = (b * s + f) / e;
            if t < 0.0 {
                ((-c / a).clamp(0.0, 1.0), 0.0)
            } else if t > 1.0 {
                (((b - c) / a).clamp(0.0, 1.0), 1.0)
            } else {
                (s, t)
            }
        }
    };

    (p1 + d1 * s, p2 + d2 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor() -> Triangle {
        Triangle::new(
            Vec3::new(-10.0, 0.0, -10.0),
            Vec3::new(-10.0, 0.0, 10.0),
            Vec3::new(10.0, 0.0, 10.0),
        )
    }

    #[test]
    fn test_ray_aabb_hit_from_outside() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let t = ray_aabb_intersect(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, &aabb);
        assert!((t.unwrap() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_aabb_from_inside_returns_zero() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let t = ray_aabb_intersect(Vec3::ZERO, Vec3::X, &aabb);
        assert_eq!(t, Some(0.0));
    }

    #[test]
    fn test_ray_aabb_behind_origin_misses() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        assert!(ray_aabb_intersect(Vec3::new(0.0, 0.0, 5.0), Vec3::Z, &aabb).is_none());
    }

    #[test]
    fn test_floor_normal_points_up() {
        assert!((floor().normal() - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_ray_hits_front_face() {
        let hit = floor()
            .intersect_ray(Vec3::new(1.0, 2.0, 5.0), Vec3::NEG_Y)
            .unwrap();
        assert!((hit.distance - 2.0).abs() < 1e-5);
        assert!((hit.position.y).abs() < 1e-5);
        assert!((hit.normal - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_ray_culls_back_face() {
        assert!(floor().intersect_ray(Vec3::new(1.0, -2.0, 5.0), Vec3::Y).is_none());
    }

    #[test]
    fn test_capsule_resting_above_floor_misses() {
        let capsule = Capsule::standing_at(Vec3::new(0.0, 0.1, 5.0), 1.0, 0.35);
        assert!(floor().intersect_capsule(&capsule).is_none());
    }

    #[test]
    fn test_capsule_sunk_into_floor_pushes_up() {
        let capsule = Capsule::standing_at(Vec3::new(0.0, -0.2, 5.0), 1.0, 0.35);
        let hit = floor().intersect_capsule(&capsule).unwrap();
        assert!((hit.normal - Vec3::Y).length() < 1e-6);
        assert!((hit.depth - 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_capsule_touching_edge_pushes_away_from_edge() {
        // Wall triangle in the XY plane facing +Z, capsule beside its right edge
        let wall = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        let capsule = Capsule::new(Vec3::new(0.8, 0.5, 0.0), Vec3::new(0.8, 0.5, 0.0), 0.3);
        let hit = wall.intersect_capsule(&capsule).unwrap();
        assert!(hit.depth > 0.0);
        assert!(hit.normal.length() > 0.99);
    }

    #[test]
    fn test_closest_points_parallel_segments() {
        let (a, b) = closest_points_on_segments(
            Vec3::ZERO,
            Vec3::Y,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        );
        assert!((a.distance(b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_contains_xy_is_inclusive() {
        let aabb = Aabb::new(Vec3::new(0.0, 0.0, -1.0), Vec3::new(2.0, 2.0, 1.0));
        assert!(aabb.contains_xy(2.0, 0.0));
        assert!(!aabb.contains_xy(2.01, 0.0));
    }
}
