//! Collision World
//!
//! A bounding-volume tree over the static collision triangles of the level.
//! Built once at load time and read-only afterwards; every query takes `&self`.
//!
//! Malformed input never fails construction: non-finite and degenerate
//! triangles are dropped with a warning, and an empty input yields an empty
//! world whose queries all return `None`. A character in an empty world simply
//! free-falls.

use glam::Vec3;
use log::{debug, warn};

use super::capsule::Capsule;
use super::collision::{Aabb, CapsuleHit, RayHit, Triangle, ray_aabb_intersect};

/// Triangles per leaf before a node is split
const MAX_LEAF_TRIANGLES: usize = 4;

#[derive(Debug, Clone)]
enum NodeKind {
    Leaf { first: usize, count: usize },
    Branch { left: usize, right: usize },
}

#[derive(Debug, Clone)]
struct Node {
    bounds: Aabb,
    kind: NodeKind,
}

/// Static collision geometry with capsule and ray queries.
#[derive(Debug, Clone, Default)]
pub struct CollisionWorld {
    triangles: Vec<Triangle>,
    nodes: Vec<Node>,
}

impl CollisionWorld {
    /// Build the tree from a triangle soup.
    pub fn build(triangles: &[Triangle]) -> Self {
        let mut kept: Vec<Triangle> = triangles
            .iter()
            .copied()
            .filter(|t| t.is_finite() && !t.is_degenerate())
            .collect();

        let dropped = triangles.len() - kept.len();
        if dropped > 0 {
            warn!("collision mesh: dropped {dropped} malformed triangle(s)");
        }
        if kept.is_empty() {
            warn!("collision mesh is empty; character will free-fall");
            return Self::default();
        }

        let mut nodes = Vec::with_capacity(kept.len() / MAX_LEAF_TRIANGLES * 2 + 1);
        let count = kept.len();
        build_node(&mut kept, 0, count, &mut nodes);
        debug!(
            "collision world built: {} triangles, {} nodes",
            kept.len(),
            nodes.len()
        );

        Self {
            triangles: kept,
            nodes,
        }
    }

    /// An explicitly empty world.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Bounds of all geometry, if any.
    pub fn bounds(&self) -> Option<Aabb> {
        self.nodes.first().map(|n| n.bounds)
    }

    /// Resolve overlap between `capsule` and the world.
    ///
    /// Each overlapping triangle pushes a working copy of the capsule out in
    /// turn; the result is the total displacement expressed as a unit normal
    /// and a depth. Returns `None` when nothing overlaps.
    pub fn sweep_capsule(&self, capsule: &Capsule) -> Option<CapsuleHit> {
        if self.is_empty() {
            return None;
        }

        let mut candidates = Vec::new();
        self.collect_overlapping(&capsule.bounds(), &mut candidates);

        let mut working = *capsule;
        let mut last_normal = None;
        for idx in candidates {
            if let Some(hit) = self.triangles[idx].intersect_capsule(&working) {
                working.translate(hit.normal * hit.depth);
                last_normal = Some(hit.normal);
            }
        }

        let last_normal = last_normal?;
        let displacement = working.center() - capsule.center();
        let depth = displacement.length();
        if depth > 1e-6 {
            Some(CapsuleHit {
                normal: displacement / depth,
                depth,
            })
        } else {
            // Touching contact: report the surface without moving
            Some(CapsuleHit {
                normal: last_normal,
                depth: 0.0,
            })
        }
    }

    /// Nearest front-facing triangle hit along a ray of any length.
    ///
    /// `direction` is normalized internally.
    pub fn cast_ray(&self, origin: Vec3, direction: Vec3) -> Option<RayHit> {
        self.cast_ray_within(origin, direction, f32::INFINITY)
    }

    /// Nearest hit no further than `max_distance`.
    pub fn cast_ray_within(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if self.is_empty() || dir == Vec3::ZERO {
            return None;
        }

        let mut best: Option<RayHit> = None;
        let mut limit = max_distance;
        let mut stack = vec![0usize];

        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx];
            match ray_aabb_intersect(origin, dir, &node.bounds) {
                Some(t) if t <= limit => {}
                _ => continue,
            }

            match node.kind {
                NodeKind::Leaf { first, count } => {
                    for tri in &self.triangles[first..first + count] {
                        if let Some(hit) = tri.intersect_ray(origin, dir) {
                            if hit.distance <= limit {
                                limit = hit.distance;
                                best = Some(hit);
                            }
                        }
                    }
                }
                NodeKind::Branch { left, right } => {
                    stack.push(left);
                    stack.push(right);
                }
            }
        }

        best
    }

    fn collect_overlapping(&self, query: &Aabb, out: &mut Vec<usize>) {
        let mut stack = vec![0usize];
        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx];
            if !node.bounds.intersects(query) {
                continue;
            }
            match node.kind {
                NodeKind::Leaf { first, count } => {
                    out.extend(
                        (first..first + count).filter(|&i| self.triangles[i].bounds().intersects(query)),
                    );
                }
                NodeKind::Branch { left, right } => {
                    stack.push(left);
                    stack.push(right);
                }
            }
        }
        // Resolution order must not depend on traversal order
        out.sort_unstable();
    }
}

/// Recursively build the subtree for `triangles[first..first + count]`.
///
/// Splits at the median centroid along the longest axis of the centroid bounds.
fn build_node(triangles: &mut [Triangle], first: usize, count: usize, nodes: &mut Vec<Node>) -> usize {
    let slice = &mut triangles[first..first + count];
    let bounds = slice
        .iter()
        .fold(Aabb::empty(), |acc, t| acc.union(&t.bounds()));

    let node_idx = nodes.len();
    nodes.push(Node {
        bounds,
        kind: NodeKind::Leaf { first, count },
    });

    if count <= MAX_LEAF_TRIANGLES {
        return node_idx;
    }

    let centroid_bounds = Aabb::from_points(&slice.iter().map(Triangle::centroid).collect::<Vec<_>>());
    let extent = centroid_bounds.size();
    let axis = if extent.x >= extent.y && extent.x >= extent.z {
        0
    } else if extent.y >= extent.z {
        1
    } else {
        2
    };

    let mid = count / 2;
    slice.select_nth_unstable_by(mid, |a, b| a.centroid()[axis].total_cmp(&b.centroid()[axis]));

    let left = build_node(triangles, first, mid, nodes);
    let right = build_node(triangles, first + mid, count - mid, nodes);
    nodes[node_idx].kind = NodeKind::Branch { left, right };
    node_idx
}
