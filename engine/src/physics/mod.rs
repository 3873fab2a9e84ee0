//! Physics module
//!
//! Custom collision and character physics for a character that walks a
//! vertical play plane (Z is fixed at 0) through a static 3D collision mesh.
//! Built from scratch on glam, without an external physics library.
//!
//! # Unit System
//!
//! **1 unit = 1 meter**, velocities in units per second.
//!
//! # Submodules
//!
//! - [`collision`] - Primitive tests: ray-AABB slab test, ray-triangle, capsule-triangle
//! - [`capsule`] - The vertical capsule collider owned by the character
//! - [`world`] - [`CollisionWorld`], a bounding-volume tree over the static mesh

pub mod capsule;
pub mod collision;
pub mod world;

pub use capsule::Capsule;
pub use collision::{Aabb, CapsuleHit, RayHit, Triangle, ray_aabb_intersect};
pub use world::CollisionWorld;
