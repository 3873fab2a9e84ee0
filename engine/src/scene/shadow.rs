//! Blob Shadow
//!
//! A soft disc under the character that fades and shrinks with height above
//! the ground.

use glam::{Vec2, Vec3};

use crate::config::ShadowConfig;
use crate::physics::{Capsule, CollisionWorld};

/// Height below the character's feet assumed when nothing is underneath.
const FALLBACK_DROP: f32 = 1.35;

/// Ray origin lift above the capsule's upper point.
const RAY_LIFT: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct BlobShadow {
    config: ShadowConfig,
    pub position: Vec3,
    pub opacity: f32,
    pub scale: f32,
    pub visible: bool,
}

impl BlobShadow {
    pub fn new(config: &ShadowConfig) -> Self {
        Self {
            config: config.clone(),
            position: Vec3::new(0.0, config.lift, 0.0),
            opacity: 0.35,
            scale: 1.0,
            visible: true,
        }
    }

    /// Re-place the shadow under the character and ease its look.
    pub fn update(&mut self, world: &CollisionWorld, capsule: &Capsule, character: Vec2) {
        let cfg = &self.config;
        let origin = capsule.end + Vec3::Y * RAY_LIFT;

        let (distance, ground_y) = match world.cast_ray(origin, Vec3::NEG_Y) {
            Some(hit) => (hit.distance.min(cfg.max_distance), hit.position.y),
            None => (cfg.max_distance, character.y - FALLBACK_DROP),
        };

        self.position = Vec3::new(character.x, ground_y + cfg.lift, 0.0);

        let t = if cfg.max_distance > 0.0 {
            (distance / cfg.max_distance).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let target_opacity = (1.0 - t) * cfg.max_opacity;
        self.opacity += (target_opacity - self.opacity) * cfg.smoothing;

        let target_scale = cfg.near_scale + (cfg.far_scale - cfg.near_scale) * t;
        self.scale += (target_scale - self.scale) * cfg.smoothing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::Triangle;

    fn floor() -> CollisionWorld {
        CollisionWorld::build(&[Triangle::new(
            Vec3::new(-200.0, 0.0, -5.0),
            Vec3::new(0.0, 0.0, 400.0),
            Vec3::new(200.0, 0.0, -5.0),
        )])
    }

    #[test]
    fn test_shadow_sits_on_ground_below_character() {
        let world = floor();
        let mut shadow = BlobShadow::new(&ShadowConfig::default());
        let capsule = Capsule::standing_at(Vec3::new(3.0, 5.0, 0.0), 1.0, 0.35);
        shadow.update(&world, &capsule, Vec2::new(3.0, 5.0));
        assert!((shadow.position - Vec3::new(3.0, 0.02, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_high_character_fades_shadow_out() {
        let world = floor();
        let mut shadow = BlobShadow::new(&ShadowConfig::default());
        let capsule = Capsule::standing_at(Vec3::new(0.0, 10.0, 0.0), 1.0, 0.35);
        for _ in 0..100 {
            shadow.update(&world, &capsule, Vec2::new(0.0, 10.0));
        }
        assert!(shadow.opacity < 1e-3);
        assert!((shadow.scale - 0.65).abs() < 1e-3);
    }

    #[test]
    fn test_no_ground_uses_fallback_height() {
        let world = CollisionWorld::empty();
        let mut shadow = BlobShadow::new(&ShadowConfig::default());
        let capsule = Capsule::standing_at(Vec3::new(1.0, 2.0, 0.0), 1.0, 0.35);
        shadow.update(&world, &capsule, Vec2::new(1.0, 2.0));
        assert!((shadow.position.y - (2.0 - 1.35 + 0.02)).abs() < 1e-5);
    }
}
