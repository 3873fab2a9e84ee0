//! Character State
//!
//! The single player avatar. Motion is confined to the X/Y play plane; the
//! capsule collider is owned here and the logical position is derived from
//! it after every physics tick.

use glam::{Vec2, Vec3};

use super::auto_walk::{ArrivalAction, AutoWalk};
use super::pose::CharacterPose;
use crate::config::PhysicsConfig;
use crate::physics::Capsule;

/// Simulation state of the player avatar.
#[derive(Debug, Clone)]
pub struct Character {
    /// Feet position on the play plane
    pub position: Vec2,
    /// Horizontal and vertical velocity (units/s)
    pub velocity: Vec2,
    /// Remaining grace substeps; grounded is derived from this
    grounded_frames: u32,
    /// Normal of the last ground contact, valid while `has_ground_normal`
    pub ground_normal: Vec3,
    pub has_ground_normal: bool,
    pub capsule: Capsule,
    auto_walk: Option<AutoWalk>,
    pub pose: CharacterPose,
}

impl Character {
    /// Create a character standing with its feet at `feet`.
    pub fn new(feet: Vec2, physics: &PhysicsConfig) -> Self {
        Self {
            position: feet,
            velocity: Vec2::ZERO,
            grounded_frames: 0,
            ground_normal: Vec3::Y,
            has_ground_normal: false,
            capsule: Capsule::standing_at(
                feet.extend(0.0),
                physics.capsule_segment_height,
                physics.capsule_radius,
            ),
            auto_walk: None,
            pose: CharacterPose::default(),
        }
    }

    /// True while the grace counter has substeps left.
    pub fn is_grounded(&self) -> bool {
        self.grounded_frames > 0
    }

    pub fn grounded_frames(&self) -> u32 {
        self.grounded_frames
    }

    /// Mark a ground contact, refilling the grace counter.
    pub fn touch_ground(&mut self, grace_frames: u32) {
        self.grounded_frames = grace_frames;
    }

    /// Spend one grace substep.
    pub fn lose_ground(&mut self) {
        self.grounded_frames = self.grounded_frames.saturating_sub(1);
    }

    /// Drop grounded immediately.
    pub fn leave_ground(&mut self) {
        self.grounded_frames = 0;
        self.has_ground_normal = false;
    }

    /// Record the normal of the surface underfoot.
    pub fn set_ground_normal(&mut self, normal: Vec3) {
        self.ground_normal = normal;
        self.has_ground_normal = true;
    }

    /// Move instantly to `feet`, keeping the capsule in sync and stopping all motion.
    pub fn place_at(&mut self, feet: Vec2) {
        self.capsule.set_feet(feet.extend(0.0));
        self.position = feet;
        self.velocity = Vec2::ZERO;
    }

    /// Snap horizontally to `x` without touching Y.
    pub fn snap_x(&mut self, x: f32) {
        self.position.x = x;
        self.capsule.set_x(x);
    }

    /// Stop all motion and cancel any auto-walk.
    pub fn freeze(&mut self) {
        self.velocity = Vec2::ZERO;
        self.auto_walk = None;
    }

    /// Re-derive the logical position from the capsule.
    pub fn sync_from_capsule(&mut self) {
        let feet = self.capsule.feet();
        self.position = Vec2::new(feet.x, feet.y);
    }

    /// Begin walking to `target_x`, replacing any walk already in flight.
    pub fn start_auto_walk(&mut self, target_x: f32, on_arrive: ArrivalAction) {
        self.auto_walk = Some(AutoWalk::new(target_x, on_arrive));
    }

    pub fn auto_walk(&self) -> Option<&AutoWalk> {
        self.auto_walk.as_ref()
    }

    pub fn is_auto_walking(&self) -> bool {
        self.auto_walk.is_some()
    }

    pub(crate) fn finish_auto_walk(&mut self) -> Option<AutoWalk> {
        self.auto_walk.take()
    }

    /// Position, velocity and collider are all finite.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite() && self.capsule.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_character_capsule_layout() {
        let ch = Character::new(Vec2::new(4.0, 1.0), &PhysicsConfig::default());
        assert!((ch.capsule.start.y - 1.35).abs() < 1e-6);
        assert!((ch.capsule.end.y - 2.35).abs() < 1e-6);
        assert_eq!(ch.capsule.start.x, 4.0);
        assert!(!ch.is_grounded());
    }

    #[test]
    fn test_grace_counter_saturates() {
        let mut ch = Character::new(Vec2::ZERO, &PhysicsConfig::default());
        ch.touch_ground(3);
        assert!(ch.is_grounded());
        for _ in 0..5 {
            ch.lose_ground();
        }
        assert_eq!(ch.grounded_frames(), 0);
        assert!(!ch.is_grounded());
    }

    #[test]
    fn test_place_at_stops_and_moves_capsule() {
        let mut ch = Character::new(Vec2::ZERO, &PhysicsConfig::default());
        ch.velocity = Vec2::new(5.0, -3.0);
        ch.place_at(Vec2::new(12.0, 2.0));
        assert_eq!(ch.velocity, Vec2::ZERO);
        assert_eq!(ch.position, Vec2::new(12.0, 2.0));
        assert!((ch.capsule.feet() - Vec3::new(12.0, 2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_new_auto_walk_overwrites_previous() {
        let mut ch = Character::new(Vec2::ZERO, &PhysicsConfig::default());
        ch.start_auto_walk(5.0, ArrivalAction::OpenIsland(0));
        ch.start_auto_walk(-2.0, ArrivalAction::OpenIsland(1));
        let walk = ch.auto_walk().unwrap();
        assert_eq!(walk.target_x, -2.0);
        assert_eq!(walk.on_arrive, ArrivalAction::OpenIsland(1));
        ch.freeze();
        assert!(!ch.is_auto_walking());
    }
}
