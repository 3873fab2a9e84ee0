//! Character Movement Controller
//!
//! Drives the [`Character`] in two stages each frame:
//!
//! 1. [`CharacterController::drive`] turns intent (or an active auto-walk)
//!    into horizontal velocity. Per-frame, not scaled by delta time.
//! 2. [`CharacterController::step`] integrates gravity and resolves the
//!    capsule against the [`CollisionWorld`] in fixed substeps.
//!
//! # Physics Model
//!
//! - Gravity: 50 units/s^2, vertical speed clamped to [-50, 30]
//! - Horizontal: accelerate 0.5 per frame (faster at speed on the ground),
//!   friction 0.95 grounded / 0.98 airborne, clamped to ±18
//! - Ground: contact normals within 50° of up; grounded survives 3 substeps
//!   without contact
//! - Three ground checks per substep: capsule sweep, snap ray, follow ray
//! - The snap ray pulls a falling capsule down onto ground up to 0.35 below
//!   its feet
//!
//! # Usage
//!
//! ```rust,ignore
//! use island_portfolio_engine::player::{Character, CharacterController};
//! use island_portfolio_engine::config::SimConfig;
//!
//! let config = SimConfig::default();
//! let controller = CharacterController::from_config(&config);
//! let mut character = Character::new(spawn, &config.physics);
//!
//! // Each frame:
//! let arrived = controller.drive(&mut character, intent);
//! controller.step(&mut character, &world, delta_time);
//! ```

use glam::{Vec2, Vec3};
use log::debug;

use super::auto_walk::{ArrivalAction, AutoWalkStep};
use super::character::Character;
use crate::config::{AutoWalkConfig, CharacterConfig, PhysicsConfig, SimConfig};
use crate::input::MovementIntent;
use crate::physics::CollisionWorld;

/// Ceiling contacts must face at least this far downward.
const CEILING_NORMAL_Y: f32 = -0.5;

/// Snap ray starts this far above the feet so a surface level with them still hits.
const SNAP_RAY_LIFT: f32 = 0.05;

/// Smallest follow-ray correction worth applying.
const FOLLOW_EPSILON: f32 = 1e-4;

/// Movement and collision rules for the player character.
#[derive(Debug, Clone)]
pub struct CharacterController {
    character: CharacterConfig,
    physics: PhysicsConfig,
    auto_walk: AutoWalkConfig,
    max_slope_cos: f32,
}

impl Default for CharacterController {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}

impl CharacterController {
    pub fn new(character: &CharacterConfig, physics: &PhysicsConfig, auto_walk: &AutoWalkConfig) -> Self {
        Self {
            character: character.clone(),
            physics: physics.clone(),
            auto_walk: auto_walk.clone(),
            max_slope_cos: physics.max_slope_cos(),
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(&config.character, &config.physics, &config.interaction.auto_walk)
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    // =========================================================================
    // Per-frame intent
    // =========================================================================

    /// Apply one frame of intent or auto-walk, then ease the pose.
    ///
    /// Returns the arrival action when an auto-walk reaches its target this
    /// frame; the caller decides when to run it.
    pub fn drive(&self, ch: &mut Character, intent: MovementIntent) -> Option<ArrivalAction> {
        let mut arrived = None;

        if let Some(walk) = ch.auto_walk().copied() {
            match walk.step(ch.position.x, &self.auto_walk) {
                AutoWalkStep::Moving(vx) => ch.velocity.x = vx,
                AutoWalkStep::Arrived {
                    target_x,
                    on_arrive,
                } => {
                    ch.snap_x(target_x);
                    ch.velocity.x = 0.0;
                    ch.finish_auto_walk();
                    debug!("auto-walk arrived at x={target_x:.2}");
                    arrived = Some(on_arrive);
                }
            }
        } else {
            self.apply_intent(ch, intent);
        }

        ch.pose.update_tilt(
            ch.velocity.x,
            self.character.max_speed,
            self.character.tilt_amount,
            self.character.tilt_smoothing,
        );
        arrived
    }

    /// Input-driven horizontal acceleration, friction and jump.
    pub fn apply_intent(&self, ch: &mut Character, intent: MovementIntent) {
        let cfg = &self.character;
        let grounded = ch.is_grounded();
        let vx = ch.velocity.x;

        let accel_multiplier = if grounded {
            1.0 + vx.abs() / cfg.max_speed * 0.5
        } else {
            cfg.air_control
        };

        let mut vx = match intent.direction.signum() {
            0 => vx * if grounded { cfg.friction } else { cfg.air_friction },
            dir => {
                let dir = dir as f32;
                // Reversing bleeds off speed before accelerating the other way
                let vx = if vx * dir < 0.0 { vx * cfg.turn_speed } else { vx };
                vx + dir * cfg.move_speed * accel_multiplier
            }
        };
        vx = vx.clamp(-cfg.max_speed, cfg.max_speed);
        ch.velocity.x = vx;
        ch.pose.face(intent.direction);

        if intent.jump && grounded {
            ch.velocity.y = cfg.jump_force;
            ch.has_ground_normal = false;
        }
    }

    // =========================================================================
    // Physics tick
    // =========================================================================

    /// Advance physics by `dt` seconds (clamped to `max_delta`).
    pub fn step(&self, ch: &mut Character, world: &CollisionWorld, dt: f32) {
        let substeps = self.physics.substeps.max(1);
        let step = dt.clamp(0.0, self.physics.max_delta) / substeps as f32;
        for _ in 0..substeps {
            self.substep(ch, world, step);
        }
        ch.sync_from_capsule();
    }

    fn substep(&self, ch: &mut Character, world: &CollisionWorld, step: f32) {
        let phys = &self.physics;

        ch.velocity.y -= self.character.gravity * step;
        ch.capsule.translate((ch.velocity * step).extend(0.0));

        // 1. Capsule sweep
        match world.sweep_capsule(&ch.capsule) {
            Some(hit) => {
                ch.capsule.translate(hit.normal * hit.depth);
                if hit.normal.y >= self.max_slope_cos {
                    ch.touch_ground(phys.grace_frames);
                    ch.set_ground_normal(hit.normal);
                    let v = ch.velocity.extend(0.0);
                    let v = v - hit.normal * v.dot(hit.normal);
                    ch.velocity = Vec2::new(v.x, v.y.max(0.0));
                } else if ch.velocity.y > 0.0 && hit.normal.y < CEILING_NORMAL_Y {
                    ch.velocity.y = 0.0;
                    ch.leave_ground();
                } else {
                    ch.lose_ground();
                }
            }
            None => ch.lose_ground(),
        }

        if ch.is_grounded() {
            ch.velocity.y -= phys.stick_force * step;
        }

        // 2. Snap ray from just above the feet, only while not rising
        if !ch.is_grounded() && ch.velocity.y <= 0.0 {
            let origin = ch.capsule.feet() + Vec3::Y * SNAP_RAY_LIFT;
            if let Some(hit) =
                world.cast_ray_within(origin, Vec3::NEG_Y, phys.snap_distance + SNAP_RAY_LIFT)
            {
                let bottom = ch.capsule.feet().y;
                ch.capsule.translate(Vec3::Y * (hit.position.y - bottom));
                ch.touch_ground(phys.grace_frames);
                ch.velocity.y = 0.0;
                ch.set_ground_normal(hit.normal);
            }
        }

        // 3. Follow ray from above the lower segment point
        let origin = ch.capsule.start + Vec3::Y * phys.follow_origin_lift;
        if let Some(hit) = world.cast_ray_within(origin, Vec3::NEG_Y, phys.follow_distance) {
            let current_bottom = ch.capsule.feet().y;
            let desired_bottom = hit.position.y + phys.surface_offset;
            let delta = desired_bottom - current_bottom;
            if delta.abs() > FOLLOW_EPSILON {
                ch.capsule.translate(Vec3::Y * delta);
            }
            ch.touch_ground(phys.grace_frames);
            ch.set_ground_normal(hit.normal);
        }

        if !ch.is_grounded() {
            ch.has_ground_normal = false;
        }

        // Glue vertical motion to the slope underfoot
        if ch.is_grounded() && ch.has_ground_normal {
            let n = ch.ground_normal;
            if n.y.abs() > phys.min_slope_normal_y {
                ch.velocity.y = ch.velocity.x * (-n.x / n.y);
            }
        }

        ch.velocity.y = ch
            .velocity
            .y
            .clamp(phys.min_vertical_velocity, phys.max_vertical_velocity);
    }
}
