//! Simulation Configuration
//!
//! Centralized tuning values for the character, physics, camera, timed
//! transitions and interaction ranges. `Default` returns the shipped tuning;
//! a JSON file may override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Horizontal movement and jump tuning for the character.
///
/// Acceleration, friction and turn values are applied once per frame, not
/// scaled by delta time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    /// Spawn X used when the level has no teleport spots
    pub start_x: f32,
    /// Horizontal velocity added per frame while a direction is held
    pub move_speed: f32,
    /// Horizontal speed clamp (units/s)
    pub max_speed: f32,
    /// Per-frame velocity multiplier on the ground with no input
    pub friction: f32,
    /// Per-frame velocity multiplier in the air with no input
    pub air_friction: f32,
    /// Acceleration multiplier while airborne
    pub air_control: f32,
    /// Velocity multiplier applied when reversing direction
    pub turn_speed: f32,
    /// Vertical velocity set by a jump
    pub jump_force: f32,
    /// Downward acceleration (units/s^2)
    pub gravity: f32,
    /// Maximum visual lean at full speed (radians)
    pub tilt_amount: f32,
    /// Per-frame blend factor toward the target lean
    pub tilt_smoothing: f32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            start_x: 0.0,
            move_speed: 0.5,
            max_speed: 18.0,
            friction: 0.95,
            air_friction: 0.98,
            air_control: 0.5,
            turn_speed: 0.65,
            jump_force: 20.0,
            gravity: 50.0,
            tilt_amount: 0.3,
            tilt_smoothing: 0.1,
        }
    }
}

/// Collision resolution constants for the substepped physics tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub substeps: u32,
    /// Upper bound on the elapsed time of one tick (seconds)
    pub max_delta: f32,
    /// Steepest contact still classified as ground
    pub max_slope_degrees: f32,
    /// Substeps that grounded survives without contact
    pub grace_frames: u32,
    /// Extra downward velocity per second while grounded
    pub stick_force: f32,
    /// Snap-ray reach below the capsule's lower point
    pub snap_distance: f32,
    /// Follow-ray reach from its lifted origin
    pub follow_distance: f32,
    /// How far above the capsule's lower point the follow ray starts
    pub follow_origin_lift: f32,
    /// Clearance kept between the capsule bottom and a followed surface
    pub surface_offset: f32,
    /// Ground normals flatter than this (|n.y|) skip slope gluing
    pub min_slope_normal_y: f32,
    pub min_vertical_velocity: f32,
    pub max_vertical_velocity: f32,
    pub capsule_radius: f32,
    /// Distance between the capsule's segment endpoints
    pub capsule_segment_height: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            substeps: 3,
            max_delta: 0.05,
            max_slope_degrees: 50.0,
            grace_frames: 3,
            stick_force: 8.0,
            snap_distance: 0.35,
            follow_distance: 0.8,
            follow_origin_lift: 0.5,
            surface_offset: 0.02,
            min_slope_normal_y: 0.2,
            min_vertical_velocity: -50.0,
            max_vertical_velocity: 30.0,
            capsule_radius: 0.35,
            capsule_segment_height: 1.0,
        }
    }
}

impl PhysicsConfig {
    /// Cosine of the slope limit; contact normals with `y` at or above this are ground.
    pub fn max_slope_cos(&self) -> f32 {
        self.max_slope_degrees.to_radians().cos()
    }
}

/// Fixed camera pose used while the character is inside the room.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomCameraPose {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Euler rotation in degrees
    pub rot_x: f32,
    pub rot_y: f32,
    pub rot_z: f32,
}

impl Default for RoomCameraPose {
    fn default() -> Self {
        Self {
            x: -50.0,
            y: 3.5,
            z: 25.0,
            rot_x: 0.0,
            rot_y: 0.0,
            rot_z: 0.0,
        }
    }
}

/// Camera framing, smoothing and field-of-view tuning.
///
/// Smoothing values are per-frame blend factors in (0, 1].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial projection FOV (degrees)
    pub fov: f32,
    pub fov_min: f32,
    pub fov_max: f32,
    /// FOV blend while widening
    pub fov_smooth_in: f32,
    /// FOV blend while narrowing
    pub fov_smooth_out: f32,
    /// Blend of the speed signal driving the FOV
    pub speed_smoothing: f32,
    pub fov_room_transition: f32,
    pub fov_island_transition: f32,
    /// FOV changes smaller than this leave the projection untouched
    pub fov_epsilon: f32,
    pub start_y: f32,
    pub start_z: f32,
    pub follow_smooth: f32,
    pub island_y: f32,
    pub island_z: f32,
    pub island_smooth: f32,
    pub room: RoomCameraPose,
    pub room_transition_speed: f32,
    pub near: f32,
    pub far: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 30.0,
            fov_min: 20.0,
            fov_max: 40.0,
            fov_smooth_in: 0.01,
            fov_smooth_out: 0.3,
            speed_smoothing: 0.01,
            fov_room_transition: 0.08,
            fov_island_transition: 0.05,
            fov_epsilon: 0.01,
            start_y: 3.0,
            start_z: 25.0,
            follow_smooth: 0.03,
            island_y: -3.0,
            island_z: 20.0,
            island_smooth: 0.05,
            room: RoomCameraPose::default(),
            room_transition_speed: 0.05,
            near: 0.1,
            far: 1000.0,
            viewport_width: 1920.0,
            viewport_height: 1080.0,
        }
    }
}

/// Delays of the timed transitions (seconds).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Auto-walk arrival to completion action
    pub arrival_delay: f32,
    /// Island lock to project-select panel reveal
    pub panel_reveal_delay: f32,
    /// Island close to camera lock release
    pub lock_release_delay: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            arrival_delay: 0.2,
            panel_reveal_delay: 0.5,
            lock_release_delay: 0.4,
        }
    }
}

/// Scripted approach used by auto-walk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoWalkConfig {
    /// Distance at which the character snaps onto the target
    pub arrive_epsilon: f32,
    /// Speed per unit of remaining distance
    pub gain: f32,
    pub min_speed: f32,
    pub max_speed: f32,
}

impl Default for AutoWalkConfig {
    fn default() -> Self {
        Self {
            arrive_epsilon: 0.05,
            gain: 5.0,
            min_speed: 1.5,
            max_speed: 8.0,
        }
    }
}

/// Interaction ranges.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Padding added around each island zone for the interact test
    pub zone_padding: f32,
    pub trophy_radius: f32,
    pub auto_walk: AutoWalkConfig,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            zone_padding: 1.0,
            trophy_radius: 2.0,
            auto_walk: AutoWalkConfig::default(),
        }
    }
}

/// Room material fade.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomFadeConfig {
    /// Per-frame blend toward the target opacity
    pub fade_rate: f32,
    /// At or above this opacity materials render opaque
    pub opaque_threshold: f32,
    /// At or above this opacity materials write depth
    pub depth_write_threshold: f32,
}

impl Default for RoomFadeConfig {
    fn default() -> Self {
        Self {
            fade_rate: 0.12,
            opaque_threshold: 0.999,
            depth_write_threshold: 0.15,
        }
    }
}

/// Blob shadow under the character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    pub max_distance: f32,
    pub max_opacity: f32,
    /// Scale when touching the ground
    pub near_scale: f32,
    /// Scale at `max_distance`
    pub far_scale: f32,
    pub smoothing: f32,
    /// Height above the ground the shadow is drawn at
    pub lift: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            max_distance: 3.0,
            max_opacity: 0.45,
            near_scale: 1.15,
            far_scale: 0.65,
            smoothing: 0.2,
            lift: 0.02,
        }
    }
}

/// Central configuration for a portfolio session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub character: CharacterConfig,
    pub physics: PhysicsConfig,
    pub camera: CameraConfig,
    pub timing: TimingConfig,
    pub interaction: InteractionConfig,
    pub room: RoomFadeConfig,
    pub shadow: ShadowConfig,
}

impl SimConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SimConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break the simulation outright.
    ///
    /// NaN bounds fail the range checks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: &str| {
            Err(ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            })
        };

        if !(self.character.max_speed > 0.0) {
            return invalid("character.max_speed", "must be positive");
        }
        if !(self.character.gravity > 0.0) {
            return invalid("character.gravity", "must be positive");
        }
        if self.physics.substeps == 0 {
            return invalid("physics.substeps", "must be at least 1");
        }
        if !(self.physics.max_delta > 0.0) {
            return invalid("physics.max_delta", "must be positive");
        }
        if !(self.physics.capsule_radius > 0.0) {
            return invalid("physics.capsule_radius", "must be positive");
        }
        if !(self.physics.min_vertical_velocity <= self.physics.max_vertical_velocity) {
            return invalid("physics.min_vertical_velocity", "exceeds max_vertical_velocity");
        }
        if !(self.camera.fov_min <= self.camera.fov_max) {
            return invalid("camera.fov_min", "exceeds fov_max");
        }
        if !(self.camera.viewport_width > 0.0 && self.camera.viewport_height > 0.0) {
            return invalid("camera.viewport_width", "viewport must have positive size");
        }
        if !(self.interaction.auto_walk.min_speed <= self.interaction.auto_walk.max_speed) {
            return invalid("interaction.auto_walk.min_speed", "exceeds max_speed");
        }
        Ok(())
    }
}
