//! Camera Rig
//!
//! Side-on camera that frames the play plane. Each frame the session hands
//! over a [`CameraInputs`] describing the current mode; the rig picks a target
//! position, eases toward it with a mode-specific blend and adjusts the field
//! of view from the character's smoothed speed.
//!
//! ## Framing rules
//!
//! | Mode                 | Target                                   | Blend                   |
//! |----------------------|------------------------------------------|-------------------------|
//! | Island locked        | (anchor x, zone y + island_y, island_z)  | `island_smooth`         |
//! | In room              | fixed room pose                          | `room_transition_speed` |
//! | Free roam            | (char x, char y + start_y, start_z)      | `follow_smooth`         |
//!
//! The room blend wins whenever the character is inside the room, even while
//! locked. In the room the orientation comes from fixed Euler angles; everywhere
//! else the camera looks straight at the play plane.
//!
//! This is window-system agnostic; it only owns camera state and matrices.

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

use crate::config::{CameraConfig, CharacterConfig};

/// How the session wants the camera framed this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Framing {
    /// Follow the character
    Follow,
    /// Lock released but the unlock delay is still running: follow the
    /// character at island pace
    Releasing,
    /// Locked onto an island; `x` is the anchor X and `y` the zone center Y
    Locked { x: f32, y: f32 },
}

impl Framing {
    fn is_island(&self) -> bool {
        !matches!(self, Framing::Follow)
    }
}

/// Per-frame inputs to [`CameraRig::update`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraInputs {
    pub framing: Framing,
    pub in_room: bool,
    /// Character feet position
    pub character: Vec2,
    /// Character horizontal velocity
    pub velocity_x: f32,
}

/// Camera state for the side-on view.
#[derive(Debug, Clone)]
pub struct CameraRig {
    config: CameraConfig,
    max_speed: f32,
    /// World-space camera position
    pub position: Vec3,
    /// Last computed target
    pub target: Vec3,
    pub orientation: Quat,
    /// FOV currently applied to the projection (degrees)
    fov: f32,
    /// FOV the rig is easing (degrees)
    current_fov: f32,
    smoothed_speed: f32,
    aspect: f32,
    projection_updates: u64,
}

impl CameraRig {
    /// Create a rig framing `character` in free roam.
    pub fn new(config: &CameraConfig, character_config: &CharacterConfig, character: Vec2) -> Self {
        let position = Vec3::new(character.x, character.y + config.start_y, config.start_z);
        let aspect = if config.viewport_height > 0.0 {
            config.viewport_width / config.viewport_height
        } else {
            1.0
        };
        Self {
            config: config.clone(),
            max_speed: character_config.max_speed,
            position,
            target: position,
            orientation: look_at_plane(position),
            fov: config.fov,
            current_fov: config.fov_min,
            smoothed_speed: 0.0,
            aspect,
            projection_updates: 0,
        }
    }

    /// FOV applied to the projection matrix (degrees).
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// FOV being eased toward its target (degrees).
    pub fn current_fov(&self) -> f32 {
        self.current_fov
    }

    pub fn smoothed_speed(&self) -> f32 {
        self.smoothed_speed
    }

    /// Number of times the projection was rebuilt.
    pub fn projection_updates(&self) -> u64 {
        self.projection_updates
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Resize the viewport used for projection and screen mapping.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.config.viewport_width = width;
            self.config.viewport_height = height;
            self.aspect = width / height;
            self.projection_updates += 1;
        }
    }

    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.config.viewport_width, self.config.viewport_height)
    }

    /// Target position for the given inputs.
    pub fn target_for(&self, inputs: &CameraInputs) -> Vec3 {
        let cfg = &self.config;
        match inputs.framing {
            Framing::Locked { x, y } => Vec3::new(x, y + cfg.island_y, cfg.island_z),
            _ if inputs.in_room => Vec3::new(cfg.room.x, cfg.room.y, cfg.room.z),
            _ => Vec3::new(
                inputs.character.x,
                inputs.character.y + cfg.start_y,
                cfg.start_z,
            ),
        }
    }

    /// Position blend factor for the given inputs.
    pub fn smoothing_for(&self, inputs: &CameraInputs) -> f32 {
        if inputs.in_room {
            self.config.room_transition_speed
        } else if inputs.framing.is_island() {
            self.config.island_smooth
        } else {
            self.config.follow_smooth
        }
    }

    /// Advance one frame.
    pub fn update(&mut self, inputs: &CameraInputs) {
        self.target = self.target_for(inputs);
        let smooth = self.smoothing_for(inputs);
        self.position += (self.target - self.position) * smooth;

        self.orientation = if inputs.in_room {
            let room = &self.config.room;
            Quat::from_euler(
                EulerRot::XYZ,
                room.rot_x.to_radians(),
                room.rot_y.to_radians(),
                room.rot_z.to_radians(),
            )
        } else {
            look_at_plane(self.position)
        };

        self.update_fov(inputs);
        self.apply_fov();
    }

    fn update_fov(&mut self, inputs: &CameraInputs) {
        let cfg = &self.config;
        if inputs.framing.is_island() {
            self.current_fov += (cfg.fov_min - self.current_fov) * cfg.fov_island_transition;
            self.smoothed_speed = 0.0;
        } else if inputs.in_room {
            self.current_fov += (cfg.fov_min - self.current_fov) * cfg.fov_room_transition;
            self.smoothed_speed = 0.0;
        } else {
            let speed = inputs.velocity_x.abs();
            self.smoothed_speed += (speed - self.smoothed_speed) * cfg.speed_smoothing;
            let target = self.speed_fov(self.smoothed_speed);
            let blend = if target > self.current_fov {
                cfg.fov_smooth_in
            } else {
                cfg.fov_smooth_out
            };
            self.current_fov += (target - self.current_fov) * blend;
        }
    }

    /// Target FOV for a smoothed horizontal speed.
    pub fn speed_fov(&self, smoothed_speed: f32) -> f32 {
        let ratio = if self.max_speed > 0.0 {
            (smoothed_speed / self.max_speed).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.config.fov_min + (self.config.fov_max - self.config.fov_min) * ratio
    }

    /// Push the eased FOV into the projection if it moved far enough.
    fn apply_fov(&mut self) {
        if (self.fov - self.current_fov).abs() > self.config.fov_epsilon {
            self.fov = self.current_fov;
            self.projection_updates += 1;
        }
    }

    /// Jump straight to `position` facing the play plane with `fov` applied.
    pub fn snap_to(&mut self, position: Vec3, fov: f32) {
        self.position = position;
        self.target = position;
        self.orientation = look_at_plane(position);
        self.current_fov = fov;
        self.fov = fov;
        self.projection_updates += 1;
    }

    /// Island framing position for an anchor X and zone center Y.
    pub fn island_position(&self, x: f32, zone_y: f32) -> Vec3 {
        Vec3::new(x, zone_y + self.config.island_y, self.config.island_z)
    }

    pub fn fov_min(&self) -> f32 {
        self.config.fov_min
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov.to_radians(),
            self.aspect,
            self.config.near,
            self.config.far,
        )
    }

    /// Combined `projection * view`.
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Map a world point to viewport pixels (origin top-left).
    ///
    /// Returns `None` for points behind the camera.
    pub fn project_to_screen(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * world.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(ndc_to_screen(Vec2::new(ndc.x, ndc.y), self.viewport()))
    }
}

/// Orientation looking from `position` straight at `(x, y, 0)`.
fn look_at_plane(position: Vec3) -> Quat {
    let forward = Vec3::new(0.0, 0.0, -position.z).normalize_or_zero();
    if forward == Vec3::ZERO {
        Quat::IDENTITY
    } else {
        Quat::from_rotation_arc(Vec3::NEG_Z, forward)
    }
}

/// NDC (-1..1, y up) to pixel coordinates (y down).
pub fn ndc_to_screen(ndc: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(
        (ndc.x * 0.5 + 0.5) * viewport.x,
        (-ndc.y * 0.5 + 0.5) * viewport.y,
    )
}
