//! Room Fade
//!
//! Opacity of the room scene. Entering or leaving the room zone sets a new
//! target once; every frame the opacity eases toward it. Material flags
//! follow the opacity with thresholds so they only flip when a threshold is
//! crossed.

use log::debug;

use crate::config::RoomFadeConfig;

#[derive(Debug, Clone)]
pub struct RoomFade {
    config: RoomFadeConfig,
    inside: bool,
    /// Opacity applied this frame
    pub current: f32,
    /// Opacity being eased toward
    pub target: f32,
    /// Material needs blending
    pub transparent: bool,
    /// Material writes depth
    pub depth_write: bool,
    material_updates: u64,
    target_changes: u64,
}

impl RoomFade {
    /// Start outside the room with the room fully hidden.
    pub fn new(config: &RoomFadeConfig) -> Self {
        let mut fade = Self {
            config: config.clone(),
            inside: false,
            current: 0.0,
            target: 0.0,
            transparent: true,
            depth_write: false,
            material_updates: 0,
            target_changes: 0,
        };
        fade.refresh_flags();
        fade
    }

    pub fn is_inside(&self) -> bool {
        self.inside
    }

    /// Report whether the character is inside the room. Only a change of
    /// state moves the target.
    pub fn set_inside(&mut self, inside: bool) -> bool {
        if inside == self.inside {
            return false;
        }
        self.inside = inside;
        self.target = if inside { 1.0 } else { 0.0 };
        self.target_changes += 1;
        debug!("room fade target -> {}", self.target);
        true
    }

    /// Ease one frame toward the target.
    pub fn update(&mut self) {
        self.current += (self.target - self.current) * self.config.fade_rate;
        self.current = self.current.clamp(0.0, 1.0);
        if self.refresh_flags() {
            self.material_updates += 1;
        }
    }

    fn refresh_flags(&mut self) -> bool {
        let transparent = self.current < self.config.opaque_threshold;
        let depth_write = self.current >= self.config.depth_write_threshold;
        let changed = transparent != self.transparent || depth_write != self.depth_write;
        self.transparent = transparent;
        self.depth_write = depth_write;
        changed
    }

    /// How many times the material flags changed.
    pub fn material_updates(&self) -> u64 {
        self.material_updates
    }

    /// How many edge transitions moved the target.
    pub fn target_changes(&self) -> u64 {
        self.target_changes
    }
}
