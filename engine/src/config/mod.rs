//! Config Module
//!
//! Centralized configuration for character physics, camera framing and
//! interaction timing.

pub mod sim_config;

pub use sim_config::{
    AutoWalkConfig, CameraConfig, CharacterConfig, InteractionConfig, PhysicsConfig,
    RoomCameraPose, RoomFadeConfig, ShadowConfig, SimConfig, TimingConfig,
};
