//! Player Module
//!
//! The player avatar and the systems that move it.
//!
//! # Components
//!
//! - [`Character`] - position, velocity, grounded grace counter and capsule
//! - [`CharacterController`] - per-frame intent plus the substepped physics tick
//!   - Sweep, snap-ray and follow-ray ground checks
//!   - Slope gluing and vertical speed clamping
//! - [`AutoWalk`] - scripted walk to a target X ending in an [`ArrivalAction`]
//! - [`CharacterPose`] - facing and lean, visual only

pub mod auto_walk;
pub mod character;
pub mod movement_controller;
pub mod pose;

pub use auto_walk::{ArrivalAction, AutoWalk, AutoWalkStep, approach_speed};
pub use character::Character;
pub use movement_controller::CharacterController;
pub use pose::{CharacterPose, target_tilt};
