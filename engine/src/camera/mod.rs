//! Camera Module
//!
//! Side-on camera rig: per-mode framing, smoothing, speed-driven field of
//! view and world-to-screen projection for UI anchors.
//! This module is window-system agnostic - it only deals with camera state and math.

pub mod controller;

pub use controller::{CameraInputs, CameraRig, Framing, ndc_to_screen};
