//! Island Portfolio Engine Library
//!
//! The simulation core of a side-scrolling 3D portfolio: a character walks a
//! vertical play plane across a static collision mesh, locks onto project
//! islands, opens a project viewer and browses trophy collections in a room.
//! Rendering, audio and page UI live with the host; this crate owns the state
//! and the rules.
//!
//! # Modules
//!
//! - [`config`] - Tunables for physics, camera, timing and interaction
//! - [`error`] - Error types for config, level loading and host notifications
//! - [`physics`] - Collision primitives, the capsule and the BVH collision world
//! - [`player`] - Character state, the physics controller, auto-walk and pose
//! - [`input`] - Keyboard state and movement intent
//! - [`camera`] - Camera rig with per-mode framing and speed-driven FOV
//! - [`world`] - Level records, islands, trophies and the project catalog
//! - [`scene`] - Mode machine, proximity, room fade, shadow and the session
//!
//! # Example
//!
//! ```ignore
//! use island_portfolio_engine::config::SimConfig;
//! use island_portfolio_engine::input::KeyCode;
//! use island_portfolio_engine::scene::{CollectionPopupState, FadeViewer, LogBridge, PortfolioSession};
//! use island_portfolio_engine::world::LevelData;
//!
//! let level = LevelData::load_or_default("assets/level.json").assemble();
//! let viewer = FadeViewer::new(level.islands.len());
//! let popup = CollectionPopupState::new(level.collections.clone());
//! let mut session = PortfolioSession::new(SimConfig::default(), level, viewer, popup, LogBridge);
//!
//! // Per window event
//! session.key_down(KeyCode::ArrowRight);
//!
//! // Per display frame
//! session.frame(1.0 / 60.0);
//! let camera = session.camera();
//! let view_proj = camera.view_projection();
//! ```

pub mod camera;
pub mod config;
pub mod error;
pub mod input;
pub mod physics;
pub mod player;
pub mod scene;
pub mod world;

// Re-export the types a host touches every frame
pub use camera::{CameraRig, Framing};
pub use config::SimConfig;
pub use error::{BridgeError, ConfigError, LevelError};
pub use input::{KeyCode, KeyboardState};
pub use player::{Character, CharacterController};
pub use scene::{Affordance, Mode, PortfolioSession};
pub use world::{Level, LevelData};
