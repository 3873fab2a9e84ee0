//! Input Module
//!
//! Platform-agnostic keyboard handling. The host forwards key events
//! (converting winit codes with `KeyCode::from`) and the session decides,
//! by mode precedence, whether they become movement or mode transitions.
//!
//! # Example
//!
//! ```rust,ignore
//! use island_portfolio_engine::input::{InputGate, IntentMapper, KeyCode, KeyboardState};
//!
//! let mut keyboard = KeyboardState::new();
//! keyboard.press(KeyCode::ArrowRight);
//!
//! let intent = IntentMapper::map(&keyboard, InputGate::default());
//! assert_eq!(intent.direction, 1);
//! ```

pub mod intent;
pub mod keyboard;

pub use intent::{InputGate, IntentMapper, MovementIntent};
pub use keyboard::{KeyCode, KeyboardState};
