//! Keyboard Input Module
//!
//! Held-key tracking for the handful of keys the portfolio reacts to.
//! Key codes are independent of the windowing system; a winit host converts
//! with `KeyCode::from(winit_key)`.

use std::collections::HashSet;

/// Keys the simulation reacts to. Everything else maps to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Space,
    Enter,
    Escape,
    /// Catch-all for unhandled keys
    Unknown,
}

impl KeyCode {
    /// Keys that feed the movement intent while held.
    pub fn is_movement(self) -> bool {
        matches!(
            self,
            KeyCode::ArrowLeft | KeyCode::ArrowRight | KeyCode::ArrowUp | KeyCode::Space
        )
    }
}

impl From<winit::keyboard::KeyCode> for KeyCode {
    fn from(key: winit::keyboard::KeyCode) -> Self {
        use winit::keyboard::KeyCode as Winit;
        match key {
            Winit::ArrowLeft => KeyCode::ArrowLeft,
            Winit::ArrowRight => KeyCode::ArrowRight,
            Winit::ArrowUp => KeyCode::ArrowUp,
            Winit::ArrowDown => KeyCode::ArrowDown,
            Winit::Space => KeyCode::Space,
            Winit::Enter | Winit::NumpadEnter => KeyCode::Enter,
            Winit::Escape => KeyCode::Escape,
            _ => KeyCode::Unknown,
        }
    }
}

/// Set of keys currently held down.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<KeyCode>,
}

impl KeyboardState {
    /// Create a new keyboard state with all keys released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as held. Returns `true` if it was not held before.
    pub fn press(&mut self, key: KeyCode) -> bool {
        self.held.insert(key)
    }

    /// Mark `key` as released. Returns `true` if it was held.
    pub fn release(&mut self, key: KeyCode) -> bool {
        self.held.remove(&key)
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Release every key.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn any_held(&self) -> bool {
        !self.held.is_empty()
    }

    /// Horizontal axis (-1, 0 or 1). Right wins when both arrows are held.
    pub fn horizontal_axis(&self) -> i32 {
        if self.is_held(KeyCode::ArrowRight) {
            1
        } else if self.is_held(KeyCode::ArrowLeft) {
            -1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_default() {
        let keys = KeyboardState::new();
        assert!(!keys.any_held());
        assert_eq!(keys.horizontal_axis(), 0);
    }

    #[test]
    fn test_press_and_release() {
        let mut keys = KeyboardState::new();
        assert!(keys.press(KeyCode::ArrowLeft));
        assert!(!keys.press(KeyCode::ArrowLeft));
        assert_eq!(keys.horizontal_axis(), -1);
        assert!(keys.release(KeyCode::ArrowLeft));
        assert!(!keys.release(KeyCode::ArrowLeft));
        assert!(!keys.any_held());
    }

    #[test]
    fn test_right_wins_over_left() {
        let mut keys = KeyboardState::new();
        keys.press(KeyCode::ArrowLeft);
        keys.press(KeyCode::ArrowRight);
        assert_eq!(keys.horizontal_axis(), 1);
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut keys = KeyboardState::new();
        keys.press(KeyCode::Space);
        keys.press(KeyCode::ArrowUp);
        keys.clear();
        assert!(!keys.is_held(KeyCode::Space));
        assert!(!keys.any_held());
    }

    #[test]
    fn test_winit_conversion() {
        assert_eq!(KeyCode::from(winit::keyboard::KeyCode::ArrowUp), KeyCode::ArrowUp);
        assert_eq!(KeyCode::from(winit::keyboard::KeyCode::NumpadEnter), KeyCode::Enter);
        assert_eq!(KeyCode::from(winit::keyboard::KeyCode::KeyW), KeyCode::Unknown);
    }

    #[test]
    fn test_movement_keys() {
        assert!(KeyCode::Space.is_movement());
        assert!(!KeyCode::Escape.is_movement());
        assert!(!KeyCode::Enter.is_movement());
    }
}
