//! Movement Intent
//!
//! Turns held keys into the per-frame request the character controller
//! consumes. While any overlay owns the keyboard the intent is neutral.

use super::keyboard::{KeyCode, KeyboardState};

/// What the player asks the character to do this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementIntent {
    /// -1 left, 0 none, 1 right
    pub direction: i32,
    pub jump: bool,
}

impl MovementIntent {
    pub const NEUTRAL: MovementIntent = MovementIntent {
        direction: 0,
        jump: false,
    };

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }
}

/// Overlays that suppress movement input when active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputGate {
    pub project_select: bool,
    pub collection_popup: bool,
    pub island_locked: bool,
}

impl InputGate {
    pub fn blocks_movement(&self) -> bool {
        self.project_select || self.collection_popup || self.island_locked
    }
}

/// Stateless key-to-intent mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentMapper;

impl IntentMapper {
    pub fn map(keys: &KeyboardState, gate: InputGate) -> MovementIntent {
        if gate.blocks_movement() {
            return MovementIntent::NEUTRAL;
        }
        MovementIntent {
            direction: keys.horizontal_axis(),
            jump: keys.is_held(KeyCode::Space),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_held_keys() {
        let mut keys = KeyboardState::new();
        keys.press(KeyCode::ArrowRight);
        keys.press(KeyCode::Space);
        let intent = IntentMapper::map(&keys, InputGate::default());
        assert_eq!(intent, MovementIntent { direction: 1, jump: true });
    }

    #[test]
    fn test_any_overlay_neutralizes_intent() {
        let mut keys = KeyboardState::new();
        keys.press(KeyCode::ArrowLeft);
        keys.press(KeyCode::Space);
        for gate in [
            InputGate { project_select: true, ..Default::default() },
            InputGate { collection_popup: true, ..Default::default() },
            InputGate { island_locked: true, ..Default::default() },
        ] {
            assert!(IntentMapper::map(&keys, gate).is_neutral());
        }
    }
}
