//! Interaction Modes
//!
//! Exactly one of free roam, island lock or viewer is active at a time; the
//! enum makes a simultaneous island lock and viewer unrepresentable. Whether
//! the character is inside the room is tracked separately by the session.

use std::fmt;

/// Project-select panel state while an island is locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    /// Camera is settling; the panel appears after the reveal delay
    Pending,
    /// Panel is showing and owns the keyboard
    Visible,
    /// Panel closed; the lock releases after the release delay
    Releasing,
}

/// Top-level interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    FreeRoam,
    IslandLocked {
        island: usize,
        panel: PanelState,
    },
    /// The viewer owns the screen. `exiting` is set once an exit was requested
    /// and cleared when the island lock is restored.
    Viewer { island: usize, exiting: bool },
}

impl Mode {
    /// Island the mode is attached to, if any.
    pub fn current_island(&self) -> Option<usize> {
        match *self {
            Mode::FreeRoam => None,
            Mode::IslandLocked { island, .. } | Mode::Viewer { island, .. } => Some(island),
        }
    }

    pub fn is_free_roam(&self) -> bool {
        matches!(self, Mode::FreeRoam)
    }

    pub fn is_island_locked(&self) -> bool {
        matches!(self, Mode::IslandLocked { .. })
    }

    pub fn is_viewer(&self) -> bool {
        matches!(self, Mode::Viewer { .. })
    }

    /// True while the project-select panel is on screen.
    pub fn project_select_visible(&self) -> bool {
        matches!(
            self,
            Mode::IslandLocked {
                panel: PanelState::Visible,
                ..
            }
        )
    }

    /// True while the camera is held on the island.
    pub fn camera_locked(&self) -> bool {
        matches!(
            self,
            Mode::IslandLocked {
                panel: PanelState::Pending | PanelState::Visible,
                ..
            } | Mode::Viewer { .. }
        )
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::FreeRoam => write!(f, "free-roam"),
            Mode::IslandLocked { island, panel } => write!(f, "island-locked({island}, {panel:?})"),
            Mode::Viewer { island, exiting } => {
                write!(f, "viewer({island}{})", if *exiting { ", exiting" } else { "" })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_queries() {
        let locked = Mode::IslandLocked {
            island: 2,
            panel: PanelState::Visible,
        };
        assert_eq!(locked.current_island(), Some(2));
        assert!(locked.project_select_visible());
        assert!(locked.camera_locked());
        assert!(!locked.is_viewer());

        let releasing = Mode::IslandLocked {
            island: 2,
            panel: PanelState::Releasing,
        };
        assert!(!releasing.camera_locked());
        assert!(!releasing.project_select_visible());
        assert_eq!(releasing.current_island(), Some(2));

        assert_eq!(Mode::default().current_island(), None);
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(Mode::FreeRoam.to_string(), "free-roam");
        assert_eq!(
            Mode::Viewer {
                island: 1,
                exiting: true
            }
            .to_string(),
            "viewer(1, exiting)"
        );
    }
}
