//! Auto-Walk
//!
//! Scripted horizontal movement toward a target X. While active it replaces
//! input-driven acceleration with a direct velocity assignment that slows as
//! the target gets close, then snaps exactly onto the target and hands back
//! the action to run once the character has settled.

use crate::config::AutoWalkConfig;
use crate::world::CollectionCategory;

/// What to do once an auto-walk arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalAction {
    /// Lock onto the island at this index
    OpenIsland(usize),
    /// Freeze and open the collection popup for a trophy
    OpenCollection(CollectionCategory),
}

/// An in-flight auto-walk. At most one exists; starting another replaces it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoWalk {
    pub target_x: f32,
    pub on_arrive: ArrivalAction,
}

/// Result of advancing an auto-walk by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutoWalkStep {
    /// Still travelling at this horizontal velocity
    Moving(f32),
    /// Reached the target; position must snap to `target_x`
    Arrived {
        target_x: f32,
        on_arrive: ArrivalAction,
    },
}

/// Approach speed for a remaining distance: proportional, clamped to
/// `[min_speed, max_speed]`.
pub fn approach_speed(distance: f32, config: &AutoWalkConfig) -> f32 {
    (distance.abs() * config.gain).clamp(config.min_speed, config.max_speed)
}

impl AutoWalk {
    pub fn new(target_x: f32, on_arrive: ArrivalAction) -> Self {
        Self {
            target_x,
            on_arrive,
        }
    }

    /// Advance one frame from horizontal position `x`.
    pub fn step(&self, x: f32, config: &AutoWalkConfig) -> AutoWalkStep {
        let dist = self.target_x - x;
        if dist.abs() > config.arrive_epsilon {
            AutoWalkStep::Moving(dist.signum() * approach_speed(dist, config))
        } else {
            AutoWalkStep::Arrived {
                target_x: self.target_x,
                on_arrive: self.on_arrive,
            }
        }
    }
}
