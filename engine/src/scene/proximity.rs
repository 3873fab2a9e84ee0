//! Proximity Detection
//!
//! Finds the island and trophy nearest to the character and decides what the
//! on-screen interact button shows.
//!
//! Islands: inside a zone padded by `zone_padding` means interactable at
//! distance 0; otherwise the nearest zone by horizontal distance is reported
//! but cannot be entered. Trophies: straight-line distance on the play plane
//! under `trophy_radius`, only while in the room.

use glam::{Vec2, Vec3};

use crate::world::{Island, Trophy};

/// Nearest island this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IslandProximity {
    pub index: usize,
    /// 0 when inside the padded zone
    pub distance: f32,
    pub can_interact: bool,
}

/// Find the nearest island to `position`.
///
/// A zone containing the character always wins; among several containing
/// zones the last one checked is kept. Returns `None` when there are no islands.
pub fn nearest_island(islands: &[Island], position: Vec2, padding: f32) -> Option<IslandProximity> {
    let mut best: Option<IslandProximity> = None;
    for (index, island) in islands.iter().enumerate() {
        let inside = island.bounds.padded(padding).contains_xy(position.x, position.y);
        let distance = if inside {
            0.0
        } else {
            (position.x - island.center().x).abs()
        };
        let closer = match best {
            None => true,
            Some(_) if inside => true,
            Some(b) => distance < b.distance,
        };
        if closer {
            best = Some(IslandProximity {
                index,
                distance,
                can_interact: inside,
            });
        }
    }
    best
}

/// Index of the trophy within `radius` of `position`, closest first.
pub fn nearest_trophy(trophies: &[Trophy], position: Vec2, radius: f32) -> Option<usize> {
    trophies
        .iter()
        .enumerate()
        .map(|(i, t)| (i, Vec2::new(t.position.x, t.position.y).distance(position)))
        .filter(|(_, d)| d.is_finite())
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .filter(|(_, d)| *d < radius)
        .map(|(i, _)| i)
}

/// What the interact button currently means.
#[derive(Debug, Clone, PartialEq)]
pub enum Affordance {
    Hidden,
    Island {
        index: usize,
        label: String,
        /// World point the button is pinned to
        anchor: Vec3,
        /// Pixel position (origin top-left)
        screen: Vec2,
    },
    Trophy {
        index: usize,
        label: String,
        anchor: Vec3,
        screen: Vec2,
    },
}

impl Affordance {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Affordance::Hidden)
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Affordance::Hidden => None,
            Affordance::Island { label, .. } | Affordance::Trophy { label, .. } => Some(label),
        }
    }

    pub fn screen(&self) -> Option<Vec2> {
        match self {
            Affordance::Hidden => None,
            Affordance::Island { screen, .. } | Affordance::Trophy { screen, .. } => Some(*screen),
        }
    }
}

/// World anchor of a trophy's button: one unit above the trophy, on the play plane.
pub fn trophy_anchor(trophy: &Trophy) -> Vec3 {
    Vec3::new(trophy.position.x, trophy.position.y + 1.0, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::Aabb;
    use crate::world::{CollectionCategory, Project};

    fn island(center_x: f32) -> Island {
        Island {
            zone_name: format!("zone-{center_x}"),
            bounds: Aabb::new(
                Vec3::new(center_x - 2.0, 0.0, -1.0),
                Vec3::new(center_x + 2.0, 4.0, 1.0),
            ),
            project: Project::default(),
            spot: None,
        }
    }

    #[test]
    fn test_inside_padded_zone_is_interactable() {
        let islands = [island(10.0)];
        // padded bounds reach x = 7 on the left
        let hit = nearest_island(&islands, Vec2::new(7.0, 0.0), 1.0).unwrap();
        assert_eq!(hit.distance, 0.0);
        assert!(hit.can_interact);
    }

    #[test]
    fn test_outside_reports_nearest_by_x() {
        let islands = [island(0.0), island(20.0)];
        let hit = nearest_island(&islands, Vec2::new(14.0, 0.0), 1.0).unwrap();
        assert_eq!(hit.index, 1);
        assert_eq!(hit.distance, 6.0);
        assert!(!hit.can_interact);
    }

    #[test]
    fn test_containing_zone_beats_closer_center() {
        let mut wide = island(0.0);
        wide.bounds.max.x = 30.0;
        let islands = [island(12.0), wide];
        let hit = nearest_island(&islands, Vec2::new(25.0, 1.0), 1.0).unwrap();
        assert_eq!(hit.index, 1);
        assert!(hit.can_interact);
    }

    #[test]
    fn test_no_islands() {
        assert!(nearest_island(&[], Vec2::ZERO, 1.0).is_none());
    }

    #[test]
    fn test_trophy_radius() {
        let trophies = [
            Trophy {
                name: "Photography".into(),
                position: Vec3::new(-50.0, 1.0, 0.0),
                category: CollectionCategory::Photography,
            },
            Trophy {
                name: "SFX Edits".into(),
                position: Vec3::new(-46.0, 1.0, 0.0),
                category: CollectionCategory::SfxEdits,
            },
        ];
        assert_eq!(nearest_trophy(&trophies, Vec2::new(-49.0, 0.0), 2.0), Some(0));
        assert_eq!(nearest_trophy(&trophies, Vec2::new(-46.5, 1.0), 2.0), Some(1));
        assert_eq!(nearest_trophy(&trophies, Vec2::new(-40.0, 1.0), 2.0), None);
    }
}
