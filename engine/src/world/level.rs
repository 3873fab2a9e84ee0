//! Level data
//!
//! The raw records an asset loader hands over (collision triangles, named zone
//! boxes, named marker points, project and collection data) and their assembly
//! into the joined records the session works with.
//!
//! All positions are world space on the play plane: X runs along the walk
//! direction, Y is up, and the character stays at Z = 0.
//!
//! # Assembly rules
//!
//! - Zones are ordered by the first run of digits in their name.
//! - The zone whose name contains `room` becomes the room bounds.
//! - Remaining zones pair with `projects` by order; zones without a project are dropped.
//! - Teleport spots are ordered by their numeric index and pair with islands by order.
//! - Markers whose names name a collection become trophies.

use std::path::Path;

use glam::{Vec2, Vec3};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::catalog::{CollectionCategory, Collections, Project, default_collections};
use crate::error::LevelError;
use crate::physics::{Aabb, CollisionWorld, Triangle};

/// A named axis-aligned region.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamedBox {
    pub name: String,
    pub min: Vec3,
    pub max: Vec3,
}

/// A named marker point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamedPoint {
    pub name: String,
    pub position: Vec3,
}

/// Raw level records as supplied by the loader.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelData {
    pub collision: Vec<Triangle>,
    pub zones: Vec<NamedBox>,
    pub teleport_spots: Vec<NamedPoint>,
    pub trophy_markers: Vec<NamedPoint>,
    pub projects: Vec<Project>,
    pub collections: Collections,
}

/// Precise anchor for an island.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TeleportSpot {
    /// Numeric suffix parsed from the spot's name
    pub index: u32,
    pub x: f32,
    pub y: f32,
}

/// One enterable island: zone bounds, project metadata and optional spot,
/// joined once at load time.
#[derive(Clone, Debug, PartialEq)]
pub struct Island {
    pub zone_name: String,
    pub bounds: Aabb,
    pub project: Project,
    pub spot: Option<TeleportSpot>,
}

impl Island {
    /// Zone center on the play plane.
    pub fn center(&self) -> Vec2 {
        let c = self.bounds.center();
        Vec2::new(c.x, c.y)
    }

    /// Where the character stands and the camera locks: the spot if present,
    /// else the zone center.
    pub fn anchor(&self) -> Vec2 {
        match self.spot {
            Some(spot) => Vec2::new(spot.x, spot.y),
            None => self.center(),
        }
    }

    /// Where the interact affordance is drawn: half a unit below the spot,
    /// or below the zone's bottom edge.
    pub fn button_anchor(&self) -> Vec3 {
        match self.spot {
            Some(spot) => Vec3::new(spot.x, spot.y - 0.5, 0.0),
            None => Vec3::new(self.center().x, self.bounds.min.y - 0.5, 0.0),
        }
    }
}

/// A collectible trophy in the room.
#[derive(Clone, Debug, PartialEq)]
pub struct Trophy {
    pub name: String,
    pub position: Vec3,
    pub category: CollectionCategory,
}

/// Assembled level ready for a session.
#[derive(Debug, Clone, Default)]
pub struct Level {
    pub world: CollisionWorld,
    pub islands: Vec<Island>,
    pub trophies: Vec<Trophy>,
    pub room: Option<Aabb>,
    pub collections: Collections,
    /// Feet position of the first teleport spot, if any
    pub spawn: Option<Vec2>,
}

/// First run of ASCII digits in `name`, parsed as a number.
pub fn numeric_suffix(name: &str) -> Option<u32> {
    let start = name.find(|c: char| c.is_ascii_digit())?;
    let digits: String = name[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

impl LevelData {
    /// Read a level from a JSON file.
    ///
    /// Fails when the file cannot be read or parsed, or when it carries no
    /// usable collision geometry.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let data: LevelData = serde_json::from_str(&text).map_err(|source| LevelError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if !data
            .collision
            .iter()
            .any(|t| t.is_finite() && !t.is_degenerate())
        {
            return Err(LevelError::NoCollision);
        }
        Ok(data)
    }

    /// Check every record for non-finite coordinates and inverted boxes.
    ///
    /// [`LevelData::assemble`] skips such records on its own; this is for
    /// callers that want to report them.
    pub fn validate(&self) -> Result<(), LevelError> {
        let invalid = |name: &str, reason| LevelError::Invalid {
            name: name.to_string(),
            reason,
        };
        for (i, tri) in self.collision.iter().enumerate() {
            if !tri.is_finite() {
                return Err(invalid(&format!("collision[{i}]"), "non-finite vertex"));
            }
        }
        for zone in &self.zones {
            if !zone.min.is_finite() || !zone.max.is_finite() {
                return Err(invalid(&zone.name, "non-finite bounds"));
            }
            if !Aabb::new(zone.min, zone.max).is_valid() {
                return Err(invalid(&zone.name, "min exceeds max"));
            }
        }
        for point in self.teleport_spots.iter().chain(&self.trophy_markers) {
            if !point.position.is_finite() {
                return Err(invalid(&point.name, "non-finite position"));
            }
        }
        Ok(())
    }

    /// Load a level, falling back to [`LevelData::fallback`] on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(data) => data,
            Err(e) => {
                warn!("{e}; using built-in fallback level");
                Self::fallback()
            }
        }
    }

    /// Minimal built-in level: a flat ground strip and nothing to interact with.
    pub fn fallback() -> Self {
        Self {
            collision: ground_strip(-80.0, 80.0, 0.0),
            collections: default_collections(),
            ..Default::default()
        }
    }

    /// Assemble joined records and build the collision world.
    pub fn assemble(&self) -> Level {
        let world = CollisionWorld::build(&self.collision);

        let mut zones: Vec<&NamedBox> = self
            .zones
            .iter()
            .filter(|z| {
                let ok = Aabb::new(z.min, z.max).is_valid();
                if !ok {
                    warn!("skipping zone `{}`: invalid bounds", z.name);
                }
                ok
            })
            .collect();
        zones.sort_by_key(|z| numeric_suffix(&z.name).unwrap_or(u32::MAX));

        let mut spots = Vec::new();
        let mut trophies = Vec::new();
        for point in &self.teleport_spots {
            if !point.position.is_finite() {
                warn!("skipping teleport spot `{}`: non-finite position", point.name);
                continue;
            }
            if let Some(category) = CollectionCategory::from_marker_name(&point.name) {
                trophies.push(self.trophy(point, category));
            } else if let Some(index) = numeric_suffix(&point.name) {
                spots.push(TeleportSpot {
                    index,
                    x: point.position.x,
                    y: point.position.y,
                });
            } else {
                debug!("ignoring unnumbered spot `{}`", point.name);
            }
        }
        spots.sort_by_key(|s| s.index);

        for point in &self.trophy_markers {
            if !point.position.is_finite() {
                warn!("skipping trophy `{}`: non-finite position", point.name);
                continue;
            }
            match CollectionCategory::from_marker_name(&point.name) {
                Some(category) => trophies.push(self.trophy(point, category)),
                None => debug!("ignoring room mesh `{}`", point.name),
            }
        }

        let mut room = None;
        let mut islands = Vec::new();
        for zone in zones {
            let bounds = Aabb::new(zone.min, zone.max);
            if zone.name.to_ascii_lowercase().contains("room") {
                debug!("room zone found: {}", zone.name);
                room = Some(bounds);
                continue;
            }
            let Some(project) = self.projects.get(islands.len()) else {
                debug!("zone `{}` has no project; dropped", zone.name);
                continue;
            };
            islands.push(Island {
                zone_name: zone.name.clone(),
                bounds,
                project: project.clone(),
                spot: spots.get(islands.len()).copied(),
            });
        }

        let mut collections = default_collections();
        collections.extend(self.collections.clone());

        let spawn = spots.first().map(|s| Vec2::new(s.x, s.y));

        info!(
            "level assembled: {} triangles, {} islands, {} spots, {} trophies, room: {}",
            world.triangle_count(),
            islands.len(),
            spots.len(),
            trophies.len(),
            room.is_some()
        );

        Level {
            world,
            islands,
            trophies,
            room,
            collections,
            spawn,
        }
    }

    fn trophy(&self, point: &NamedPoint, category: CollectionCategory) -> Trophy {
        let name = self
            .collections
            .get(&category)
            .map(|c| c.title.clone())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| point.name.clone());
        debug!("trophy `{}` -> {}", point.name, category.key());
        Trophy {
            name,
            position: point.position,
            category,
        }
    }
}

/// Flat walkable strip along X at height `y`, two rows of tiles meeting at Z = 0.
pub fn ground_strip(x_min: f32, x_max: f32, y: f32) -> Vec<Triangle> {
    const TILE: f32 = 4.0;
    const HALF_DEPTH: f32 = 3.0;

    let mut tris = Vec::new();
    let mut x0 = x_min;
    while x0 < x_max {
        let x1 = (x0 + TILE).min(x_max);
        for (z0, z1) in [(-HALF_DEPTH, 0.0), (0.0, HALF_DEPTH)] {
            tris.push(Triangle::new(
                Vec3::new(x0, y, z0),
                Vec3::new(x0, y, z1),
                Vec3::new(x1, y, z1),
            ));
            tris.push(Triangle::new(
                Vec3::new(x0, y, z0),
                Vec3::new(x1, y, z1),
                Vec3::new(x1, y, z0),
            ));
        }
        x0 = x1;
    }
    tris
}
