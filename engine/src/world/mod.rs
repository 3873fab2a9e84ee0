//! World Module
//!
//! Level records as delivered by the asset loader and their assembly into
//! islands, trophies and the room zone.
//!
//! - [`catalog`] - project metadata and trophy collections
//! - [`level`] - collision mesh, zones, markers and the joined [`Island`] records

pub mod catalog;
pub mod level;

pub use catalog::{
    Collection, CollectionCategory, CollectionItem, Collections, Project, default_collections,
    find_project_by_hash,
};
pub use level::{
    Island, Level, LevelData, NamedBox, NamedPoint, TeleportSpot, Trophy, ground_strip,
    numeric_suffix,
};
