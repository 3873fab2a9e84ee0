//! Project and collection catalog
//!
//! Static reference data shown by the project-select panel and the
//! collection popups. Loaded with the level and never mutated at runtime.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One portfolio piece, shown when its island is entered.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub subtitle: String,
    pub score: String,
    pub time: String,
    pub client: String,
    pub year: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub thumbnail_url: String,
    pub youtube_id: Option<String>,
    /// Hash fragment the host page uses to deep-link to this project
    pub framer_hash: Option<String>,
    pub locked: bool,
}

/// Trophy categories in the room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CollectionCategory {
    #[serde(rename = "photography")]
    Photography,
    #[serde(rename = "sfxEdits")]
    SfxEdits,
    #[serde(rename = "conceptArt")]
    ConceptArt,
}

impl CollectionCategory {
    pub const ALL: [CollectionCategory; 3] = [
        CollectionCategory::Photography,
        CollectionCategory::SfxEdits,
        CollectionCategory::ConceptArt,
    ];

    /// Key used by the popup and the host page.
    pub fn key(self) -> &'static str {
        match self {
            CollectionCategory::Photography => "photography",
            CollectionCategory::SfxEdits => "sfxEdits",
            CollectionCategory::ConceptArt => "conceptArt",
        }
    }

    pub fn default_title(self) -> &'static str {
        match self {
            CollectionCategory::Photography => "Photography",
            CollectionCategory::SfxEdits => "SFX Edits",
            CollectionCategory::ConceptArt => "Concept Art",
        }
    }

    /// Category for a trophy or trophy-spot name, matched case-insensitively.
    ///
    /// Accepts the room-mesh names (`trophy-photo`, `trophy-sfx`,
    /// `trophy-concept`) as well as the spot names (`spot-photography`,
    /// `spot-sfx-edits`, `spot-concept-art`).
    pub fn from_marker_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        if name.contains("trophy-photo") || name.contains("photography") {
            Some(CollectionCategory::Photography)
        } else if name.contains("trophy-sfx") || name.contains("sfx") {
            Some(CollectionCategory::SfxEdits)
        } else if name.contains("trophy-concept") || name.contains("concept") {
            Some(CollectionCategory::ConceptArt)
        } else {
            None
        }
    }
}

/// A single collectible.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionItem {
    pub name: String,
    pub thumbnail: Option<String>,
}

/// Named list of collectibles behind one trophy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Collection {
    pub title: String,
    pub items: Vec<CollectionItem>,
}

/// All collections keyed by category; missing categories fall back to an
/// empty collection with the default title.
pub type Collections = BTreeMap<CollectionCategory, Collection>;

pub fn default_collections() -> Collections {
    CollectionCategory::ALL
        .iter()
        .map(|&c| {
            (
                c,
                Collection {
                    title: c.default_title().to_string(),
                    items: Vec::new(),
                },
            )
        })
        .collect()
}

/// Find the project a deep-link hash refers to.
///
/// A leading `#` is ignored; the hash matches either `framer_hash` or `id`.
/// An empty hash never matches.
pub fn find_project_by_hash(projects: &[Project], hash: &str) -> Option<usize> {
    let hash = hash.trim_start_matches('#');
    if hash.is_empty() {
        return None;
    }
    projects
        .iter()
        .position(|p| p.framer_hash.as_deref() == Some(hash) || p.id == hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str, hash: Option<&str>) -> Project {
        Project {
            id: id.to_string(),
            framer_hash: hash.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_marker_names_map_to_categories() {
        assert_eq!(
            CollectionCategory::from_marker_name("Trophy-Photo.001"),
            Some(CollectionCategory::Photography)
        );
        assert_eq!(
            CollectionCategory::from_marker_name("spot-sfx-edits"),
            Some(CollectionCategory::SfxEdits)
        );
        assert_eq!(
            CollectionCategory::from_marker_name("trophy-concept"),
            Some(CollectionCategory::ConceptArt)
        );
        assert_eq!(CollectionCategory::from_marker_name("spot-3"), None);
    }

    #[test]
    fn test_category_serializes_as_key() {
        let json = serde_json::to_string(&CollectionCategory::SfxEdits).unwrap();
        assert_eq!(json, "\"sfxEdits\"");
    }

    #[test]
    fn test_find_project_by_hash() {
        let projects = vec![
            project("showreel", Some("showreel-project")),
            project("true-hero", Some("true-hero-project")),
        ];
        assert_eq!(find_project_by_hash(&projects, "#true-hero-project"), Some(1));
        assert_eq!(find_project_by_hash(&projects, "showreel"), Some(0));
        assert_eq!(find_project_by_hash(&projects, "#"), None);
        assert_eq!(find_project_by_hash(&projects, "missing"), None);
    }
}
