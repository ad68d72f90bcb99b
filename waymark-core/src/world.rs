//! Map layout data: the fixed set of trackable slots on both world maps.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::placement::Placement;
use crate::registry::{self, ChestCount, IdCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorldSide {
    Light,
    Dark,
}

impl WorldSide {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for WorldSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorldSide {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(()),
        }
    }
}

/// One trackable slot on the map. Keys are opaque strings (historically
/// stringified numbers) and are the only way sessions refer to slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapLocation {
    pub key: String,
    pub name: String,
    pub x: f32,
    pub y: f32,
    /// Registry id of the vanilla content, when known. Drives vanilla and
    /// Dungeons Simple pre-population.
    #[serde(default)]
    pub default_id: Option<u16>,
    /// Chest count for slots whose vanilla content is the chest sentinel.
    #[serde(default)]
    pub default_chests: Option<u8>,
}

impl MapLocation {
    /// The vanilla placement for this slot, if its default id resolves.
    #[must_use]
    pub fn default_placement(&self) -> Option<Placement> {
        let chests = self.default_chests.map_or_else(ChestCount::default, ChestCount::new);
        self.default_id
            .and_then(|id| Placement::from_id(id, false, chests))
    }

    /// Whether this slot vanilla-holds a dungeon entrance. Dungeons Simple
    /// leaves these empty and editable.
    #[must_use]
    pub fn is_dungeon_slot(&self) -> bool {
        self.default_id
            .is_some_and(|id| registry::classify(id) == Some(IdCategory::Dungeon))
    }
}

/// Container for the full map layout, split by world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WorldCatalog {
    pub light: Vec<MapLocation>,
    pub dark: Vec<MapLocation>,
}

impl WorldCatalog {
    /// Create an empty catalog (useful for tests)
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the map layout from a JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a valid layout.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.light.len() + self.dark.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.light.is_empty() && self.dark.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MapLocation> {
        self.light.iter().chain(self.dark.iter())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&MapLocation> {
        self.iter().find(|loc| loc.key == key)
    }

    /// Which world map a slot key belongs to. `None` for unknown keys.
    #[must_use]
    pub fn side_of(&self, key: &str) -> Option<WorldSide> {
        if self.light.iter().any(|loc| loc.key == key) {
            Some(WorldSide::Light)
        } else if self.dark.iter().any(|loc| loc.key == key) {
            Some(WorldSide::Dark)
        } else {
            None
        }
    }
}
