//! Check catalog: every collectible check and the sprite it renders with.
//!
//! Checks are owned by registry ids, not map-slot keys, so one check list
//! follows a dungeon or connector wherever the randomizer put it. Checks
//! spanning several entrance ids (multi-section dungeons, multi-endpoint
//! caves) list every owner.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpriteKind {
    Chest,
    Item,
    Npc,
    Boss,
    Pendant,
    Crystal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprite {
    pub id: u16,
    pub name: String,
    pub kind: SpriteKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    pub id: u32,
    pub sprite: u16,
    pub name: String,
    /// Registry ids whose slot shows this check. Empty for world checks not
    /// attached to any assignable location.
    #[serde(default)]
    pub owners: Vec<u16>,
}

/// Container for the full check catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CheckCatalog {
    pub sprites: Vec<Sprite>,
    pub checks: Vec<Check>,
}

impl CheckCatalog {
    /// Create an empty catalog (useful for tests)
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the check catalog from a JSON string. Owner id 0, the legacy
    /// "no owner" sentinel, normalizes to an empty owner list.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a valid catalog.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut catalog: Self = serde_json::from_str(json)?;
        for check in &mut catalog.checks {
            check.owners.retain(|id| *id != 0);
        }
        Ok(catalog)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    #[must_use]
    pub fn check(&self, id: u32) -> Option<&Check> {
        self.checks.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn sprite(&self, id: u16) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.id == id)
    }

    /// Every check shown at the slot holding `location_id`.
    #[must_use]
    pub fn checks_for(&self, location_id: u16) -> Vec<&Check> {
        self.checks
            .iter()
            .filter(|c| c.owners.contains(&location_id))
            .collect()
    }

    /// Checks not attached to any assignable location.
    pub fn world_checks(&self) -> impl Iterator<Item = &Check> {
        self.checks.iter().filter(|c| c.owners.is_empty())
    }
}
