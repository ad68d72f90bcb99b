//! Placements and per-slot assignment records.
//!
//! A [`Placement`] is what a map slot was found to contain, carried as a
//! tagged union validated once at construction. The raw registry integer
//! only exists at the serialization boundary: saves and backups keep the
//! legacy wire shape (`locationId`, `isEditable`, ...) so files written by
//! older builds keep loading.
use serde::{Deserialize, Serialize};

use crate::registry::{
    self, ChestCount, Connector, Dungeon, IdCategory, SpecialSite, StaticSite, CHEST_ID,
    USELESS_ID,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Dungeon { info: &'static Dungeon, completed: bool },
    Connector(&'static Connector),
    Special(&'static SpecialSite),
    Static(&'static StaticSite),
    Chest(ChestCount),
    Useless,
}

impl Placement {
    /// Resolves a raw registry id. `None` for ids outside every range and
    /// for range gaps that were never issued; callers treat that as
    /// unassigned, never as an error.
    #[must_use]
    pub fn from_id(id: u16, completed: bool, chest_count: ChestCount) -> Option<Self> {
        match registry::classify(id)? {
            IdCategory::Dungeon => {
                registry::dungeon_by_id(id).map(|info| Self::Dungeon { info, completed })
            }
            IdCategory::Connector => registry::connector_by_id(id).map(Self::Connector),
            IdCategory::Special => registry::special_by_id(id).map(Self::Special),
            IdCategory::Static => registry::static_by_id(id).map(Self::Static),
            IdCategory::Chest => Some(Self::Chest(chest_count)),
            IdCategory::Useless => Some(Self::Useless),
        }
    }

    /// The wire id this placement serializes as.
    #[must_use]
    pub const fn id(self) -> u16 {
        match self {
            Self::Dungeon { info, .. } => info.id,
            Self::Connector(c) => c.id,
            Self::Special(s) => s.id,
            Self::Static(s) => s.id,
            Self::Chest(_) => CHEST_ID,
            Self::Useless => USELESS_ID,
        }
    }

    #[must_use]
    pub const fn category(self) -> IdCategory {
        match self {
            Self::Dungeon { .. } => IdCategory::Dungeon,
            Self::Connector(_) => IdCategory::Connector,
            Self::Special(_) => IdCategory::Special,
            Self::Static(_) => IdCategory::Static,
            Self::Chest(_) => IdCategory::Chest,
            Self::Useless => IdCategory::Useless,
        }
    }

    #[must_use]
    pub const fn is_completed_dungeon(self) -> bool {
        matches!(self, Self::Dungeon { completed: true, .. })
    }
}

/// One map slot's tracked state.
///
/// `editable: false` marks slots seeded by mode defaults or static rules;
/// the player cannot reassign them, though completion and useless flags may
/// still flip. `pinned` is the legacy `isStatic` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireAssignment", into = "WireAssignment")]
pub struct Assignment {
    pub placement: Option<Placement>,
    pub editable: bool,
    pub marked_useless: bool,
    pub pinned: bool,
}

impl Assignment {
    /// A player-made assignment.
    #[must_use]
    pub const fn new(placement: Placement) -> Self {
        Self {
            placement: Some(placement),
            editable: true,
            marked_useless: false,
            pinned: false,
        }
    }

    /// A rule-seeded assignment the player cannot reassign.
    #[must_use]
    pub const fn locked(placement: Placement) -> Self {
        Self {
            placement: Some(placement),
            editable: false,
            marked_useless: false,
            pinned: false,
        }
    }

    /// The record created by marking an empty slot useless.
    #[must_use]
    pub const fn useless_marker() -> Self {
        Self {
            placement: None,
            editable: true,
            marked_useless: true,
            pinned: false,
        }
    }

    #[must_use]
    pub const fn is_locked(&self) -> bool {
        !self.editable
    }

    /// Flips dungeon completion in place. Returns false when the placement
    /// is not a dungeon.
    pub fn flip_dungeon_completed(&mut self) -> bool {
        match self.placement {
            Some(Placement::Dungeon { info, completed }) => {
                self.placement = Some(Placement::Dungeon {
                    info,
                    completed: !completed,
                });
                true
            }
            _ => false,
        }
    }
}

impl Default for Assignment {
    fn default() -> Self {
        Self {
            placement: None,
            editable: true,
            marked_useless: false,
            pinned: false,
        }
    }
}

/// The legacy persisted shape. Field names are frozen; absent `isEditable`
/// means editable (older saves predate locking).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAssignment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location_id: Option<u16>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    completed: bool,
    #[serde(default = "default_editable")]
    is_editable: bool,
    #[serde(default)]
    marked_useless: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    chest_count: Option<u8>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    is_static: bool,
}

const fn default_editable() -> bool {
    true
}

impl From<WireAssignment> for Assignment {
    fn from(wire: WireAssignment) -> Self {
        // Unknown ids degrade to an unassigned record instead of failing
        // the whole save.
        let chest_count = wire.chest_count.map_or_else(ChestCount::default, ChestCount::new);
        let placement = wire
            .location_id
            .and_then(|id| Placement::from_id(id, wire.completed, chest_count));
        Self {
            placement,
            editable: wire.is_editable,
            marked_useless: wire.marked_useless,
            pinned: wire.is_static,
        }
    }
}

impl From<Assignment> for WireAssignment {
    fn from(assignment: Assignment) -> Self {
        let chest_count = match assignment.placement {
            Some(Placement::Chest(count)) => Some(count.get()),
            _ => None,
        };
        Self {
            location_id: assignment.placement.map(Placement::id),
            completed: assignment
                .placement
                .is_some_and(Placement::is_completed_dungeon),
            is_editable: assignment.editable,
            marked_useless: assignment.marked_useless,
            chest_count,
            is_static: assignment.pinned,
        }
    }
}
