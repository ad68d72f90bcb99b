//! Turns assignments into presentation-neutral display descriptors.
use crate::placement::{Assignment, Placement};
use crate::registry::ChestCount;

const USELESS_DETAIL: &str = "Useless Location";

/// Display category. Chests and special sites both read as `Useful`,
/// matching the legacy type tags a UI styles against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Dungeon,
    Connector,
    Useful,
    Static,
    Useless,
}

impl Category {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dungeon => "dungeon",
            Self::Connector => "connector",
            Self::Useful => "useful",
            Self::Static => "static",
            Self::Useless => "useless",
        }
    }
}

/// What a UI needs to draw one slot: a short label for the button face, a
/// longer detail line for tooltips, and the completed-dungeon visual flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub category: Category,
    pub label: String,
    pub detail: String,
    pub completed: bool,
}

#[must_use]
pub fn resolve_placement(placement: Placement) -> Resolved {
    match placement {
        Placement::Dungeon { info, completed } => Resolved {
            category: Category::Dungeon,
            label: info.acronym.to_string(),
            detail: info.name.to_string(),
            completed,
        },
        Placement::Connector(connector) => Resolved {
            category: Category::Connector,
            label: format!("#{}", connector.group),
            detail: connector.name.to_string(),
            completed: false,
        },
        Placement::Special(site) => Resolved {
            category: Category::Useful,
            label: site.code.to_string(),
            detail: site.name.to_string(),
            completed: false,
        },
        Placement::Static(site) => Resolved {
            category: Category::Static,
            label: site.code.to_string(),
            detail: site.name.to_string(),
            completed: false,
        },
        Placement::Chest(count) => {
            let count = count.get();
            Resolved {
                category: Category::Useful,
                label: format!("C{count}"),
                detail: format!("{count} Chest{}", if count > 1 { "s" } else { "" }),
                completed: false,
            }
        }
        Placement::Useless => Resolved {
            category: Category::Useless,
            label: String::new(),
            detail: USELESS_DETAIL.to_string(),
            completed: false,
        },
    }
}

/// Legacy entry point keyed on the raw id. `None` for anything the registry
/// does not know; callers render a neutral placeholder.
#[must_use]
pub fn resolve_id(id: u16, completed: bool, chest_count: u8) -> Option<Resolved> {
    Placement::from_id(id, completed, ChestCount::new(chest_count)).map(resolve_placement)
}

/// Display precedence for a full record: the useless flag short-circuits
/// type-based resolution and wins regardless of the underlying placement,
/// carrying through only the completed-dungeon flag. `None` when the record
/// has nothing to show.
#[must_use]
pub fn describe(assignment: &Assignment) -> Option<Resolved> {
    if assignment.marked_useless {
        return Some(Resolved {
            category: Category::Useless,
            label: String::new(),
            detail: USELESS_DETAIL.to_string(),
            completed: assignment
                .placement
                .is_some_and(Placement::is_completed_dungeon),
        });
    }
    assignment.placement.map(resolve_placement)
}
