//! Availability queries: what can still be assigned to a slot.
//!
//! Uniqueness is advisory and enforced here at offer time, not stored:
//! queries never mutate, and a stale duplicate already in a save is left
//! alone. The slot being edited is excluded so its current value stays
//! offered.
use smallvec::SmallVec;

use crate::placement::Placement;
use crate::registry::{self, Connector, Dungeon, IdCategory, SpecialSite};
use crate::session::{RandomizerKind, Session};
use crate::world::WorldSide;

// Inline capacity covers a typical session without spilling to the heap.
pub type IdList = SmallVec<[u16; 8]>;

/// Registry ids already assigned somewhere in a session, split by category.
/// Sentinels and static fixtures are repeatable and never count.
#[derive(Debug, Clone, Default)]
pub struct UsedIds {
    pub dungeons: IdList,
    pub connectors: IdList,
    pub specials: IdList,
}

#[must_use]
pub fn used_location_ids(session: &Session, exclude_key: Option<&str>) -> UsedIds {
    let mut used = UsedIds::default();
    for (key, record) in &session.locations {
        if exclude_key == Some(key.as_str()) {
            continue;
        }
        let Some(placement) = record.placement else {
            continue;
        };
        match placement.category() {
            IdCategory::Dungeon => used.dungeons.push(placement.id()),
            IdCategory::Connector => used.connectors.push(placement.id()),
            IdCategory::Special => used.specials.push(placement.id()),
            IdCategory::Chest | IdCategory::Useless | IdCategory::Static => {}
        }
    }
    used
}

/// Dungeons still assignable. Under Dungeons Simple with a known slot
/// world, light-world slots only offer the light-world subset and
/// dark-world slots the complement; every other mode ignores the world.
#[must_use]
pub fn available_dungeons(
    session: &Session,
    exclude_key: Option<&str>,
    world: Option<WorldSide>,
) -> Vec<&'static Dungeon> {
    let used = used_location_ids(session, exclude_key);
    let world_rule = match (&session.randomizer_type, world) {
        (RandomizerKind::DungeonsSimple, Some(side)) => Some(side),
        _ => None,
    };
    registry::DUNGEONS
        .iter()
        .filter(|d| !used.dungeons.contains(&d.id))
        .filter(|d| match world_rule {
            Some(WorldSide::Light) => registry::is_light_world_dungeon(d.id),
            Some(WorldSide::Dark) => !registry::is_light_world_dungeon(d.id),
            None => true,
        })
        .collect()
}

/// Connector endpoints still assignable. Endpoints are individual: placing
/// one endpoint of a cave does not retire its group partners.
#[must_use]
pub fn available_connectors(
    session: &Session,
    exclude_key: Option<&str>,
) -> Vec<&'static Connector> {
    let used = used_location_ids(session, exclude_key);
    registry::CONNECTORS
        .iter()
        .filter(|c| !used.connectors.contains(&c.id))
        .collect()
}

/// Special sites still assignable. Shops and dark rooms repeat on the map,
/// so those ids are offered no matter how often they are placed.
#[must_use]
pub fn available_specials(
    session: &Session,
    exclude_key: Option<&str>,
) -> Vec<&'static SpecialSite> {
    let used = used_location_ids(session, exclude_key);
    registry::SPECIAL_SITES
        .iter()
        .filter(|s| registry::is_shared_special(s.id) || !used.specials.contains(&s.id))
        .collect()
}
