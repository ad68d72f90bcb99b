//! Pre-population rules applied when a session is created.
//!
//! Two layers: mode defaults (vanilla knows where everything is, Dungeons
//! Simple knows everything except dungeon entrances) and static rules,
//! a small table of slots that hold the same thing in every mode.
use std::collections::BTreeMap;

use crate::placement::{Assignment, Placement};
use crate::registry::{ChestCount, CHEST_ID};
use crate::session::RandomizerKind;
use crate::world::WorldCatalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticRule {
    pub map_key: &'static str,
    pub location_id: u16,
    pub chest_count: Option<u8>,
}

impl StaticRule {
    #[must_use]
    pub fn placement(&self) -> Option<Placement> {
        let chests = self
            .chest_count
            .map_or_else(ChestCount::default, ChestCount::new);
        Placement::from_id(self.location_id, false, chests)
    }
}

/// Rules applied in every mode: the sanctuary slot and the four-chest
/// cellar under it never move.
const ALWAYS_RULES: &[StaticRule] = &[
    StaticRule { map_key: "1", location_id: 3014, chest_count: None },
    StaticRule { map_key: "18", location_id: CHEST_ID, chest_count: Some(4) },
];

/// Per-mode additions. Every mode is currently empty; the shared set above
/// is the only populated table.
fn mode_rules(_kind: &RandomizerKind) -> &'static [StaticRule] {
    &[]
}

pub fn rules_for(kind: &RandomizerKind) -> impl Iterator<Item = &'static StaticRule> {
    ALWAYS_RULES.iter().chain(mode_rules(kind).iter())
}

/// Whether a slot is governed by a static rule under this mode.
#[must_use]
pub fn is_static_slot(kind: &RandomizerKind, map_key: &str) -> bool {
    rules_for(kind).any(|rule| rule.map_key == map_key)
}

/// Stamps static rules onto a location map. Slots the player already has a
/// record for are only marked pinned, never overwritten.
pub fn apply_static_rules(
    locations: &mut BTreeMap<String, Assignment>,
    kind: &RandomizerKind,
) {
    for rule in rules_for(kind) {
        if let Some(existing) = locations.get_mut(rule.map_key) {
            existing.pinned = true;
            continue;
        }
        let Some(placement) = rule.placement() else {
            continue;
        };
        let mut record = Assignment::locked(placement);
        record.pinned = true;
        locations.insert(rule.map_key.to_string(), record);
    }
}

/// Puts a rule-governed slot back to its rule placement, clearing any
/// useless mark. Returns false when no rule governs the slot.
pub fn restore_static(
    locations: &mut BTreeMap<String, Assignment>,
    kind: &RandomizerKind,
    map_key: &str,
) -> bool {
    let Some(rule) = rules_for(kind).find(|r| r.map_key == map_key) else {
        return false;
    };
    let Some(placement) = rule.placement() else {
        return false;
    };
    let mut record = Assignment::locked(placement);
    record.pinned = true;
    locations.insert(map_key.to_string(), record);
    true
}

/// The starting location map for a fresh session: mode defaults, then
/// static rules on top.
#[must_use]
pub fn initial_locations(
    world: &WorldCatalog,
    kind: &RandomizerKind,
) -> BTreeMap<String, Assignment> {
    let mut locations = BTreeMap::new();
    match kind {
        RandomizerKind::Vanilla => {
            for slot in world.iter() {
                if let Some(placement) = slot.default_placement() {
                    locations.insert(slot.key.clone(), Assignment::locked(placement));
                }
            }
        }
        // Dungeon slots start empty and editable; everything else is known.
        RandomizerKind::DungeonsSimple => {
            for slot in world.iter() {
                if slot.is_dungeon_slot() {
                    continue;
                }
                if let Some(placement) = slot.default_placement() {
                    locations.insert(slot.key.clone(), Assignment::locked(placement));
                }
            }
        }
        _ => {}
    }
    apply_static_rules(&mut locations, kind);
    locations
}
