//! Identifier registry: the flat integer namespace for assignable content.
//!
//! Every assignable thing lives in one `u16` namespace partitioned by range:
//! dungeons 1001-1099, connectors 2001-2999, specials 3001-3999, the chest
//! sentinel 4001, the useless sentinel 5001, and static fixtures 6001-6999.
//! Ids are load-bearing: existing saves and backups reference them, so the
//! tables below never renumber.
use serde::{Deserialize, Serialize};

/// Sentinel id for "this spot holds N chests".
pub const CHEST_ID: u16 = 4001;
/// Sentinel id for "this spot holds nothing worth revisiting".
pub const USELESS_ID: u16 = 5001;

/// Structural range partition of the id namespace.
///
/// Classification is about ranges only; an id can classify (e.g. 1004 is in
/// the dungeon range) while having no registry entry. Use the `*_by_id`
/// lookups for entry presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdCategory {
    Dungeon,
    Connector,
    Special,
    Chest,
    Useless,
    Static,
}

#[must_use]
pub const fn classify(id: u16) -> Option<IdCategory> {
    match id {
        1001..=1099 => Some(IdCategory::Dungeon),
        2001..=2999 => Some(IdCategory::Connector),
        3001..=3999 => Some(IdCategory::Special),
        CHEST_ID => Some(IdCategory::Chest),
        USELESS_ID => Some(IdCategory::Useless),
        6001..=6999 => Some(IdCategory::Static),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dungeon {
    pub id: u16,
    pub acronym: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connector {
    pub id: u16,
    pub name: &'static str,
    /// Endpoints of the same cave share a group number.
    pub group: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialSite {
    pub id: u16,
    pub code: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticSite {
    pub id: u16,
    pub code: &'static str,
    pub name: &'static str,
}

// Eastern Palace is 1045, between the castle and desert blocks; there is no
// 1004. The numbering is historical and frozen by existing saves.
pub const DUNGEONS: &[Dungeon] = &[
    Dungeon { id: 1001, acronym: "HM", name: "Hyrule Castle - Main" },
    Dungeon { id: 1002, acronym: "HL", name: "Hyrule Castle - Left" },
    Dungeon { id: 1003, acronym: "HR", name: "Hyrule Castle - Right" },
    Dungeon { id: 1045, acronym: "EP", name: "Eastern Palace" },
    Dungeon { id: 1005, acronym: "DM", name: "Desert Palace - Main" },
    Dungeon { id: 1006, acronym: "DL", name: "Desert Palace - Left" },
    Dungeon { id: 1007, acronym: "DR", name: "Desert Palace - Right" },
    Dungeon { id: 1008, acronym: "DB", name: "Desert Palace - Back" },
    Dungeon { id: 1009, acronym: "TH", name: "Tower of Hera" },
    Dungeon { id: 1010, acronym: "AT", name: "Agahnim Tower" },
    Dungeon { id: 1011, acronym: "PD", name: "Palace of Darkness" },
    Dungeon { id: 1012, acronym: "SP", name: "Swamp Palace" },
    Dungeon { id: 1013, acronym: "SW", name: "Skull Woods" },
    Dungeon { id: 1014, acronym: "SB", name: "Skull Woods - Back" },
    Dungeon { id: 1015, acronym: "TT", name: "Thieves Town" },
    Dungeon { id: 1016, acronym: "IP", name: "Ice Palace" },
    Dungeon { id: 1017, acronym: "MM", name: "Misery Mire" },
    Dungeon { id: 1018, acronym: "TR", name: "Turtle Rock" },
    Dungeon { id: 1019, acronym: "TC", name: "Turtle Rock - Compass" },
    Dungeon { id: 1020, acronym: "TB", name: "Turtle Rock - Big Chest" },
    Dungeon { id: 1021, acronym: "TL", name: "Turtle Rock - Laser Bridge" },
    Dungeon { id: 1022, acronym: "GT", name: "Ganons Tower" },
];

pub const CONNECTORS: &[Connector] = &[
    Connector { id: 2001, name: "Old Lady Right", group: 1 },
    Connector { id: 2002, name: "Old Lady Left", group: 1 },
    Connector { id: 2003, name: "2 Brothers Right", group: 2 },
    Connector { id: 2004, name: "2 Brothers Left", group: 2 },
    Connector { id: 2005, name: "Old Man Cave", group: 3 },
    Connector { id: 2006, name: "Old Man Cave Back", group: 3 },
    Connector { id: 2007, name: "Paradox Cave Upper", group: 4 },
    Connector { id: 2008, name: "Paradox Cave Middle", group: 4 },
    Connector { id: 2009, name: "Paradox Cave Lower", group: 4 },
    Connector { id: 2010, name: "EDM Cave Entrance", group: 5 },
    Connector { id: 2011, name: "EDM Cave Exit", group: 5 },
    Connector { id: 2012, name: "Spiral Cave", group: 6 },
    Connector { id: 2013, name: "Spiral Cave Bottom", group: 6 },
    Connector { id: 2014, name: "Mountain Climb", group: 7 },
    Connector { id: 2015, name: "Mountain Descent", group: 7 },
    Connector { id: 2016, name: "Superbunny Lower", group: 8 },
    Connector { id: 2017, name: "Superbunny Upper", group: 8 },
    Connector { id: 2018, name: "Hookshot Cave", group: 9 },
    Connector { id: 2019, name: "Floating Island", group: 9 },
    Connector { id: 2020, name: "Spectacle Rock Upper", group: 10 },
    Connector { id: 2021, name: "Spectacle Rock Lower", group: 10 },
    Connector { id: 2022, name: "Spectacle Rock Side", group: 10 },
    Connector { id: 2023, name: "Old Man Rescue Entrance", group: 11 },
    Connector { id: 2024, name: "Old Man Rescue Exit", group: 11 },
    Connector { id: 2025, name: "Bumper Cave Entrance", group: 12 },
    Connector { id: 2026, name: "Bumper Cave Exit", group: 12 },
];

pub const SPECIAL_SITES: &[SpecialSite] = &[
    SpecialSite { id: 3001, code: "MC", name: "Mimic Cave" },
    SpecialSite { id: 3002, code: "D", name: "Dam" },
    SpecialSite { id: 3003, code: "LH", name: "Link's House" },
    SpecialSite { id: 3004, code: "DS", name: "Dark Sanctuary" },
    SpecialSite { id: 3005, code: "WH", name: "Witch's Hut" },
    SpecialSite { id: 3006, code: "SK", name: "Sick Kid" },
    SpecialSite { id: 3007, code: "SM", name: "Smith's" },
    SpecialSite { id: 3008, code: "MB", name: "Magic Bat" },
    SpecialSite { id: 3009, code: "GD", name: "Ganon's Drop" },
    SpecialSite { id: 3010, code: "SC", name: "Spike Cave" },
    SpecialSite { id: 3011, code: "CH", name: "Chicken Hut" },
    SpecialSite { id: 3012, code: "SH", name: "Sahasrala" },
    SpecialSite { id: 3013, code: "BS", name: "Bomb Shop" },
    SpecialSite { id: 3014, code: "DS", name: "Sanctuary" },
    SpecialSite { id: 3098, code: "S3", name: "Shop" },
    SpecialSite { id: 3099, code: "DR", name: "Dark Room" },
];

pub const STATIC_SITES: &[StaticSite] = &[
    StaticSite { id: 6001, code: "MS", name: "Mushroom" },
    StaticSite { id: 6002, code: "BV", name: "Bottle Vendor" },
    StaticSite { id: 6003, code: "HB", name: "Hobo" },
    StaticSite { id: 6004, code: "LI", name: "Lake Hylia Island" },
    StaticSite { id: 6005, code: "KZ", name: "King Zora" },
    StaticSite { id: 6006, code: "PC", name: "Purple Chest" },
    StaticSite { id: 6007, code: "MP", name: "Master Sword Pedestal" },
    StaticSite { id: 6008, code: "BT", name: "Bombos Tablet" },
    StaticSite { id: 6009, code: "ET", name: "Ether Tablet" },
    StaticSite { id: 6014, code: "DL", name: "Desert Ledge" },
    StaticSite { id: 6022, code: "FL", name: "Flute Spot" },
    StaticSite { id: 6023, code: "MR", name: "Maze Race" },
    StaticSite { id: 6030, code: "CF", name: "Catfish" },
    StaticSite { id: 6031, code: "PY", name: "Pyramid" },
    StaticSite { id: 6032, code: "DG", name: "Digging Game" },
    StaticSite { id: 6033, code: "ST", name: "Stumpy" },
];

/// Dungeons physically in the light world, for the Dungeons Simple world
/// rule: light-world slots only offer these, dark-world slots the rest.
pub const LIGHT_WORLD_DUNGEONS: &[u16] =
    &[1001, 1002, 1003, 1005, 1006, 1007, 1008, 1009, 1010, 1045];

/// Specials exempt from uniqueness: shops and dark rooms repeat on the map.
pub const SHARED_SPECIAL_IDS: &[u16] = &[3098, 3099];

#[must_use]
pub fn dungeon_by_id(id: u16) -> Option<&'static Dungeon> {
    DUNGEONS.iter().find(|d| d.id == id)
}

#[must_use]
pub fn connector_by_id(id: u16) -> Option<&'static Connector> {
    CONNECTORS.iter().find(|c| c.id == id)
}

#[must_use]
pub fn special_by_id(id: u16) -> Option<&'static SpecialSite> {
    SPECIAL_SITES.iter().find(|s| s.id == id)
}

#[must_use]
pub fn static_by_id(id: u16) -> Option<&'static StaticSite> {
    STATIC_SITES.iter().find(|s| s.id == id)
}

#[must_use]
pub fn is_light_world_dungeon(id: u16) -> bool {
    LIGHT_WORLD_DUNGEONS.contains(&id)
}

#[must_use]
pub fn is_shared_special(id: u16) -> bool {
    SHARED_SPECIAL_IDS.contains(&id)
}

/// How many chests a chest-sentinel assignment holds. Always 1-5; out of
/// range input clamps rather than fails, including on deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct ChestCount(u8);

impl ChestCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    #[must_use]
    pub const fn new(count: u8) -> Self {
        let clamped = if count < Self::MIN {
            Self::MIN
        } else if count > Self::MAX {
            Self::MAX
        } else {
            count
        };
        Self(clamped)
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for ChestCount {
    fn default() -> Self {
        Self(1)
    }
}

impl From<u8> for ChestCount {
    fn from(count: u8) -> Self {
        Self::new(count)
    }
}

impl From<ChestCount> for u8 {
    fn from(count: ChestCount) -> Self {
        count.0
    }
}
