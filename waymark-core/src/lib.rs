//! Waymark Tracker Core
//!
//! Platform-agnostic core logic for the Waymark entrance tracker.
//! This crate provides the location registries, session state, and tracking
//! rules without UI or platform-specific dependencies.

use chrono::{DateTime, Utc};

pub mod availability;
pub mod backup;
pub mod checks;
pub mod memory;
pub mod placement;
pub mod registry;
pub mod resolver;
pub mod rules;
pub mod session;
pub mod tracker;
pub mod world;

// Re-export commonly used types
pub use availability::{
    available_connectors, available_dungeons, available_specials, used_location_ids, IdList,
    UsedIds,
};
pub use backup::{
    backup_file_name, parse_backup, rekey_sessions, write_backup, ImportError, ParsedBackup,
    BACKUP_VERSION,
};
pub use checks::{Check, CheckCatalog, Sprite, SpriteKind};
pub use memory::{FixedClock, MemoryStore, MemoryStoreError};
pub use placement::{Assignment, Placement};
pub use registry::{
    classify, connector_by_id, dungeon_by_id, special_by_id, static_by_id, ChestCount, Connector,
    Dungeon, IdCategory, SpecialSite, StaticSite, CHEST_ID, USELESS_ID,
};
pub use resolver::{describe, resolve_id, resolve_placement, Category, Resolved};
pub use rules::{initial_locations, is_static_slot, restore_static, StaticRule};
pub use session::{
    sorted_sessions, Note, NoteId, ProgressStats, RandomizerKind, Session, SessionId,
    ValidationError,
};
pub use tracker::{CheckView, ImportOutcome, LocationView, Tracker};
pub use world::{MapLocation, WorldCatalog, WorldSide};

/// Trait for abstracting catalog loading operations.
/// Platform-specific implementations should provide this.
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the map layout from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the map layout cannot be loaded or parsed.
    fn load_world(&self) -> Result<WorldCatalog, Self::Error>;

    /// Load the check catalog from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the check catalog cannot be loaded or parsed.
    fn load_checks(&self) -> Result<CheckCatalog, Self::Error>;
}

/// Trait for abstracting session persistence.
/// Platform-specific implementations should provide this.
pub trait SessionStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load every stored session
    ///
    /// # Errors
    ///
    /// Returns an error if the stored list cannot be read or parsed.
    fn load_sessions(&self) -> Result<Vec<Session>, Self::Error>;

    /// Save the whole session list
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be written.
    fn save_sessions(&self, sessions: &[Session]) -> Result<(), Self::Error>;

    /// Load the last backup-export time, if one was recorded
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value cannot be read or parsed.
    fn load_last_export(&self) -> Result<Option<DateTime<Utc>>, Self::Error>;

    /// Record when a backup was exported
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn save_last_export(&self, at: DateTime<Utc>) -> Result<(), Self::Error>;
}

/// Time source for id generation and save stamps. Sessions and notes key
/// off millisecond timestamps, so tests need a clock they can pin.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock [`Clock`] backed by the host time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
