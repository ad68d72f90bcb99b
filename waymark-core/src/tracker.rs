//! The tracker engine: owns the session list, the open-session cursor and
//! the catalogs, and applies every operation's preconditions.
//!
//! Mutations follow one policy: check preconditions, mutate, stamp the
//! auto-save timestamp (content changes only), persist the whole list
//! best-effort. Precondition failures are silent skips reported through the
//! return value, never errors.
use chrono::{DateTime, Utc};

use crate::availability;
use crate::backup::{self, ImportError};
use crate::checks::{CheckCatalog, SpriteKind};
use crate::placement::{Assignment, Placement};
use crate::registry::{ChestCount, Connector, Dungeon, SpecialSite};
use crate::resolver::{self, Resolved};
use crate::rules;
use crate::session::{
    sorted_sessions, Note, NoteId, ProgressStats, RandomizerKind, Session, SessionId,
    ValidationError,
};
use crate::world::WorldCatalog;
use crate::{Clock, DataLoader, SessionStore};

/// One slot's full display state: the resolved descriptor plus the checks
/// surfaced there with their collected status.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationView {
    pub resolved: Resolved,
    pub checks: Vec<CheckView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckView {
    pub id: u32,
    pub name: String,
    pub sprite: Option<SpriteKind>,
    pub collected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub imported: usize,
    pub skipped: usize,
    pub version: String,
    pub export_date: Option<DateTime<Utc>>,
}

pub struct Tracker<S, C>
where
    S: SessionStore,
    C: Clock,
{
    store: S,
    clock: C,
    world: WorldCatalog,
    checks: CheckCatalog,
    sessions: Vec<Session>,
    open: Option<SessionId>,
}

impl<S, C> Tracker<S, C>
where
    S: SessionStore,
    C: Clock,
{
    /// Builds a tracker from already-parsed catalogs. The stored session
    /// list is read once here; an unreadable list degrades to empty rather
    /// than failing startup.
    pub fn new(world: WorldCatalog, checks: CheckCatalog, store: S, clock: C) -> Self {
        let sessions = store.load_sessions().unwrap_or_else(|err| {
            log::warn!("session list unreadable, starting empty: {err}");
            Vec::new()
        });
        Self {
            store,
            clock,
            world,
            checks,
            sessions,
            open: None,
        }
    }

    /// Builds a tracker through a platform data loader. Catalog failures
    /// are fatal; there is nothing to track without them.
    ///
    /// # Errors
    ///
    /// Returns the loader's error when either catalog cannot be loaded.
    pub fn load<L: DataLoader>(loader: &L, store: S, clock: C) -> Result<Self, L::Error> {
        let world = loader.load_world()?;
        let checks = loader.load_checks()?;
        Ok(Self::new(world, checks, store, clock))
    }

    /// Writes the whole session list. Failures are logged and reported as
    /// `false`; in-memory tracking continues either way.
    pub fn persist(&self) -> bool {
        match self.store.save_sessions(&self.sessions) {
            Ok(()) => true,
            Err(err) => {
                log::error!("session list write failed, tracking continues in memory: {err}");
                false
            }
        }
    }

    // ---- session management ----

    /// Creates a session with mode defaults and static rules applied. The
    /// new session is not opened.
    ///
    /// # Errors
    ///
    /// Rejects blank names.
    pub fn create_session(
        &mut self,
        name: &str,
        kind: RandomizerKind,
        inverted: bool,
    ) -> Result<SessionId, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::BlankSessionName);
        }
        let now = self.clock.now();
        let id = self.unique_session_id(now);
        let mut session = Session::new(id, name.to_string(), kind, inverted, now);
        session.locations = rules::initial_locations(&self.world, &session.randomizer_type);
        self.sessions.push(session);
        self.persist();
        Ok(id)
    }

    fn unique_session_id(&self, now: DateTime<Utc>) -> SessionId {
        let mut candidate = SessionId::from_timestamp(now);
        while self.sessions.iter().any(|s| s.id == candidate) {
            candidate = SessionId(candidate.0 + 1);
        }
        candidate
    }

    /// Opens a session for editing. At most one session is open at a time;
    /// opening another replaces the cursor.
    pub fn open_session(&mut self, id: SessionId) -> bool {
        if self.sessions.iter().any(|s| s.id == id) {
            self.open = Some(id);
            true
        } else {
            false
        }
    }

    pub fn close_session(&mut self) {
        self.open = None;
    }

    pub fn delete_session(&mut self, id: SessionId) -> bool {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        if self.sessions.len() == before {
            return false;
        }
        if self.open == Some(id) {
            self.open = None;
        }
        self.persist();
        true
    }

    /// Marks a session finished (read-only). Already-finished sessions
    /// skip, so the finish date is never re-stamped.
    pub fn finish_session(&mut self, id: SessionId) -> bool {
        let now = self.clock.now();
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        if session.is_finished {
            return false;
        }
        session.finish(now);
        self.persist();
        true
    }

    pub fn reactivate_session(&mut self, id: SessionId) -> bool {
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) else {
            return false;
        };
        if !session.is_finished {
            return false;
        }
        session.reactivate();
        self.persist();
        true
    }

    // ---- content mutations (open session, skipped when finished) ----

    /// Assigns a placement to a slot. Skips when the existing record is
    /// locked; otherwise the record is replaced outright, clearing any
    /// useless mark.
    pub fn assign_location(&mut self, map_key: &str, placement: Placement) -> bool {
        let Some(session) = self.current_editable_mut() else {
            return false;
        };
        if session.locations.get(map_key).is_some_and(Assignment::is_locked) {
            return false;
        }
        session
            .locations
            .insert(map_key.to_string(), Assignment::new(placement));
        self.after_content_mutation();
        true
    }

    /// Assigns by raw registry id, the shape UI events arrive in. Unknown
    /// ids skip.
    pub fn assign_location_id(&mut self, map_key: &str, id: u16, chest_count: u8) -> bool {
        match Placement::from_id(id, false, ChestCount::new(chest_count)) {
            Some(placement) => self.assign_location(map_key, placement),
            None => false,
        }
    }

    /// Removes a slot's record entirely (the legacy "reset"). Locked
    /// records and missing keys skip.
    pub fn clear_location(&mut self, map_key: &str) -> bool {
        let Some(session) = self.current_editable_mut() else {
            return false;
        };
        match session.locations.get(map_key) {
            None => return false,
            Some(record) if record.is_locked() => return false,
            Some(_) => {}
        }
        session.locations.remove(map_key);
        self.after_content_mutation();
        true
    }

    /// The right-click flow: an empty slot gains a useless marker, a
    /// dungeon record flips completion, anything else flips its useless
    /// mark. Locked records participate; only a finished session skips.
    pub fn toggle_useless(&mut self, map_key: &str) -> bool {
        let Some(session) = self.current_editable_mut() else {
            return false;
        };
        match session.locations.get_mut(map_key) {
            None => {
                session
                    .locations
                    .insert(map_key.to_string(), Assignment::useless_marker());
            }
            Some(record) => {
                if !record.flip_dungeon_completed() {
                    record.marked_useless = !record.marked_useless;
                }
            }
        }
        self.after_content_mutation();
        true
    }

    /// Puts a rule-governed slot back to its rule placement.
    pub fn restore_static_slot(&mut self, map_key: &str) -> bool {
        let Some(session) = self.current_editable_mut() else {
            return false;
        };
        let kind = session.randomizer_type.clone();
        if !rules::restore_static(&mut session.locations, &kind, map_key) {
            return false;
        }
        self.after_content_mutation();
        true
    }

    /// Sets a check's collected state. Idempotent: writing the state a
    /// check already has skips without stamping the auto-save timestamp.
    /// Checks the catalog does not know skip.
    pub fn set_check(&mut self, check_id: u32, collected: bool) -> bool {
        if self.checks.check(check_id).is_none() {
            return false;
        }
        let Some(session) = self.current_editable_mut() else {
            return false;
        };
        if session.collected(check_id) == collected {
            return false;
        }
        session.check_status.insert(check_id, collected);
        self.after_content_mutation();
        true
    }

    /// # Errors
    ///
    /// Rejects blank titles and content. `Ok(false)` is the precondition
    /// skip (no open session, or finished).
    pub fn add_note(&mut self, title: &str, content: &str) -> Result<bool, ValidationError> {
        let now = self.clock.now();
        let Some(session) = self.current_editable_mut() else {
            return Ok(false);
        };
        let id = unique_note_id(session, now);
        let note = Note::new(id, title, content, now)?;
        session.global_notes.push(note);
        self.after_content_mutation();
        Ok(true)
    }

    /// # Errors
    ///
    /// Rejects blank titles and content, leaving the note untouched.
    pub fn edit_note(
        &mut self,
        id: NoteId,
        title: &str,
        content: &str,
    ) -> Result<bool, ValidationError> {
        let now = self.clock.now();
        let Some(session) = self.current_editable_mut() else {
            return Ok(false);
        };
        let Some(note) = session.note_mut(id) else {
            return Ok(false);
        };
        note.edit(title, content, now)?;
        self.after_content_mutation();
        Ok(true)
    }

    pub fn remove_note(&mut self, id: NoteId) -> bool {
        let Some(session) = self.current_editable_mut() else {
            return false;
        };
        let before = session.global_notes.len();
        session.global_notes.retain(|n| n.id != id);
        if session.global_notes.len() == before {
            return false;
        }
        self.after_content_mutation();
        true
    }

    /// Replaces the whole note list, the shape the notes panel saves in.
    pub fn replace_notes(&mut self, notes: Vec<Note>) -> bool {
        let Some(session) = self.current_editable_mut() else {
            return false;
        };
        session.global_notes = notes;
        self.after_content_mutation();
        true
    }

    // ---- views ----

    #[must_use]
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    #[must_use]
    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// The list view's ordering: newest activity first, finished and
    /// active kept apart.
    #[must_use]
    pub fn session_list(&self, show_finished: bool) -> Vec<&Session> {
        sorted_sessions(&self.sessions, show_finished)
    }

    /// The open session, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Session> {
        self.open_index().map(|i| &self.sessions[i])
    }

    #[must_use]
    pub fn world(&self) -> &WorldCatalog {
        &self.world
    }

    #[must_use]
    pub fn check_catalog(&self) -> &CheckCatalog {
        &self.checks
    }

    /// Progress for the open session against the full map.
    #[must_use]
    pub fn progress(&self) -> Option<ProgressStats> {
        self.current().map(|s| s.progress(self.world.len()))
    }

    /// Everything a UI needs to draw one slot of the open session. `None`
    /// when the slot has no record or nothing to show.
    #[must_use]
    pub fn location_view(&self, map_key: &str) -> Option<LocationView> {
        let session = self.current()?;
        let record = session.assignment(map_key)?;
        let resolved = resolver::describe(record)?;
        let checks = record
            .placement
            .map(|p| self.checks_at(session, p.id()))
            .unwrap_or_default();
        Some(LocationView { resolved, checks })
    }

    fn checks_at(&self, session: &Session, location_id: u16) -> Vec<CheckView> {
        self.checks
            .checks_for(location_id)
            .into_iter()
            .map(|check| CheckView {
                id: check.id,
                name: check.name.clone(),
                sprite: self.checks.sprite(check.sprite).map(|s| s.kind),
                collected: session.collected(check.id),
            })
            .collect()
    }

    /// Dungeons assignable to `map_key`, with the slot's own value still
    /// offered and the Dungeons Simple world rule applied.
    #[must_use]
    pub fn available_dungeons(&self, map_key: &str) -> Vec<&'static Dungeon> {
        self.current()
            .map(|session| {
                availability::available_dungeons(
                    session,
                    Some(map_key),
                    self.world.side_of(map_key),
                )
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn available_connectors(&self, map_key: &str) -> Vec<&'static Connector> {
        self.current()
            .map(|session| availability::available_connectors(session, Some(map_key)))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn available_specials(&self, map_key: &str) -> Vec<&'static SpecialSite> {
        self.current()
            .map(|session| availability::available_specials(session, Some(map_key)))
            .unwrap_or_default()
    }

    // ---- backup ----

    /// Serializes every session as a backup document and records the
    /// export time (best-effort).
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be encoded as JSON.
    pub fn export_backup(&mut self) -> Result<String, serde_json::Error> {
        let now = self.clock.now();
        let json = backup::write_backup(&self.sessions, now)?;
        if let Err(err) = self.store.save_last_export(now) {
            log::error!("failed to record export time: {err}");
        }
        Ok(json)
    }

    /// Imports a backup, replacing the whole session list. Imported ids
    /// are re-keyed above the current maximum and the open session is
    /// closed.
    ///
    /// # Errors
    ///
    /// See [`backup::parse_backup`].
    pub fn import_backup(&mut self, json: &str) -> Result<ImportOutcome, ImportError> {
        let parsed = backup::parse_backup(json)?;
        let max_existing = self.sessions.iter().map(|s| s.id.0).max().unwrap_or(0);
        let mut sessions = parsed.sessions;
        backup::rekey_sessions(&mut sessions, max_existing);
        let imported = sessions.len();
        self.sessions = sessions;
        self.open = None;
        self.persist();
        Ok(ImportOutcome {
            imported,
            skipped: parsed.skipped,
            version: parsed.version,
            export_date: parsed.export_date,
        })
    }

    /// When a backup was last exported from this device.
    #[must_use]
    pub fn last_export(&self) -> Option<DateTime<Utc>> {
        self.store.load_last_export().unwrap_or_else(|err| {
            log::warn!("last export time unreadable: {err}");
            None
        })
    }

    // ---- internals ----

    fn open_index(&self) -> Option<usize> {
        self.open
            .and_then(|id| self.sessions.iter().position(|s| s.id == id))
    }

    fn current_mut(&mut self) -> Option<&mut Session> {
        let index = self.open_index()?;
        Some(&mut self.sessions[index])
    }

    /// The open session, only while it accepts mutations.
    fn current_editable_mut(&mut self) -> Option<&mut Session> {
        self.current_mut().filter(|s| !s.is_read_only())
    }

    /// Content-mutation epilogue: stamp the auto-save timestamp, persist.
    fn after_content_mutation(&mut self) {
        let now = self.clock.now();
        if let Some(session) = self.current_mut() {
            session.touch(now);
        }
        self.persist();
    }
}

fn unique_note_id(session: &Session, now: DateTime<Utc>) -> NoteId {
    let mut candidate = NoteId::from_timestamp(now);
    while session.global_notes.iter().any(|n| n.id == candidate) {
        candidate = NoteId(candidate.0 + 1);
    }
    candidate
}
