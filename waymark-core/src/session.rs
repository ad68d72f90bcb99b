//! Tracker sessions: one playthrough's complete tracked state.
//!
//! The serialized shape is frozen legacy camelCase. Every field an older
//! build might not have written carries a default so old saves and foreign
//! backups keep loading.
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::placement::Assignment;
use crate::resolver::{self, Category};

/// Session ids are creation timestamps in epoch milliseconds, bumped past
/// collisions. Imports re-key, so ids are only unique per device.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SessionId(pub i64);

impl SessionId {
    #[must_use]
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        Self(at.timestamp_millis())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NoteId(pub i64);

impl NoteId {
    #[must_use]
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        Self(at.timestamp_millis())
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("session name must not be blank")]
    BlankSessionName,
    #[error("note title must not be blank")]
    BlankNoteTitle,
    #[error("note content must not be blank")]
    BlankNoteContent,
}

/// Randomizer mode. The wire value is the display string; strings written
/// by other builds survive round trips via `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum RandomizerKind {
    #[default]
    Vanilla,
    DungeonsSimple,
    DungeonsFull,
    DungeonsCrossed,
    Simple,
    Restricted,
    Full,
    Crossed,
    Custom(String),
}

impl RandomizerKind {
    /// The modes offered at session creation.
    pub const STANDARD: &'static [Self] = &[
        Self::Vanilla,
        Self::DungeonsSimple,
        Self::DungeonsFull,
        Self::DungeonsCrossed,
        Self::Simple,
        Self::Restricted,
        Self::Full,
        Self::Crossed,
    ];

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Vanilla => "Vanilla",
            Self::DungeonsSimple => "Dungeons Simple",
            Self::DungeonsFull => "Dungeons Full",
            Self::DungeonsCrossed => "Dungeons Crossed",
            Self::Simple => "Simple",
            Self::Restricted => "Restricted",
            Self::Full => "Full",
            Self::Crossed => "Crossed",
            Self::Custom(name) => name,
        }
    }
}

impl fmt::Display for RandomizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for RandomizerKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Vanilla" => Self::Vanilla,
            "Dungeons Simple" => Self::DungeonsSimple,
            "Dungeons Full" => Self::DungeonsFull,
            "Dungeons Crossed" => Self::DungeonsCrossed,
            "Simple" => Self::Simple,
            "Restricted" => Self::Restricted,
            "Full" => Self::Full,
            "Crossed" => Self::Crossed,
            _ => Self::Custom(value),
        }
    }
}

impl From<RandomizerKind> for String {
    fn from(kind: RandomizerKind) -> Self {
        match kind {
            RandomizerKind::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl FromStr for RandomizerKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

/// A free-form session note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl Note {
    /// # Errors
    ///
    /// Rejects blank titles and blank content.
    pub fn new(
        id: NoteId,
        title: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        validate_note(title, content)?;
        Ok(Self {
            id,
            title: title.to_string(),
            content: content.to_string(),
            created: now,
            last_modified: now,
        })
    }

    /// # Errors
    ///
    /// Rejects blank titles and blank content; the note is left untouched.
    pub fn edit(
        &mut self,
        title: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        validate_note(title, content)?;
        self.title = title.to_string();
        self.content = content.to_string();
        self.last_modified = now;
        Ok(())
    }
}

fn validate_note(title: &str, content: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::BlankNoteTitle);
    }
    if content.trim().is_empty() {
        return Err(ValidationError::BlankNoteContent);
    }
    Ok(())
}

/// Progress counts for the list view. Categories follow the same display
/// precedence as the resolver, so a record marked useless counts as useless
/// whatever its underlying placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressStats {
    pub total_slots: usize,
    pub marked: usize,
    pub unmarked: usize,
    pub useful: usize,
    pub connectors: usize,
    pub dungeons: usize,
    pub completed_dungeons: usize,
    pub statics: usize,
    pub useless: usize,
    pub percent_complete: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub name: String,
    #[serde(default)]
    pub randomizer_type: RandomizerKind,
    #[serde(default)]
    pub is_inverted: bool,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub last_saved: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_finished: bool,
    #[serde(default)]
    pub finished_date: Option<DateTime<Utc>>,
    /// Map-slot key -> tracked record.
    #[serde(default)]
    pub locations: BTreeMap<String, Assignment>,
    /// Check id -> collected.
    #[serde(default)]
    pub check_status: BTreeMap<u32, bool>,
    #[serde(default)]
    pub global_notes: Vec<Note>,
}

impl Session {
    #[must_use]
    pub fn new(
        id: SessionId,
        name: String,
        randomizer_type: RandomizerKind,
        is_inverted: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            randomizer_type,
            is_inverted,
            created: now,
            last_saved: Some(now),
            is_finished: false,
            finished_date: None,
            locations: BTreeMap::new(),
            check_status: BTreeMap::new(),
            global_notes: Vec::new(),
        }
    }

    /// Finished sessions are read-only until reactivated.
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.is_finished
    }

    pub fn finish(&mut self, now: DateTime<Utc>) {
        self.is_finished = true;
        self.finished_date = Some(now);
    }

    pub fn reactivate(&mut self) {
        self.is_finished = false;
        self.finished_date = None;
    }

    /// Stamps the auto-save timestamp.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_saved = Some(now);
    }

    #[must_use]
    pub fn assignment(&self, map_key: &str) -> Option<&Assignment> {
        self.locations.get(map_key)
    }

    #[must_use]
    pub fn collected(&self, check_id: u32) -> bool {
        self.check_status.get(&check_id).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.global_notes.iter().find(|n| n.id == id)
    }

    pub(crate) fn note_mut(&mut self, id: NoteId) -> Option<&mut Note> {
        self.global_notes.iter_mut().find(|n| n.id == id)
    }

    #[must_use]
    pub fn progress(&self, total_slots: usize) -> ProgressStats {
        let mut stats = ProgressStats {
            total_slots,
            marked: self.locations.len(),
            unmarked: total_slots.saturating_sub(self.locations.len()),
            ..ProgressStats::default()
        };
        for record in self.locations.values() {
            match resolver::describe(record).map(|r| (r.category, r.completed)) {
                Some((Category::Useful, _)) => stats.useful += 1,
                Some((Category::Connector, _)) => stats.connectors += 1,
                Some((Category::Dungeon, completed)) => {
                    stats.dungeons += 1;
                    if completed {
                        stats.completed_dungeons += 1;
                    }
                }
                Some((Category::Static, _)) => stats.statics += 1,
                Some((Category::Useless, _)) => stats.useless += 1,
                None => {}
            }
        }
        stats.percent_complete = if total_slots == 0 {
            0
        } else {
            (stats.marked * 100 + total_slots / 2) / total_slots
        };
        stats
    }
}

/// List-view ordering: finished sessions by finish date, active sessions by
/// last save, both newest first. Sessions never stamped sort last.
#[must_use]
pub fn sorted_sessions(sessions: &[Session], show_finished: bool) -> Vec<&Session> {
    let mut list: Vec<&Session> = sessions
        .iter()
        .filter(|s| s.is_finished == show_finished)
        .collect();
    if show_finished {
        list.sort_by(|a, b| b.finished_date.cmp(&a.finished_date));
    } else {
        list.sort_by(|a, b| b.last_saved.cmp(&a.last_saved));
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::Placement;
    use crate::registry::ChestCount;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).single().expect("timestamp")
    }

    fn place(id: u16) -> Placement {
        Placement::from_id(id, false, ChestCount::default()).expect("placement")
    }

    #[test]
    fn parses_a_legacy_save_verbatim() {
        let json = r#"{
            "id": 1721088000000,
            "name": "friday seed",
            "randomizerType": "Dungeons Simple",
            "isInverted": false,
            "created": "2024-07-16T00:00:00.000Z",
            "lastSaved": "2024-07-16T01:30:00.000Z",
            "isFinished": false,
            "finishedDate": null,
            "locations": {
                "12": { "locationId": 1045, "completed": true, "isEditable": true },
                "18": { "locationId": 4001, "chestCount": 4, "isEditable": false, "isStatic": true }
            },
            "checkStatus": { "41": true },
            "globalNotes": [
                {
                    "id": 1721088000001,
                    "title": "route",
                    "content": "east first",
                    "created": "2024-07-16T00:05:00.000Z",
                    "lastModified": "2024-07-16T00:05:00.000Z"
                }
            ]
        }"#;

        let session: Session = serde_json::from_str(json).expect("legacy save");
        assert_eq!(session.id, SessionId(1_721_088_000_000));
        assert_eq!(session.randomizer_type, RandomizerKind::DungeonsSimple);
        assert!(!session.is_read_only());
        assert!(session.collected(41));
        assert!(!session.collected(42));

        let eastern = session.assignment("12").expect("record");
        assert!(eastern.placement.expect("placement").is_completed_dungeon());

        let cellar = session.assignment("18").expect("record");
        assert!(cellar.is_locked());
        assert!(cellar.pinned);
        assert_eq!(session.note(NoteId(1_721_088_000_001)).expect("note").title, "route");
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = r#"{ "id": 5, "name": "bare", "created": "2024-07-16T00:00:00Z" }"#;
        let session: Session = serde_json::from_str(json).expect("minimal save");
        assert_eq!(session.randomizer_type, RandomizerKind::Vanilla);
        assert!(session.locations.is_empty());
        assert!(session.last_saved.is_none());
        assert!(!session.is_finished);
    }

    #[test]
    fn finish_and_reactivate_drive_the_state_machine() {
        let mut session = Session::new(
            SessionId(1),
            "run".to_string(),
            RandomizerKind::Vanilla,
            false,
            at(1_000),
        );
        assert!(!session.is_read_only());

        session.finish(at(2_000));
        assert!(session.is_read_only());
        assert_eq!(session.finished_date, Some(at(2_000)));

        session.reactivate();
        assert!(!session.is_read_only());
        assert_eq!(session.finished_date, None);
    }

    #[test]
    fn every_standard_mode_round_trips_its_display_string() {
        let expected = [
            "Vanilla",
            "Dungeons Simple",
            "Dungeons Full",
            "Dungeons Crossed",
            "Simple",
            "Restricted",
            "Full",
            "Crossed",
        ];
        assert_eq!(RandomizerKind::STANDARD.len(), expected.len());
        for (kind, display) in RandomizerKind::STANDARD.iter().zip(expected) {
            assert_eq!(kind.as_str(), display);
            let parsed: RandomizerKind = display.parse().expect("infallible");
            assert_eq!(&parsed, kind, "{display} must not fall through to Custom");
        }
    }

    #[test]
    fn unknown_randomizer_strings_survive_round_trips() {
        let kind: RandomizerKind =
            serde_json::from_str(r#""Insanity""#).expect("kind");
        assert_eq!(kind, RandomizerKind::Custom("Insanity".to_string()));
        assert_eq!(serde_json::to_string(&kind).expect("json"), r#""Insanity""#);

        let standard: RandomizerKind = serde_json::from_str(r#""Dungeons Full""#).expect("kind");
        assert_eq!(standard, RandomizerKind::DungeonsFull);
    }

    #[test]
    fn note_validation_rejects_blanks() {
        assert_eq!(
            Note::new(NoteId(1), "  ", "body", at(0)),
            Err(ValidationError::BlankNoteTitle)
        );
        assert_eq!(
            Note::new(NoteId(1), "title", "\t", at(0)),
            Err(ValidationError::BlankNoteContent)
        );

        let mut note = Note::new(NoteId(1), "title", "body", at(0)).expect("note");
        assert_eq!(note.edit("x", "", at(5)), Err(ValidationError::BlankNoteContent));
        assert_eq!(note.last_modified, at(0));

        note.edit("new", "text", at(5)).expect("edit");
        assert_eq!(note.last_modified, at(5));
        assert_eq!(note.created, at(0));
    }

    #[test]
    fn progress_counts_follow_display_precedence() {
        let mut session = Session::new(
            SessionId(1),
            "run".to_string(),
            RandomizerKind::Full,
            false,
            at(0),
        );
        session
            .locations
            .insert("1".to_string(), Assignment::new(place(3003)));
        session
            .locations
            .insert("2".to_string(), Assignment::new(place(2001)));
        let mut done = Assignment::new(place(1009));
        done.flip_dungeon_completed();
        session.locations.insert("3".to_string(), done);
        // Marked useless on top of a placement counts as useless.
        let mut ignored = Assignment::new(place(3001));
        ignored.marked_useless = true;
        session.locations.insert("4".to_string(), ignored);
        session
            .locations
            .insert("5".to_string(), Assignment::useless_marker());

        let stats = session.progress(10);
        assert_eq!(stats.marked, 5);
        assert_eq!(stats.unmarked, 5);
        assert_eq!(stats.useful, 1);
        assert_eq!(stats.connectors, 1);
        assert_eq!(stats.dungeons, 1);
        assert_eq!(stats.completed_dungeons, 1);
        assert_eq!(stats.useless, 2);
        assert_eq!(stats.percent_complete, 50);
    }

    #[test]
    fn progress_with_no_slots_is_zero_not_a_panic() {
        let session = Session::new(
            SessionId(1),
            "run".to_string(),
            RandomizerKind::Vanilla,
            false,
            at(0),
        );
        assert_eq!(session.progress(0).percent_complete, 0);
    }

    #[test]
    fn list_ordering_splits_active_and_finished() {
        let mut a = Session::new(SessionId(1), "a".into(), RandomizerKind::Vanilla, false, at(1_000));
        a.touch(at(5_000));
        let mut b = Session::new(SessionId(2), "b".into(), RandomizerKind::Vanilla, false, at(2_000));
        b.touch(at(9_000));
        let mut c = Session::new(SessionId(3), "c".into(), RandomizerKind::Vanilla, false, at(3_000));
        c.finish(at(4_000));
        let mut d = Session::new(SessionId(4), "d".into(), RandomizerKind::Vanilla, false, at(3_500));
        d.finish(at(8_000));

        let sessions = vec![a, b, c, d];

        let active: Vec<_> = sorted_sessions(&sessions, false)
            .iter()
            .map(|s| s.id.0)
            .collect();
        assert_eq!(active, vec![2, 1]);

        let finished: Vec<_> = sorted_sessions(&sessions, true)
            .iter()
            .map(|s| s.id.0)
            .collect();
        assert_eq!(finished, vec![4, 3]);
    }
}
