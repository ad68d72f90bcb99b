//! Backup files: the versioned export/import interchange format.
//!
//! The written shape is frozen: `{ "version": "1.0", "exportDate": ...,
//! "games": [...] }`. Imports tolerate as much as possible; a single broken
//! entry never sinks the rest of the file.
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::session::{Session, SessionId};

pub const BACKUP_VERSION: &str = "1.0";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("backup is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("backup has no session list")]
    MissingSessionList,
    #[error("backup contains no valid sessions")]
    NoValidSessions,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BackupFile<'a> {
    version: &'a str,
    export_date: DateTime<Utc>,
    games: &'a [Session],
}

/// Serializes the full session list as a backup document.
///
/// # Errors
///
/// Returns an error if the list cannot be encoded as JSON.
pub fn write_backup(
    sessions: &[Session],
    exported_at: DateTime<Utc>,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&BackupFile {
        version: BACKUP_VERSION,
        export_date: exported_at,
        games: sessions,
    })
}

/// Suggested download name, one per day.
#[must_use]
pub fn backup_file_name(date: DateTime<Utc>) -> String {
    format!("waymark-backup-{}.json", date.format("%Y-%m-%d"))
}

#[derive(Debug, Clone)]
pub struct ParsedBackup {
    pub sessions: Vec<Session>,
    /// Entries dropped by validation.
    pub skipped: usize,
    pub version: String,
    pub export_date: Option<DateTime<Utc>>,
}

/// Parses and validates an uploaded backup.
///
/// The session list may sit under `games` (the written shape) or
/// `sessions`. Entries missing `id`, `name`, `created` or an object-typed
/// `locations` are dropped, as are entries that fail to decode; only a
/// fully empty result is an error.
///
/// # Errors
///
/// `Malformed` for unparseable JSON, `MissingSessionList` when neither list
/// key holds an array, `NoValidSessions` when validation drops everything.
pub fn parse_backup(json: &str) -> Result<ParsedBackup, ImportError> {
    let document: Value = serde_json::from_str(json)?;
    let list = document
        .get("games")
        .or_else(|| document.get("sessions"))
        .and_then(Value::as_array)
        .ok_or(ImportError::MissingSessionList)?;

    let mut sessions = Vec::new();
    let mut skipped = 0usize;
    for entry in list {
        if !entry_is_valid(entry) {
            skipped += 1;
            continue;
        }
        match serde_json::from_value::<Session>(entry.clone()) {
            Ok(session) => sessions.push(session),
            Err(err) => {
                log::warn!("dropping unreadable backup entry: {err}");
                skipped += 1;
            }
        }
    }

    if sessions.is_empty() {
        return Err(ImportError::NoValidSessions);
    }

    let version = document
        .get("version")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();
    let export_date = document
        .get("exportDate")
        .and_then(Value::as_str)
        .and_then(|raw| raw.parse().ok());

    Ok(ParsedBackup {
        sessions,
        skipped,
        version,
        export_date,
    })
}

fn entry_is_valid(entry: &Value) -> bool {
    let has = |field: &str| entry.get(field).is_some_and(|v| !v.is_null());
    has("id") && has("name") && has("created") && entry.get("locations").is_some_and(Value::is_object)
}

/// Reassigns imported ids sequentially above the device's current maximum
/// so they cannot collide with pre-existing sessions.
pub fn rekey_sessions(sessions: &mut [Session], max_existing: i64) {
    for (offset, session) in (1..).zip(sessions.iter_mut()) {
        session.id = SessionId(max_existing + offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::RandomizerKind;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).single().expect("timestamp")
    }

    fn sample(id: i64, name: &str) -> Session {
        Session::new(
            SessionId(id),
            name.to_string(),
            RandomizerKind::Vanilla,
            false,
            at(1_700_000_000_000),
        )
    }

    #[test]
    fn written_backups_carry_the_frozen_shape() {
        let sessions = vec![sample(1, "alpha"), sample(2, "beta")];
        let json = write_backup(&sessions, at(1_700_000_100_000)).expect("backup");

        let value: Value = serde_json::from_str(&json).expect("well formed");
        assert_eq!(value["version"], BACKUP_VERSION);
        assert!(value["exportDate"].is_string());
        assert_eq!(value["games"].as_array().expect("list").len(), 2);
    }

    #[test]
    fn round_trips_through_parse() {
        let sessions = vec![sample(7, "alpha")];
        let json = write_backup(&sessions, at(0)).expect("backup");

        let parsed = parse_backup(&json).expect("parse");
        assert_eq!(parsed.sessions, sessions);
        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.version, "1.0");
        assert_eq!(parsed.export_date, Some(at(0)));
    }

    #[test]
    fn accepts_the_sessions_key_too() {
        let json = r#"{
            "sessions": [
                { "id": 3, "name": "from elsewhere", "created": "2024-01-01T00:00:00Z", "locations": {} }
            ]
        }"#;
        let parsed = parse_backup(json).expect("parse");
        assert_eq!(parsed.sessions.len(), 1);
        assert_eq!(parsed.version, "unknown");
        assert_eq!(parsed.export_date, None);
    }

    #[test]
    fn invalid_entries_drop_without_sinking_the_file() {
        let json = r#"{
            "version": "1.0",
            "games": [
                { "id": 1, "name": "good", "created": "2024-01-01T00:00:00Z", "locations": {} },
                { "id": 2, "name": "no locations", "created": "2024-01-01T00:00:00Z" },
                { "name": "no id", "created": "2024-01-01T00:00:00Z", "locations": {} },
                { "id": 4, "name": "bad date", "created": "yesterday-ish", "locations": {} }
            ]
        }"#;
        let parsed = parse_backup(json).expect("parse");
        assert_eq!(parsed.sessions.len(), 1);
        assert_eq!(parsed.sessions[0].name, "good");
        assert_eq!(parsed.skipped, 3);
    }

    #[test]
    fn failure_modes_are_distinct() {
        assert!(matches!(
            parse_backup("not json at all"),
            Err(ImportError::Malformed(_))
        ));
        assert!(matches!(
            parse_backup(r#"{ "version": "1.0" }"#),
            Err(ImportError::MissingSessionList)
        ));
        assert!(matches!(
            parse_backup(r#"{ "games": "nope" }"#),
            Err(ImportError::MissingSessionList)
        ));
        assert!(matches!(
            parse_backup(r#"{ "games": [ { "id": 1 } ] }"#),
            Err(ImportError::NoValidSessions)
        ));
    }

    #[test]
    fn rekeying_assigns_sequentially_above_the_maximum() {
        let mut imported = vec![sample(900, "a"), sample(5, "b"), sample(900, "dup")];
        rekey_sessions(&mut imported, 1_000);
        let ids: Vec<_> = imported.iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![1_001, 1_002, 1_003]);
    }

    #[test]
    fn file_names_stamp_the_date() {
        assert_eq!(
            backup_file_name(at(1_700_000_000_000)),
            "waymark-backup-2023-11-14.json"
        );
    }
}
