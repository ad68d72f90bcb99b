//! Web-specific tracker implementation
//!
//! This module provides web-specific implementations of the waymark-core
//! traits and re-exports the core tracking types.

use chrono::{DateTime, Utc};
use gloo::storage::errors::StorageError;
use gloo::storage::{LocalStorage, Storage};

// Re-export all types from waymark-core
pub use waymark_core::*;

const SESSIONS_KEY: &str = "waymark.sessions";
const LAST_EXPORT_KEY: &str = "waymark.last_export";

/// Web-specific data loader that reads the catalogs embedded at build time
pub struct WebDataLoader;

#[derive(Debug, thiserror::Error)]
pub enum WebDataError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DataLoader for WebDataLoader {
    type Error = WebDataError;

    fn load_world(&self) -> Result<WorldCatalog, Self::Error> {
        let json = include_str!("../static/assets/data/world.json");
        WorldCatalog::from_json(json).map_err(WebDataError::Json)
    }

    fn load_checks(&self) -> Result<CheckCatalog, Self::Error> {
        let json = include_str!("../static/assets/data/checks.json");
        CheckCatalog::from_json(json).map_err(WebDataError::Json)
    }
}

/// Web-specific session store using localStorage
pub struct WebSessionStore;

#[derive(Debug, thiserror::Error)]
pub enum WebStorageError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SessionStore for WebSessionStore {
    type Error = WebStorageError;

    fn load_sessions(&self) -> Result<Vec<Session>, Self::Error> {
        match LocalStorage::get(SESSIONS_KEY) {
            Ok(sessions) => Ok(sessions),
            // A browser that has never run the tracker has no list yet.
            Err(StorageError::KeyNotFound(_)) => Ok(Vec::new()),
            Err(err) => Err(WebStorageError::Storage(format!("{err:?}"))),
        }
    }

    fn save_sessions(&self, sessions: &[Session]) -> Result<(), Self::Error> {
        LocalStorage::set(SESSIONS_KEY, sessions)
            .map_err(|err| WebStorageError::Storage(format!("{err:?}")))
    }

    fn load_last_export(&self) -> Result<Option<DateTime<Utc>>, Self::Error> {
        match LocalStorage::get(LAST_EXPORT_KEY) {
            Ok(at) => Ok(Some(at)),
            Err(StorageError::KeyNotFound(_)) => Ok(None),
            Err(err) => Err(WebStorageError::Storage(format!("{err:?}"))),
        }
    }

    fn save_last_export(&self, at: DateTime<Utc>) -> Result<(), Self::Error> {
        LocalStorage::set(LAST_EXPORT_KEY, at)
            .map_err(|err| WebStorageError::Storage(format!("{err:?}")))
    }
}

/// Clock backed by the browser's `Date.now()`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    #[allow(clippy::cast_possible_truncation)] // Date.now() is integral millis.
    fn now(&self) -> DateTime<Utc> {
        let ms = js_sys::Date::now() as i64;
        DateTime::from_timestamp_millis(ms).unwrap_or(DateTime::UNIX_EPOCH)
    }
}

/// Create a browser tracker over the embedded catalogs and localStorage
///
/// # Errors
///
/// Returns an error if either embedded catalog fails to parse.
pub fn create_web_tracker() -> anyhow::Result<Tracker<WebSessionStore, BrowserClock>> {
    let tracker = Tracker::load(&WebDataLoader, WebSessionStore, BrowserClock)?;
    Ok(tracker)
}
