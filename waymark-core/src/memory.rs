//! In-memory platform implementations for tests and native embedding.
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::session::Session;
use crate::{Clock, SessionStore};

#[derive(Debug, Error)]
#[error("memory store rejected the write")]
pub struct MemoryStoreError;

#[derive(Debug, Default)]
struct MemoryInner {
    sessions: Vec<Session>,
    last_export: Option<DateTime<Utc>>,
    fail_writes: bool,
}

/// A `SessionStore` over plain memory. Handles are cheap clones sharing the
/// same state, so a test can keep one and inspect what the tracker wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the last persisted session list.
    #[must_use]
    pub fn saved_sessions(&self) -> Vec<Session> {
        self.inner.borrow().sessions.clone()
    }

    /// Makes every subsequent write fail, for exercising the degraded
    /// persistence path.
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_writes = fail;
    }
}

impl SessionStore for MemoryStore {
    type Error = MemoryStoreError;

    fn load_sessions(&self) -> Result<Vec<Session>, Self::Error> {
        Ok(self.inner.borrow().sessions.clone())
    }

    fn save_sessions(&self, sessions: &[Session]) -> Result<(), Self::Error> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_writes {
            return Err(MemoryStoreError);
        }
        inner.sessions = sessions.to_vec();
        Ok(())
    }

    fn load_last_export(&self) -> Result<Option<DateTime<Utc>>, Self::Error> {
        Ok(self.inner.borrow().last_export)
    }

    fn save_last_export(&self, at: DateTime<Utc>) -> Result<(), Self::Error> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_writes {
            return Err(MemoryStoreError);
        }
        inner.last_export = Some(at);
        Ok(())
    }
}

/// A deterministic clock. Frozen clocks always answer the same instant;
/// stepping clocks advance by a fixed amount per reading, which keeps
/// timestamp-derived ids distinct in tests.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now_ms: Rc<Cell<i64>>,
    step_ms: i64,
}

impl FixedClock {
    #[must_use]
    pub fn frozen(at: DateTime<Utc>) -> Self {
        Self {
            now_ms: Rc::new(Cell::new(at.timestamp_millis())),
            step_ms: 0,
        }
    }

    #[must_use]
    pub fn stepping(start: DateTime<Utc>, step_ms: i64) -> Self {
        Self {
            now_ms: Rc::new(Cell::new(start.timestamp_millis())),
            step_ms,
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.now_ms.set(at.timestamp_millis());
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        let ms = self.now_ms.get();
        self.now_ms.set(ms + self.step_ms);
        DateTime::from_timestamp_millis(ms).unwrap_or(DateTime::UNIX_EPOCH)
    }
}
