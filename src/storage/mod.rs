pub mod json_backend;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use chrono::{DateTime, Utc};

use crate::domain::AppState;
use crate::errors::{JournalError, Result};

pub use json_backend::JsonStateStore;

/// A stored copy of an earlier journal document.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupInfo {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub note: Option<String>,
}

/// Persistence gateway for the journal document. The whole state is read and
/// written at once; there are no partial updates.
pub trait StateStore: Send + Sync {
    /// Returns `None` when nothing has been stored yet.
    fn load(&self) -> Result<Option<AppState>>;
    fn save(&self, state: &AppState) -> Result<()>;

    /// Human-readable location used in log and shell messages.
    fn describe(&self) -> String;

    /// Copies the currently stored document aside. Stores without backup
    /// support return `Ok(None)`.
    fn backup(&self, _note: Option<&str>) -> Result<Option<BackupInfo>> {
        Ok(None)
    }

    /// Newest first.
    fn list_backups(&self) -> Result<Vec<BackupInfo>> {
        Ok(Vec::new())
    }

    /// Replaces the stored document with the named backup and returns it.
    fn restore_backup(&self, name: &str) -> Result<AppState> {
        Err(JournalError::Persistence(format!(
            "backup `{}` cannot be restored: {} keeps no backups",
            name,
            self.describe()
        )))
    }
}

#[derive(Default)]
struct MemoryInner {
    document: Mutex<Option<AppState>>,
    backups: Mutex<Vec<(BackupInfo, AppState)>>,
    fail_writes: AtomicBool,
    writes: Mutex<usize>,
}

/// In-process store. Clones share the same document, so a handle kept by the
/// caller observes what the journal saved.
#[derive(Clone, Default)]
pub struct MemoryStateStore {
    inner: Arc<MemoryInner>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: AppState) -> Self {
        let store = Self::new();
        store.replace(Some(state));
        store
    }

    /// The last saved document.
    pub fn snapshot(&self) -> Option<AppState> {
        self.inner
            .document
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn replace(&self, state: Option<AppState>) {
        if let Ok(mut guard) = self.inner.document.lock() {
            *guard = state;
        }
    }

    /// Makes every following `save` fail until switched back.
    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn write_count(&self) -> usize {
        self.inner.writes.lock().map(|guard| *guard).unwrap_or(0)
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<Option<AppState>> {
        Ok(self.snapshot())
    }

    fn save(&self, state: &AppState) -> Result<()> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(JournalError::Persistence(
                "memory store is refusing writes".into(),
            ));
        }
        self.replace(Some(state.clone()));
        if let Ok(mut writes) = self.inner.writes.lock() {
            *writes += 1;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        "in-memory store".into()
    }

    fn backup(&self, note: Option<&str>) -> Result<Option<BackupInfo>> {
        let Some(state) = self.snapshot() else {
            return Ok(None);
        };
        let mut backups = self
            .inner
            .backups
            .lock()
            .map_err(|_| JournalError::Persistence("backup list lock poisoned".into()))?;
        let info = BackupInfo {
            name: format!("memory-{}", backups.len() + 1),
            created_at: Utc::now(),
            note: note.map(str::to_string),
        };
        backups.push((info.clone(), state));
        Ok(Some(info))
    }

    fn list_backups(&self) -> Result<Vec<BackupInfo>> {
        let backups = self
            .inner
            .backups
            .lock()
            .map_err(|_| JournalError::Persistence("backup list lock poisoned".into()))?;
        Ok(backups.iter().rev().map(|(info, _)| info.clone()).collect())
    }

    fn restore_backup(&self, name: &str) -> Result<AppState> {
        let state = {
            let backups = self
                .inner
                .backups
                .lock()
                .map_err(|_| JournalError::Persistence("backup list lock poisoned".into()))?;
            backups
                .iter()
                .find(|(info, _)| info.name == name)
                .map(|(_, state)| state.clone())
                .ok_or_else(|| JournalError::Persistence(format!("backup `{}` not found", name)))?
        };
        self.replace(Some(state.clone()));
        Ok(state)
    }
}
