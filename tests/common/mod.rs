#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use service_journal::{
    config::ConfigManager,
    core::{Journal, ManualClock},
    storage::JsonStateStore,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Returns a fresh data directory that outlives the test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Opens a journal stored in `base` with a clock the test controls.
pub fn open_journal(base: &Path, clock: &ManualClock) -> Journal {
    let store =
        JsonStateStore::new(Some(base.to_path_buf()), Some(3)).expect("create json store");
    Journal::open(Box::new(store), Box::new(clock.clone())).expect("open journal")
}

/// Creates an isolated journal and config manager sharing one directory.
pub fn setup_test_env(today: NaiveDate) -> (Journal, ConfigManager, ManualClock, PathBuf) {
    let base = temp_base();
    let clock = ManualClock::at_date(today);
    let journal = open_journal(&base, &clock);
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (journal, config_manager, clock, base)
}
