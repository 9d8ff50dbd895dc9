use chrono::{DateTime, NaiveDateTime, Utc};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{app_data_dir, backups_dir_in, ensure_dir, journal_file_in, write_atomic},
    domain::{AppState, CURRENT_SCHEMA_VERSION},
    errors::{JournalError, Result},
};

use super::{BackupInfo, StateStore};

const BACKUP_PREFIX: &str = "journal_";
const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const DEFAULT_RETENTION: usize = 5;

/// Keeps the journal as one pretty-printed JSON file plus timestamped backups.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    root: PathBuf,
    journal_file: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStateStore {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let root = root.unwrap_or_else(app_data_dir);
        ensure_dir(&root)?;
        let backups_dir = backups_dir_in(&root);
        ensure_dir(&backups_dir)?;
        Ok(Self {
            journal_file: journal_file_in(&root),
            backups_dir,
            root,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn journal_path(&self) -> &Path {
        &self.journal_file
    }

    pub fn backup_path(&self, name: &str) -> PathBuf {
        self.backups_dir.join(name)
    }

    fn next_backup_path(&self, note: Option<&str>) -> PathBuf {
        let mut stem = format!(
            "{}{}",
            BACKUP_PREFIX,
            Utc::now().format(BACKUP_TIMESTAMP_FORMAT)
        );
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        let mut path = self
            .backups_dir
            .join(format!("{}.{}", stem, BACKUP_EXTENSION));
        let mut counter = 1;
        while path.exists() {
            path = self
                .backups_dir
                .join(format!("{}_{}.{}", stem, counter, BACKUP_EXTENSION));
            counter += 1;
        }
        path
    }

    fn prune_backups(&self) -> Result<()> {
        let backups = self.list_backups()?;
        for stale in backups.iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(self.backup_path(&stale.name)) {
                tracing::warn!(backup = %stale.name, error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> Result<Option<AppState>> {
        if !self.journal_file.exists() {
            return Ok(None);
        }
        let state = load_state_from_path(&self.journal_file)?;
        if state.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(JournalError::Persistence(format!(
                "{} was written by a newer version (schema {}, supported {})",
                self.journal_file.display(),
                state.schema_version,
                CURRENT_SCHEMA_VERSION
            )));
        }
        Ok(Some(state))
    }

    fn save(&self, state: &AppState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)
            .map_err(|err| JournalError::Persistence(err.to_string()))?;
        write_atomic(&self.journal_file, json.as_bytes())?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.journal_file.display().to_string()
    }

    fn backup(&self, note: Option<&str>) -> Result<Option<BackupInfo>> {
        if !self.journal_file.exists() {
            return Ok(None);
        }
        ensure_dir(&self.backups_dir)?;
        let path = self.next_backup_path(note);
        fs::copy(&self.journal_file, &path)?;
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| JournalError::Persistence("backup name is not valid UTF-8".into()))?;
        self.prune_backups()?;
        Ok(Some(BackupInfo {
            created_at: parse_backup_timestamp(&name).unwrap_or_else(Utc::now),
            note: parse_backup_note(&name),
            name,
        }))
    }

    fn list_backups(&self) -> Result<Vec<BackupInfo>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let Some(created_at) = parse_backup_timestamp(name) else {
                continue;
            };
            entries.push(BackupInfo {
                name: name.to_string(),
                created_at,
                note: parse_backup_note(name),
            });
        }
        entries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| backup_counter(&b.name).cmp(&backup_counter(&a.name)))
                .then_with(|| b.name.cmp(&a.name))
        });
        Ok(entries)
    }

    fn restore_backup(&self, name: &str) -> Result<AppState> {
        if name.contains(['/', '\\']) || name.contains("..") {
            return Err(JournalError::Validation(format!(
                "`{}` is not a backup name",
                name
            )));
        }
        let path = self.backup_path(name);
        if !path.exists() {
            return Err(JournalError::Persistence(format!(
                "backup `{}` not found",
                name
            )));
        }
        let state = load_state_from_path(&path)?;
        let raw = fs::read(&path)?;
        write_atomic(&self.journal_file, &raw)?;
        Ok(state)
    }
}

/// Reads and parses a journal document; shape errors are never partially trusted.
pub fn load_state_from_path(path: &Path) -> Result<AppState> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data)
        .map_err(|err| JournalError::MalformedDocument(format!("{}: {}", path.display(), err)))
}

fn backup_segments(name: &str) -> Option<Vec<&str>> {
    let stem = name
        .strip_prefix(BACKUP_PREFIX)?
        .strip_suffix(&format!(".{}", BACKUP_EXTENSION))?;
    let segments: Vec<&str> = stem.split('_').collect();
    if segments.len() < 2 {
        return None;
    }
    Some(segments)
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let segments = backup_segments(name)?;
    let (date_part, time_part) = (segments[0], segments[1]);
    if !is_digits(date_part, 8) || !is_digits(time_part, 6) {
        return None;
    }
    let raw = format!("{}{}", date_part, time_part);
    NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn parse_backup_note(name: &str) -> Option<String> {
    let segments = backup_segments(name)?;
    segments
        .get(2)
        .filter(|note| !note.chars().all(|c| c.is_ascii_digit()))
        .map(|note| note.to_string())
}

/// Collision suffix added by `next_backup_path` (`_1`, `_2`, ...); 0 when absent.
fn backup_counter(name: &str) -> u32 {
    backup_segments(name)
        .filter(|segments| segments.len() > 2)
        .and_then(|segments| segments.last().and_then(|last| last.parse().ok()))
        .unwrap_or(0)
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Master, Order, PaymentMethod};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn store_with_temp_dir(retention: usize) -> (JsonStateStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonStateStore::new(Some(temp.path().to_path_buf()), Some(retention))
            .expect("json store");
        (store, temp)
    }

    fn sample_state() -> AppState {
        let date = NaiveDate::from_ymd_opt(2024, 5, 22).unwrap();
        let mut state = AppState::fresh(date);
        let at = date.and_hms_opt(10, 0, 0).unwrap();
        state.today.add_order(
            Master::Maksim,
            Order::new(1000.0, PaymentMethod::Cash, Some("Kia Rio"), at).unwrap(),
        );
        state
    }

    #[test]
    fn missing_file_loads_as_absent() {
        let (store, _guard) = store_with_temp_dir(3);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (store, _guard) = store_with_temp_dir(3);
        let state = sample_state();
        store.save(&state).expect("save journal");
        let loaded = store.load().expect("load journal").expect("document present");
        assert_eq!(loaded, state);
    }

    #[test]
    fn malformed_document_fails_fast() {
        let (store, _guard) = store_with_temp_dir(3);
        fs::write(store.journal_path(), r#"{"today": {"orders": {}}}"#).unwrap();
        let err = store.load().expect_err("document is incomplete");
        assert!(matches!(err, JournalError::MalformedDocument(_)), "{err:?}");
    }

    #[test]
    fn newer_schema_is_refused() {
        let (store, _guard) = store_with_temp_dir(3);
        let mut state = sample_state();
        state.schema_version = CURRENT_SCHEMA_VERSION + 1;
        store.save(&state).unwrap();
        let err = store.load().expect_err("schema is from the future");
        assert!(matches!(err, JournalError::Persistence(_)), "{err:?}");
    }

    #[test]
    fn backups_are_noted_and_pruned() {
        let (store, _guard) = store_with_temp_dir(2);
        store.save(&sample_state()).unwrap();
        for _ in 0..4 {
            store.backup(Some("Before Reset")).unwrap().expect("backup taken");
        }
        let backups = store.list_backups().unwrap();
        assert_eq!(backups.len(), 2);
        assert!(backups.iter().all(|info| info.name.starts_with("journal_")));
        assert_eq!(backups[0].note.as_deref(), Some("before-reset"));
    }

    #[test]
    fn same_second_backups_order_by_counter() {
        let (store, _guard) = store_with_temp_dir(2);
        ensure_dir(&store.backups_dir).unwrap();
        for name in [
            "journal_20240522_101500_before-reset.json",
            "journal_20240522_101500_before-reset_9.json",
            "journal_20240522_101500_before-reset_10.json",
        ] {
            fs::write(store.backup_path(name), "{}").unwrap();
        }

        let names: Vec<String> = store
            .list_backups()
            .unwrap()
            .into_iter()
            .map(|info| info.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "journal_20240522_101500_before-reset_10.json",
                "journal_20240522_101500_before-reset_9.json",
                "journal_20240522_101500_before-reset.json",
            ]
        );

        store.prune_backups().unwrap();
        assert!(store
            .backup_path("journal_20240522_101500_before-reset_10.json")
            .exists());
        assert!(!store
            .backup_path("journal_20240522_101500_before-reset.json")
            .exists());
        assert_eq!(backup_counter("journal_20240522_101500.json"), 0);
        assert_eq!(backup_counter("journal_20240522_101500_3.json"), 3);
    }

    #[test]
    fn backup_without_document_is_skipped() {
        let (store, _guard) = store_with_temp_dir(2);
        assert!(store.backup(None).unwrap().is_none());
    }

    #[test]
    fn restore_rejects_path_like_names() {
        let (store, _guard) = store_with_temp_dir(2);
        let err = store.restore_backup("../journal.json").expect_err("not a backup");
        assert!(matches!(err, JournalError::Validation(_)));
    }

    #[test]
    fn note_sanitizing() {
        assert_eq!(
            sanitize_backup_note(Some("  Quarter Close. ")).as_deref(),
            Some("quarter-close")
        );
        assert_eq!(sanitize_backup_note(Some("???")), None);
        assert_eq!(sanitize_backup_note(None), None);
    }
}
