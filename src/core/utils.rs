use dirs::home_dir;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

pub const HOME_ENV: &str = "SERVICE_JOURNAL_HOME";

const DEFAULT_DIR_NAME: &str = ".service_journal";
const JOURNAL_FILE: &str = "journal.json";
const BACKUP_DIR: &str = "backups";
const CONFIG_FILE: &str = "config.json";
const EXPORT_DIR: &str = "exports";

/// Returns the application data directory, defaulting to `~/.service_journal`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Path of the single journal document inside `base`.
pub fn journal_file_in(base: &Path) -> PathBuf {
    base.join(JOURNAL_FILE)
}

pub fn backups_dir_in(base: &Path) -> PathBuf {
    base.join(BACKUP_DIR)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

/// Default destination for CSV and PDF reports.
pub fn exports_dir_in(base: &Path) -> PathBuf {
    base.join(EXPORT_DIR)
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Sibling staging path used for atomic replace (`journal.json.tmp`).
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.tmp", existing),
        None => "tmp".to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Writes `data` next to `path` and renames it into place.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    fs::write(&tmp, data)?;
    fs::rename(&tmp, path)
}
