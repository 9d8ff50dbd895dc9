use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{app_data_dir, config_file_in, ensure_dir, exports_dir_in, write_atomic},
    domain::DIRECTOR_NAME,
    errors::{JournalError, Result},
};

pub const DEFAULT_SHOP_NAME: &str = "VIPавто";
pub const DEFAULT_BACKUP_RETENTION: usize = 5;

/// Keys accepted by [`Config::set`].
pub const CONFIG_KEYS: [&str; 5] = [
    "shop-name",
    "director",
    "export-dir",
    "pdf-font",
    "backup-retention",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub shop_name: String,
    pub director_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
    /// TrueType font embedded into PDF reports; needed for Cyrillic text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_font: Option<PathBuf>,
    pub backup_retention: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shop_name: DEFAULT_SHOP_NAME.into(),
            director_name: DIRECTOR_NAME.into(),
            export_dir: None,
            pdf_font: None,
            backup_retention: DEFAULT_BACKUP_RETENTION,
        }
    }
}

impl Config {
    /// Where reports go when no directory is given explicitly.
    pub fn export_dir_or(&self, base: &Path) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| exports_dir_in(base))
    }

    /// Updates one setting from its shell spelling. An empty value clears
    /// optional paths.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "shop-name" => {
                if value.is_empty() {
                    return Err(JournalError::Config("shop name cannot be empty".into()));
                }
                self.shop_name = value.to_string();
            }
            "director" => {
                if value.is_empty() {
                    return Err(JournalError::Config("director name cannot be empty".into()));
                }
                self.director_name = value.to_string();
            }
            "export-dir" => self.export_dir = optional_path(value),
            "pdf-font" => self.pdf_font = optional_path(value),
            "backup-retention" => {
                let retention: usize = value.parse().map_err(|_| {
                    JournalError::Config(format!("`{}` is not a number of backups", value))
                })?;
                if retention == 0 {
                    return Err(JournalError::Config(
                        "at least one backup must be retained".into(),
                    ));
                }
                self.backup_retention = retention;
            }
            other => {
                return Err(JournalError::Config(format!(
                    "unknown setting `{}` (expected one of: {})",
                    other,
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show_path = |path: &Option<PathBuf>| {
            path.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(default)".into())
        };
        writeln!(f, "shop-name        = {}", self.shop_name)?;
        writeln!(f, "director         = {}", self.director_name)?;
        writeln!(f, "export-dir       = {}", show_path(&self.export_dir))?;
        writeln!(f, "pdf-font         = {}", show_path(&self.pdf_font))?;
        write!(f, "backup-retention = {}", self.backup_retention)
    }
}

fn optional_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
            base,
        })
    }

    /// A missing file yields the defaults.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data)
            .map_err(|err| JournalError::Config(format!("{}: {}", self.path.display(), err)))
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| JournalError::Config(err.to_string()))?;
        write_atomic(&self.path, json.as_bytes())?;
        Ok(())
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.shop_name, "VIPавто");
        assert_eq!(
            config.export_dir_or(temp.path()),
            temp.path().join("exports")
        );
    }

    #[test]
    fn saved_settings_survive_reload() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let mut config = Config::default();
        config.set("shop-name", "Гараж 7").unwrap();
        config.set("backup-retention", "9").unwrap();
        config.set("pdf-font", "/fonts/DejaVuSans.ttf").unwrap();
        manager.save(&config).unwrap();

        let reloaded = manager.load().unwrap();
        assert_eq!(reloaded.shop_name, "Гараж 7");
        assert_eq!(reloaded.backup_retention, 9);
        assert_eq!(
            reloaded.pdf_font,
            Some(PathBuf::from("/fonts/DejaVuSans.ttf"))
        );
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{"shop_name": "Гараж"}"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.shop_name, "Гараж");
        assert_eq!(config.backup_retention, DEFAULT_BACKUP_RETENTION);
    }

    #[test]
    fn rejects_bad_settings() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("colour", "red"),
            Err(JournalError::Config(_))
        ));
        assert!(config.set("backup-retention", "0").is_err());
        assert!(config.set("backup-retention", "many").is_err());
        assert!(config.set("shop-name", "  ").is_err());
        config.set("export-dir", "/tmp/out").unwrap();
        config.set("export-dir", "").unwrap();
        assert_eq!(config.export_dir, None);
    }
}
