use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{NaiveDateTime, Utc};

use crate::{Config, ConfigError};

const CONFIG_FILE: &str = "config.json";
const BACKUP_PREFIX: &str = "config";
const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Reads and writes the shell preferences, with timestamped snapshots in a
/// sibling `backups` folder.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
    backups_dir: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf, backups_dir: PathBuf) -> Self {
        Self {
            config_path,
            backups_dir,
        }
    }

    /// Manager for `<base>/config/config.json`, creating the folders.
    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let dir = base.join("config");
        let manager = Self::new(dir.join(CONFIG_FILE), dir.join("backups"));
        fs::create_dir_all(&manager.backups_dir)?;
        Ok(manager)
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Stored preferences, or the defaults when nothing was saved yet.
    pub fn load(&self) -> Result<Config, ConfigError> {
        match fs::read(&self.config_path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        persist(&self.config_path, config)
    }

    /// Snapshots `config` as `config_<stamp>[_<note>].json` and returns that name.
    pub fn backup(&self, config: &Config, note: Option<&str>) -> Result<String, ConfigError> {
        let stamp = Utc::now().format(STAMP_FORMAT);
        let name = match note.and_then(note_slug) {
            Some(slug) => format!("{BACKUP_PREFIX}_{stamp}_{slug}.json"),
            None => format!("{BACKUP_PREFIX}_{stamp}.json"),
        };
        persist(&self.backups_dir.join(&name), config)?;
        Ok(name)
    }

    /// Reads the snapshot `backup_name`. Saving it is left to the caller.
    pub fn restore(&self, backup_name: &str) -> Result<Config, ConfigError> {
        let bytes = fs::read(self.backups_dir.join(backup_name)).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                std::io::Error::new(
                    err.kind(),
                    format!("configuration backup `{backup_name}` not found"),
                )
            } else {
                err
            }
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Snapshot names, newest first.
    pub fn list_backups(&self) -> Result<Vec<String>, ConfigError> {
        let entries = match fs::read_dir(&self.backups_dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if name.ends_with(".json") {
                names.push(name);
            }
        }
        names.sort_by(|a, b| (stamp_of(b), b).cmp(&(stamp_of(a), a)));
        Ok(names)
    }
}

/// Writes next to `path` first and renames over it.
fn persist(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);
    fs::write(&staging, serde_json::to_vec_pretty(config)?)?;
    fs::rename(&staging, path)?;
    Ok(())
}

/// Lowercase ASCII words joined by dashes; `None` when nothing usable is left.
fn note_slug(note: &str) -> Option<String> {
    let words: Vec<String> = note
        .split(|ch: char| !ch.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();
    (!words.is_empty()).then(|| words.join("-"))
}

fn stamp_of(name: &str) -> Option<NaiveDateTime> {
    let rest = name.strip_prefix(BACKUP_PREFIX)?.strip_prefix('_')?;
    let stamp = rest.get(..15)?;
    NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT).ok()
}
