use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use register_core::{
    storage::{RegisterBackupInfo, RegisterStorage},
    CoreError,
};
use register_domain::Register;
use tracing::{debug, info};

const FILE_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Filesystem-backed JSON persistence for registers and their backups.
///
/// Registers live in `<registers_dir>/<slug>.json`; backups in
/// `<backups_dir>/<slug>/<slug>_<timestamp>[_<note>].json`.
#[derive(Clone)]
pub struct JsonRegisterStorage {
    registers_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonRegisterStorage {
    pub fn new(registers_dir: PathBuf, backups_dir: PathBuf) -> Result<Self, CoreError> {
        Self::with_retention(registers_dir, backups_dir, DEFAULT_RETENTION)
    }

    pub fn with_retention(
        registers_dir: PathBuf,
        backups_dir: PathBuf,
        retention: usize,
    ) -> Result<Self, CoreError> {
        fs::create_dir_all(&registers_dir)?;
        fs::create_dir_all(&backups_dir)?;
        Ok(Self {
            registers_dir,
            backups_dir,
            retention: retention.max(1),
        })
    }

    /// Storage rooted at `root`, using its `registers/` and `backups/` folders.
    pub fn under_root(root: &Path) -> Result<Self, CoreError> {
        Self::new(root.join("registers"), root.join("backups"))
    }

    pub fn register_path(&self, name: &str) -> PathBuf {
        self.registers_dir
            .join(format!("{}.{}", canonical_name(name), FILE_EXTENSION))
    }

    pub fn backup_path(&self, name: &str, backup: &str) -> PathBuf {
        self.backup_dir(name).join(backup)
    }

    pub fn list_register_metadata(&self) -> Result<Vec<RegisterMetadata>, CoreError> {
        let mut entries = Vec::new();
        for slug in self.list_registers()? {
            let register = self.load_register(&slug)?;
            entries.push(RegisterMetadata {
                path: self.register_path(&slug),
                slug,
                name: register.name.clone(),
                created_at: register.created_at,
                updated_at: register.updated_at,
                family_count: register.families.len(),
                location_count: register.locations.len(),
                asset_count: register.assets.len(),
                total_original_value: register.total_original_value(),
                total_net_book_value: register.total_net_book_value(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    pub fn list_backup_metadata(&self, name: &str) -> Result<Vec<BackupMetadata>, CoreError> {
        let mut rows = Vec::new();
        for entry in self.list_backups(name)? {
            let size_bytes = fs::metadata(&entry.path)
                .map(|meta| meta.len())
                .unwrap_or(0);
            rows.push(BackupMetadata {
                created_at: parse_backup_timestamp(&entry.id),
                name: entry.id,
                size_bytes,
                path: entry.path,
            });
        }
        rows.sort_by_key(|meta| Reverse(meta.created_at));
        Ok(rows)
    }

    pub fn delete_backup(&self, name: &str, backup_id: &str) -> Result<(), CoreError> {
        let path = self.backup_path(name, backup_id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    fn backup_file_name(name: &str, timestamp: &str, note: Option<&str>) -> String {
        let mut stem = format!("{}_{}", canonical_name(name), timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            stem.push('_');
            stem.push_str(&label);
        }
        format!("{}.{}", stem, FILE_EXTENSION)
    }

    fn write_backup_file(
        &self,
        register: &Register,
        name: &str,
        note: Option<&str>,
    ) -> Result<RegisterBackupInfo, CoreError> {
        let dir = self.backup_dir(name);
        fs::create_dir_all(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let file_name = Self::backup_file_name(name, &timestamp, note);
        let path = dir.join(&file_name);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &serialize_register(register)?)?;
        fs::rename(&tmp, &path)?;
        self.prune_backups(name)?;
        info!(register = %canonical_name(name), backup = %file_name, "backup written");
        Ok(RegisterBackupInfo {
            register: canonical_name(name),
            id: file_name,
            created_at: timestamp,
            path,
        })
    }

    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<(), CoreError> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(name);
        fs::create_dir_all(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let backup_path = dir.join(Self::backup_file_name(name, &timestamp, None));
        fs::copy(path, &backup_path)?;
        debug!(backup = %backup_path.display(), "previous register file kept");
        self.prune_backups(name)
    }

    fn prune_backups(&self, name: &str) -> Result<(), CoreError> {
        let entries = self.list_backups(name)?;
        for entry in entries.into_iter().skip(self.retention) {
            debug!(backup = %entry.id, "pruning backup");
            let _ = fs::remove_file(entry.path);
        }
        Ok(())
    }
}

impl RegisterStorage for JsonRegisterStorage {
    fn save_register(&self, name: &str, register: &Register) -> Result<(), CoreError> {
        let path = self.register_path(name);
        if path.exists() {
            self.backup_existing_file(name, &path)?;
        }
        save_register_to_path(register, &path)?;
        info!(register = %canonical_name(name), path = %path.display(), "register saved");
        Ok(())
    }

    fn load_register(&self, name: &str) -> Result<Register, CoreError> {
        let path = self.register_path(name);
        if !path.exists() {
            return Err(CoreError::RegisterNotFound(name.to_string()));
        }
        load_register_from_path(&path)
    }

    fn list_registers(&self) -> Result<Vec<String>, CoreError> {
        if !self.registers_dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.registers_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn delete_register(&self, name: &str) -> Result<(), CoreError> {
        let path = self.register_path(name);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn save_register_to_path(&self, register: &Register, path: &Path) -> Result<(), CoreError> {
        if path.starts_with(&self.registers_dir) {
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                self.backup_existing_file(stem, path)?;
            }
        }
        save_register_to_path(register, path)
    }

    fn load_register_from_path(&self, path: &Path) -> Result<Register, CoreError> {
        load_register_from_path(path)
    }

    fn backup_register(
        &self,
        name: &str,
        register: &Register,
        note: Option<&str>,
    ) -> Result<RegisterBackupInfo, CoreError> {
        self.write_backup_file(register, name, note)
    }

    fn list_backups(&self, name: &str) -> Result<Vec<RegisterBackupInfo>, CoreError> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let slug = canonical_name(name);
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                let created_at = parse_backup_timestamp(file_name)
                    .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| file_name.to_string());
                entries.push(RegisterBackupInfo {
                    register: slug.clone(),
                    id: file_name.to_string(),
                    created_at,
                    path: path.clone(),
                });
            }
        }
        entries.sort_by(|a, b| {
            parse_backup_timestamp(&b.id)
                .cmp(&parse_backup_timestamp(&a.id))
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(entries)
    }

    fn restore_backup(&self, backup: &RegisterBackupInfo) -> Result<Register, CoreError> {
        if !backup.path.exists() {
            return Err(CoreError::Storage(format!(
                "backup `{}` not found",
                backup.id
            )));
        }
        let register = load_register_from_path(&backup.path)?;
        let target = self.register_path(&backup.register);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&backup.path, &target)?;
        info!(register = %backup.register, backup = %backup.id, "backup restored");
        Ok(register)
    }
}

/// Saves a register to an arbitrary path on disk.
pub fn save_register_to_path(register: &Register, path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    write_atomic(&tmp, &serialize_register(register)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Loads a register from the provided filesystem path.
pub fn load_register_from_path(path: &Path) -> Result<Register, CoreError> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|err| {
        CoreError::Serde(format!("{}: {}", path.display(), err))
    })
}

#[derive(Debug, Clone)]
pub struct RegisterMetadata {
    pub slug: String,
    pub name: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub family_count: usize,
    pub location_count: usize,
    pub asset_count: usize,
    pub total_original_value: f64,
    pub total_net_book_value: f64,
}

#[derive(Debug, Clone)]
pub struct BackupMetadata {
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

/// File-system slug for a register name.
pub fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches(|c| c == '_' || c == '-').is_empty() {
        "register".into()
    } else {
        sanitized
    }
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

/// Finds the `<yyyymmdd>_<hhmmss>` pair in a backup file name.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(&format!(".{}", FILE_EXTENSION))?;
    let segments: Vec<&str> = stem.split('_').collect();
    segments.windows(2).rev().find_map(|pair| {
        if !is_digits(pair[0], 8) || !is_digits(pair[1], 6) {
            return None;
        }
        NaiveDateTime::parse_from_str(&format!("{}{}", pair[0], pair[1]), "%Y%m%d%H%M%S")
            .ok()
            .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
    })
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

fn serialize_register(register: &Register) -> Result<String, CoreError> {
    serde_json::to_string_pretty(register).map_err(|err| CoreError::Serde(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_are_file_safe() {
        assert_eq!(canonical_name("Head Office 2024"), "head_office_2024");
        assert_eq!(canonical_name("  "), "register");
        assert_eq!(canonical_name("site-a"), "site-a");
    }

    #[test]
    fn notes_are_sanitized() {
        assert_eq!(
            sanitize_backup_note(Some("Before year-end close!")),
            Some("before-year-end-close".into())
        );
        assert_eq!(sanitize_backup_note(Some("  ")), None);
        assert_eq!(sanitize_backup_note(Some("***")), None);
    }

    #[test]
    fn timestamps_parse_with_and_without_note() {
        let plain = parse_backup_timestamp("main_20240131_235959.json").unwrap();
        assert_eq!(plain.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-01-31 23:59:59");
        assert_eq!(
            parse_backup_timestamp("main_20240131_235959_year-end.json"),
            Some(plain)
        );
        assert_eq!(parse_backup_timestamp("main_notes.json"), None);
    }
}
