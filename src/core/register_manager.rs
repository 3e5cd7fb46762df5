use std::path::{Path, PathBuf};

use register_core::{register_warnings, RegisterBackupInfo, RegisterStorage};
use register_domain::{Register, CURRENT_SCHEMA_VERSION};
use register_storage_json::canonical_name;
use tracing::{info, warn};

use crate::core::errors::{RegisterError, Result};

/// Metadata describing the outcome of a load operation.
#[derive(Debug, Clone)]
pub struct LoadMetadata {
    pub warnings: Vec<String>,
    pub name: Option<String>,
    pub path: Option<PathBuf>,
    pub schema_version: u8,
}

/// Facade that coordinates the active register, persistence, and backups.
pub struct RegisterManager {
    pub current: Option<Register>,
    current_name: Option<String>,
    current_path: Option<PathBuf>,
    storage: Box<dyn RegisterStorage>,
}

impl RegisterManager {
    pub fn new(storage: Box<dyn RegisterStorage>) -> Self {
        Self {
            current: None,
            current_name: None,
            current_path: None,
            storage,
        }
    }

    pub fn load(&mut self, name: &str) -> Result<LoadMetadata> {
        let register = self.storage.load_register(name)?;
        self.apply_load(register, Some(canonical_name(name)), None)
    }

    pub fn load_from_path(&mut self, path: &Path) -> Result<LoadMetadata> {
        let register = self.storage.load_register_from_path(path)?;
        self.apply_load(register, None, Some(path.to_path_buf()))
    }

    /// Saves to the bound name, or to the bound path for registers opened from a file.
    pub fn save(&mut self) -> Result<Option<PathBuf>> {
        let register = self.current.as_ref().ok_or(RegisterError::RegisterNotLoaded)?;
        if let Some(name) = self.current_name.as_deref() {
            self.storage.save_register(name, register)?;
            info!(register = name, "register saved");
            Ok(self.current_path.clone())
        } else if let Some(path) = self.current_path.as_deref() {
            self.storage.save_register_to_path(register, path)?;
            Ok(Some(path.to_path_buf()))
        } else {
            Err(RegisterError::InvalidInput(
                "No save target. Use `register save <name>` once to bind it.".into(),
            ))
        }
    }

    /// Saves under `name` and binds the active register to it.
    pub fn save_as(&mut self, name: &str) -> Result<String> {
        let register = self.current.as_ref().ok_or(RegisterError::RegisterNotLoaded)?;
        let slug = canonical_name(name);
        self.storage.save_register(&slug, register)?;
        self.current_name = Some(slug.clone());
        self.current_path = None;
        Ok(slug)
    }

    pub fn save_to_path(&mut self, path: &Path) -> Result<()> {
        let register = self.current.as_ref().ok_or(RegisterError::RegisterNotLoaded)?;
        self.storage.save_register_to_path(register, path)?;
        self.current_path = Some(path.to_path_buf());
        self.current_name = None;
        Ok(())
    }

    pub fn backup(&self, note: Option<&str>) -> Result<RegisterBackupInfo> {
        let name = self.require_name()?;
        let register = self.current.as_ref().ok_or(RegisterError::RegisterNotLoaded)?;
        Ok(self.storage.backup_register(name, register, note)?)
    }

    pub fn list_backups(&self) -> Result<Vec<RegisterBackupInfo>> {
        let name = self.require_name()?;
        Ok(self.storage.list_backups(name)?)
    }

    /// Restores a backup of the bound register by file name or 1-based position.
    pub fn restore_backup(&mut self, reference: &str) -> Result<LoadMetadata> {
        let backups = self.list_backups()?;
        let backup = match reference.parse::<usize>() {
            Ok(index) if index >= 1 && index <= backups.len() => backups[index - 1].clone(),
            _ => backups
                .into_iter()
                .find(|backup| backup.id == reference || backup.id.starts_with(reference))
                .ok_or_else(|| RegisterError::NotFound(format!("backup `{reference}`")))?,
        };
        let register = self.storage.restore_backup(&backup)?;
        let name = self.current_name.clone();
        self.apply_load(register, name, None)
    }

    pub fn list_registers(&self) -> Result<Vec<String>> {
        Ok(self.storage.list_registers()?)
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current_name.as_deref()
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn set_current(&mut self, register: Register, path: Option<PathBuf>, name: Option<String>) {
        self.current = Some(register);
        self.current_path = path;
        self.current_name = name.map(|name| canonical_name(&name));
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.current_name = None;
        self.current_path = None;
    }

    pub fn with_current<T>(&self, f: impl FnOnce(&Register) -> T) -> Result<T> {
        self.current
            .as_ref()
            .map(f)
            .ok_or(RegisterError::RegisterNotLoaded)
    }

    pub fn with_current_mut<T>(&mut self, f: impl FnOnce(&mut Register) -> T) -> Result<T> {
        self.current
            .as_mut()
            .map(f)
            .ok_or(RegisterError::RegisterNotLoaded)
    }

    fn require_name(&self) -> Result<&str> {
        self.current_name.as_deref().ok_or_else(|| {
            RegisterError::InvalidInput(
                "The active register has no name. Use `register save <name>` first.".into(),
            )
        })
    }

    fn apply_load(
        &mut self,
        register: Register,
        name: Option<String>,
        path: Option<PathBuf>,
    ) -> Result<LoadMetadata> {
        if register.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(RegisterError::StorageError(format!(
                "register schema v{} is newer than supported v{}",
                register.schema_version, CURRENT_SCHEMA_VERSION
            )));
        }
        let warnings = register_warnings(&register);
        for warning in &warnings {
            warn!(register = %register.name, "{warning}");
        }
        let schema_version = register.schema_version;
        self.current = Some(register);
        self.current_name = name.clone();
        self.current_path = path.clone();
        Ok(LoadMetadata {
            warnings,
            name,
            path,
            schema_version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use register_core::RegisterService;
    use register_storage_json::JsonRegisterStorage;
    use std::fs;
    use tempfile::tempdir;

    fn manager_in(dir: &Path) -> RegisterManager {
        let storage = JsonRegisterStorage::under_root(dir).unwrap();
        RegisterManager::new(Box::new(storage))
    }

    #[test]
    fn save_and_load_named_roundtrip() {
        let temp = tempdir().unwrap();
        let mut manager = manager_in(temp.path());

        manager.set_current(Register::new("Demo"), None, None);
        let slug = manager.save_as("Demo Register").expect("save register");
        assert_eq!(slug, "demo_register");

        manager.clear();
        let metadata = manager.load("demo_register").expect("load register");
        assert_eq!(metadata.name.as_deref(), Some("demo_register"));
        assert!(metadata.warnings.is_empty());
        assert!(manager.current.is_some());
    }

    #[test]
    fn unnamed_register_cannot_be_backed_up() {
        let temp = tempdir().unwrap();
        let mut manager = manager_in(temp.path());
        manager.set_current(Register::new("Loose"), None, None);

        assert!(matches!(
            manager.backup(None),
            Err(RegisterError::InvalidInput(_))
        ));
        assert!(matches!(manager.save(), Err(RegisterError::InvalidInput(_))));
    }

    #[test]
    fn restore_by_position_reloads_register() {
        let temp = tempdir().unwrap();
        let mut manager = manager_in(temp.path());
        let mut register = RegisterService::create("Plant");
        RegisterService::seed_sample(&mut register);
        manager.set_current(register, None, Some("plant".into()));
        manager.save().unwrap();
        manager.backup(Some("seeded")).unwrap();

        manager
            .with_current_mut(|register| register.assets.clear())
            .unwrap();
        let metadata = manager.restore_backup("1").expect("restore");
        assert_eq!(metadata.name.as_deref(), Some("plant"));
        assert_eq!(manager.with_current(|register| register.assets.len()).unwrap(), 3);
    }

    #[test]
    fn rejects_future_schema_versions() {
        let temp = tempdir().unwrap();
        let mut manager = manager_in(temp.path());

        let path = temp.path().join("future.json");
        let mut register = Register::new("Future");
        register.schema_version = CURRENT_SCHEMA_VERSION + 5;
        fs::write(&path, serde_json::to_string(&register).unwrap()).unwrap();

        let err = manager
            .load_from_path(&path)
            .expect_err("load future schema should fail");
        match err {
            RegisterError::StorageError(message) => {
                assert!(message.contains("newer"), "unexpected error: {message}");
            }
            other => panic!("expected storage error, got {other:?}"),
        }
    }
}
