#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use asset_register::RegisterManager;
use once_cell::sync::Lazy;
use register_config::ConfigManager;
use register_storage_json::JsonRegisterStorage;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh data directory, kept until the test binary exits.
pub fn data_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates isolated managers backed by a unique data directory for each test.
pub fn setup_test_env() -> (RegisterManager, ConfigManager, PathBuf) {
    let base = data_dir();
    let storage = JsonRegisterStorage::under_root(&base).expect("create json storage backend");
    let register_manager = RegisterManager::new(Box::new(storage));
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");

    (register_manager, config_manager, base)
}
