use dirs::home_dir;
use std::{env, path::PathBuf};

/// Environment variable overriding the data directory.
pub const HOME_ENV: &str = "ASSET_REGISTER_HOME";

const DEFAULT_DIR_NAME: &str = ".asset_register";

/// Returns the application data directory, defaulting to `~/.asset_register`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Whether the data directory was pinned through [`HOME_ENV`].
pub fn home_overridden() -> bool {
    env::var_os(HOME_ENV).is_some()
}
