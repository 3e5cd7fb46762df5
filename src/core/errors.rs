use std::result::Result as StdResult;

use register_config::ConfigError;
use register_core::CoreError;
use thiserror::Error;

/// Unified error type for the register, storage and configuration layers.
#[derive(Error, Debug)]
pub enum RegisterError {
    #[error("Register not loaded")]
    RegisterNotLoaded,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Export failed: {0}")]
    ExportError(String),
}

pub type Result<T> = StdResult<T, RegisterError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] RegisterError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<std::io::Error> for RegisterError {
    fn from(err: std::io::Error) -> Self {
        RegisterError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for RegisterError {
    fn from(err: serde_json::Error) -> Self {
        RegisterError::StorageError(err.to_string())
    }
}

impl From<csv::Error> for RegisterError {
    fn from(err: csv::Error) -> Self {
        RegisterError::ExportError(err.to_string())
    }
}

impl From<CoreError> for RegisterError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::RegisterNotLoaded => RegisterError::RegisterNotLoaded,
            CoreError::RegisterNotFound(name) => {
                RegisterError::NotFound(format!("register `{name}`"))
            }
            CoreError::FamilyNotFound(code) => RegisterError::NotFound(format!("family `{code}`")),
            CoreError::LocationNotFound(code) => {
                RegisterError::NotFound(format!("location `{code}`"))
            }
            CoreError::AccountCodeNotFound(code) => {
                RegisterError::NotFound(format!("account code `{code}`"))
            }
            CoreError::AssetNotFound(code) => RegisterError::NotFound(format!("asset `{code}`")),
            CoreError::InvalidInput(message)
            | CoreError::InvalidOperation(message)
            | CoreError::Validation(message) => RegisterError::InvalidInput(message),
            CoreError::Storage(message) | CoreError::Serde(message) => {
                RegisterError::StorageError(message)
            }
            CoreError::Io(err) => RegisterError::StorageError(err.to_string()),
        }
    }
}

impl From<ConfigError> for RegisterError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(io) => RegisterError::StorageError(io.to_string()),
            ConfigError::Serde(message) => RegisterError::ConfigError(message),
            other @ (ConfigError::UnknownKey(_) | ConfigError::InvalidValue { .. }) => {
                RegisterError::InvalidInput(other.to_string())
            }
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::from(RegisterError::from(err))
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        CliError::from(RegisterError::from(err))
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::from(RegisterError::from(err))
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_register_errors() {
        let err = RegisterError::from(CoreError::AssetNotFound("CHF02".into()));
        assert_eq!(err.to_string(), "Not found: asset `CHF02`");

        let err = RegisterError::from(CoreError::Validation("bad code".into()));
        assert!(matches!(err, RegisterError::InvalidInput(message) if message == "bad code"));
    }

    #[test]
    fn config_key_errors_are_input_errors() {
        let err = RegisterError::from(ConfigError::UnknownKey("theme".into()));
        assert!(matches!(err, RegisterError::InvalidInput(_)));
    }
}
