use dialoguer::theme::ColorfulTheme;
use register_config::{Config, ConfigManager};
use register_core::Clock;
use register_storage_json::JsonRegisterStorage;

use crate::core::register_manager::RegisterManager;

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub register_manager: RegisterManager,
    pub storage: JsonRegisterStorage,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    /// Source of the default reference date for schedules and reports.
    pub clock: Box<dyn Clock>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn register_name(&self) -> Option<&str> {
        self.register_manager.current_name()
    }

    pub fn has_register(&self) -> bool {
        self.register_manager.current.is_some()
    }

    pub fn prompt(&self) -> String {
        match self
            .register_manager
            .current
            .as_ref()
            .map(|register| register.name.as_str())
        {
            Some(name) => format!("asset-register ({name}) > "),
            None => "asset-register > ".to_string(),
        }
    }
}
