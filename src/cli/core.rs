//! Core CLI loop, dispatch, and shell context helpers.

use std::{io, path::Path};

use chrono::NaiveDate;
use dialoguer::theme::ColorfulTheme;
use register_config::{Config, ConfigError, ConfigManager};
use register_core::CoreError;
use register_domain::Register;
use register_storage_json::JsonRegisterStorage;
use strsim::levenshtein;
use thiserror::Error;
use tracing::debug;

pub use crate::core::errors::CliError;
use crate::core::{errors::RegisterError, register_manager::RegisterManager};
use crate::utils::paths;

use super::commands;
use super::format::AmountFormatter;
use super::io as cli_io;
use super::output::{self, OutputPreferences};
use super::registry::CommandRegistry;
pub use super::shell_context::{CliMode, ShellContext};
use super::system_clock::SystemClock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    /// Context over the default data directory (`ASSET_REGISTER_HOME` or the
    /// configured register roots).
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let base = paths::app_data_dir();
        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;
        let storage = if paths::home_overridden() {
            JsonRegisterStorage::under_root(&base)?
        } else {
            JsonRegisterStorage::new(
                config.resolve_default_register_root(),
                config.resolve_default_backup_root(),
            )?
        };
        Self::assemble(mode, config_manager, config, storage)
    }

    /// Context keeping configuration and registers under `base`.
    pub fn in_data_dir(mode: CliMode, base: &Path) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base.to_path_buf())?;
        let config = config_manager.load()?;
        let storage = JsonRegisterStorage::under_root(base)?;
        Self::assemble(mode, config_manager, config, storage)
    }

    fn assemble(
        mode: CliMode,
        config_manager: ConfigManager,
        config: Config,
        storage: JsonRegisterStorage,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let mut app = ShellContext {
            mode,
            registry,
            register_manager: RegisterManager::new(Box::new(storage.clone())),
            storage,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            clock: Box::new(SystemClock),
            last_command: None,
            running: true,
        };
        app.apply_output_preferences();
        app.auto_load_last()?;
        Ok(app)
    }

    pub(crate) fn apply_output_preferences(&self) {
        cli_io::apply_config(&self.config);
        if self.mode == CliMode::Script {
            output::set_preferences(OutputPreferences {
                color_enabled: false,
                plain_mode: self.config.accessibility.plain_output,
            });
        }
    }

    fn auto_load_last(&mut self) -> Result<(), CliError> {
        if self.mode != CliMode::Interactive || self.has_register() {
            return Ok(());
        }
        let Some(name) = self.config.last_opened_register.clone() else {
            return Ok(());
        };
        match self.register_manager.load(&name) {
            Ok(report) => {
                self.report_load(&report.warnings);
                cli_io::print_success(format!("Automatically loaded last register `{name}`."));
            }
            Err(err) => debug!(register = %name, "last register not reloaded: {err}"),
        }
        Ok(())
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn update_last_opened(&mut self, name: Option<&str>) -> CommandResult {
        if self.config.last_opened_register.as_deref() == name {
            return Ok(());
        }
        self.config.last_opened_register = name.map(str::to_string);
        self.persist_config()
    }

    pub(crate) fn report_load(&self, warnings: &[String]) {
        for warning in warnings {
            cli_io::print_warning(warning);
        }
    }

    /// Reference date from an optional argument, today by default.
    pub(crate) fn as_of(&self, arg: Option<&str>) -> Result<NaiveDate, CommandError> {
        match arg {
            Some(value) => super::args::parse_date(value),
            None => Ok(self.clock.today()),
        }
    }

    pub(crate) fn amounts(&self) -> AmountFormatter {
        AmountFormatter::from_config(&self.config)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };
        let Some((first, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        self.dispatch(&first.to_lowercase(), first, &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(best) = self.closest_command(input) {
            cli_io::print_info(format!("Suggestion: `{best}`?"));
        }
    }

    pub(crate) fn closest_command(&self, input: &str) -> Option<&'static str> {
        let needle = input.to_lowercase();
        self.registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance)
            .filter(|(distance, _)| *distance <= 3)
            .map(|(_, name)| name)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).map_err(CliError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::RegisterNotLoaded => {
                self.print_error(&CommandError::RegisterNotLoaded.to_string());
                cli_io::print_hint("Try `register new Demo` or `register seed` to get started.");
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub(crate) fn with_register<T>(
        &self,
        f: impl FnOnce(&Register) -> Result<T, CommandError>,
    ) -> Result<T, CommandError> {
        self.register_manager.with_current(f)?
    }

    pub(crate) fn with_register_mut<T>(
        &mut self,
        f: impl FnOnce(&mut Register) -> Result<T, CommandError>,
    ) -> Result<T, CommandError> {
        self.register_manager.with_current_mut(f)?
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("No register loaded. Use `register new` or `register load` first.")]
    RegisterNotLoaded,
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Core(RegisterError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<RegisterError> for CommandError {
    fn from(err: RegisterError) -> Self {
        match err {
            RegisterError::RegisterNotLoaded => CommandError::RegisterNotLoaded,
            other => CommandError::Core(other),
        }
    }
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        CommandError::from(RegisterError::from(err))
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        CommandError::from(RegisterError::from(err))
    }
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::from(inner),
            CliError::Input(message) | CliError::Command(message) => {
                CommandError::InvalidArguments(message)
            }
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn process_script(base: &Path, lines: &[&str]) -> Result<ShellContext, CliError> {
    let mut app = ShellContext::in_data_dir(CliMode::Script, base)?;
    app.clock = Box::new(register_core::FixedClock::on(
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
    ));
    for line in lines {
        match app.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use register_domain::AssetStatus;
    use tempfile::tempdir;

    #[test]
    fn parse_line_handles_quotes() {
        let tokens = crate::cli::shell::parse_command_line(
            "location add code=SS label=\"SIEGE SOCIAL\"",
        )
        .unwrap();
        assert_eq!(tokens, vec!["location", "add", "code=SS", "label=SIEGE SOCIAL"]);
    }

    #[test]
    fn script_runner_creates_register() {
        let dir = tempdir().unwrap();
        let context = process_script(dir.path(), &["register new Head Office", "exit"]).unwrap();
        context
            .with_register(|register| {
                assert_eq!(register.name, "Head Office");
                assert!(register.assets.is_empty());
                Ok(())
            })
            .expect("register present");
    }

    #[test]
    fn building_a_register_from_the_shell() {
        let dir = tempdir().unwrap();
        let context = process_script(
            dir.path(),
            &[
                "register new Plant",
                "family add code=BI label=\"BUREAUTIQUE INFORMATIQUE\" method=lineaire years=3",
                "location add code=SS label=\"SIEGE SOCIAL\"",
                "asset add code=PC01 label=\"PORTABLE\" family=BI location=SS date=2022-06-30 value=1500",
                "refresh 2024-06-30",
            ],
        )
        .unwrap();

        context
            .with_register(|register| {
                let asset = register.asset("PC01").expect("asset");
                assert_eq!(asset.duration_years, 3);
                assert!((asset.accumulated_depreciation - 1000.0).abs() < 0.01);
                assert!((asset.net_book_value - 500.0).abs() < 0.01);
                assert_eq!(asset.status, AssetStatus::InService);
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn script_can_save_and_reload_by_name() {
        let dir = tempdir().unwrap();
        process_script(
            dir.path(),
            &["register new Demo", "register seed", "register save demo"],
        )
        .unwrap();
        assert!(dir.path().join("registers").join("demo.json").exists());

        let context = process_script(dir.path(), &["register load demo"]).unwrap();
        assert_eq!(context.register_name(), Some("demo"));
        assert_eq!(
            context.config.last_opened_register.as_deref(),
            Some("demo")
        );
        let assets = context
            .with_register(|register| Ok(register.assets.len()))
            .unwrap();
        assert_eq!(assets, 3);
    }

    #[test]
    fn commands_without_register_fail_cleanly() {
        let dir = tempdir().unwrap();
        let mut context = ShellContext::in_data_dir(CliMode::Script, dir.path()).unwrap();
        let err = context.process_line("asset list").unwrap_err();
        assert!(matches!(err, CommandError::RegisterNotLoaded));
    }

    #[test]
    fn unknown_commands_get_suggestions() {
        let dir = tempdir().unwrap();
        let mut context = ShellContext::in_data_dir(CliMode::Script, dir.path()).unwrap();
        assert_eq!(context.closest_command("shedule"), Some("schedule"));
        assert_eq!(context.closest_command("zzzzzzzzzz"), None);
        assert_eq!(
            context.process_line("shedule CHF02").unwrap(),
            LoopControl::Continue
        );
        assert_eq!(context.process_line("exit").unwrap(), LoopControl::Exit);
    }

    #[test]
    fn core_errors_surface_as_command_errors() {
        let err = CommandError::from(CoreError::RegisterNotLoaded);
        assert!(matches!(err, CommandError::RegisterNotLoaded));
        let err = CommandError::from(CoreError::AssetNotFound("X".into()));
        assert_eq!(err.to_string(), "Not found: asset `X`");
    }
}
