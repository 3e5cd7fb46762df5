use dialoguer::Select;
use register_config::Config;

use crate::cli::commands::usage_error;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

const USAGE: &str = "config [show|set <key> <value>|backup [note]|backups|restore [name|#]]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and manage global preferences",
        USAGE,
        cmd_config,
    )
    .with_subcommands(&["show", "set", "backup", "backups", "restore"])]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((subcommand, rest)) = args.split_first() else {
        return show_config(context);
    };
    match subcommand.to_ascii_lowercase().as_str() {
        "show" => show_config(context),
        "set" => {
            let (key, value) = rest.split_first().ok_or_else(set_usage)?;
            if value.is_empty() {
                return Err(set_usage());
            }
            context.config.set(key, &value.join(" "))?;
            context.persist_config()?;
            context.apply_output_preferences();
            io::print_success(format!("`{}` updated.", key.to_ascii_lowercase()));
            Ok(())
        }
        "backup" => {
            let note = (!rest.is_empty()).then(|| rest.join(" "));
            let name = context
                .config_manager
                .backup(&context.config, note.as_deref())?;
            io::print_success(format!("Configuration backup created: {name}"));
            Ok(())
        }
        "backups" => {
            let backups = context.config_manager.list_backups()?;
            if backups.is_empty() {
                io::print_warning("No configuration backups found.");
                return Ok(());
            }
            output_section("Configuration backups");
            for (index, name) in backups.iter().enumerate() {
                io::print_info(format!("  {:>2}. {name}", index + 1));
            }
            Ok(())
        }
        "restore" => {
            let name = match rest.first() {
                Some(reference) => resolve_backup(context, reference)?,
                None if context.can_prompt() => match select_backup(context)? {
                    Some(name) => name,
                    None => {
                        io::print_info("Operation cancelled.");
                        return Ok(());
                    }
                },
                None => return Err(usage_error("config restore <name|#>")),
            };
            restore_config(context, &name)
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config subcommand `{other}`. usage: {USAGE}"
        ))),
    }
}

fn set_usage() -> CommandError {
    CommandError::InvalidArguments(format!(
        "usage: config set <key> <value> (keys: {})",
        Config::SETTABLE_KEYS.join(", ")
    ))
}

fn show_config(context: &ShellContext) -> CommandResult {
    let config = &context.config;
    let optional = |value: Option<String>| value.unwrap_or_else(|| "-".into());
    output_section("Configuration");
    io::print_info(format!(
        "  File                : {}",
        context.config_manager.config_path().display()
    ));
    io::print_info(format!("  locale              : {}", config.locale));
    io::print_info(format!("  currency            : {}", config.currency));
    io::print_info(format!(
        "  currency_precision  : {}",
        optional(config.currency_precision.map(|digits| digits.to_string()))
    ));
    io::print_info(format!("  ui_color_enabled    : {}", config.ui_color_enabled));
    io::print_info(format!(
        "  plain_output        : {}",
        config.accessibility.plain_output
    ));
    io::print_info(format!("  csv_delimiter       : {}", config.csv_delimiter));
    io::print_info(format!(
        "  register_root       : {}",
        config.resolve_default_register_root().display()
    ));
    io::print_info(format!(
        "  backup_root         : {}",
        config.resolve_default_backup_root().display()
    ));
    io::print_info(format!(
        "  last_opened         : {}",
        optional(config.last_opened_register.clone())
    ));
    Ok(())
}

/// Accepts a backup file name or its 1-based position in `config backups`.
fn resolve_backup(context: &ShellContext, reference: &str) -> Result<String, CommandError> {
    match reference.parse::<usize>() {
        Ok(position) => {
            let backups = context.config_manager.list_backups()?;
            position
                .checked_sub(1)
                .and_then(|index| backups.get(index))
                .cloned()
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!(
                        "no configuration backup at position {position}"
                    ))
                })
        }
        Err(_) => Ok(reference.to_string()),
    }
}

fn select_backup(context: &ShellContext) -> Result<Option<String>, CommandError> {
    let backups = context.config_manager.list_backups()?;
    if backups.is_empty() {
        io::print_warning("No configuration backups found.");
        return Ok(None);
    }
    let choice = Select::with_theme(&context.theme)
        .with_prompt("Select configuration backup")
        .items(&backups)
        .default(0)
        .interact_opt()?;
    Ok(choice.and_then(|index| backups.get(index).cloned()))
}

fn restore_config(context: &mut ShellContext, name: &str) -> CommandResult {
    let restored = context.config_manager.restore(name)?;
    context.config = restored;
    context.persist_config()?;
    context.apply_output_preferences();
    io::print_success(format!("Configuration restored from `{name}`."));
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli::core::process_script;
    use tempfile::tempdir;

    #[test]
    fn set_persists_and_restore_brings_values_back() {
        let dir = tempdir().unwrap();
        let context = process_script(
            dir.path(),
            &[
                "config set currency chf",
                "config backup before locale",
                "config set locale fr-FR",
                "config set csv_delimiter ,",
            ],
        )
        .unwrap();
        assert_eq!(context.config.currency, "CHF");
        assert_eq!(context.config.csv_delimiter, ',');
        assert_eq!(context.config.locale, "fr-FR");

        let context = process_script(dir.path(), &["config restore 1"]).unwrap();
        assert_eq!(context.config.currency, "CHF");
        assert_eq!(context.config.csv_delimiter, ';');
        let saved = context.config_manager.load().unwrap();
        assert_eq!(saved.csv_delimiter, ';');
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let err = process_script(dir.path(), &["config set theme dark"])
            .err()
            .expect("unknown key");
        assert!(err.to_string().contains("theme"), "unexpected: {err}");
    }
}
