//! Register lifecycle: creation, persistence, sample data and backups.

use std::path::{Path, PathBuf};

use register_core::RegisterService;

use crate::cli::commands::{split_subcommand, usage_error};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::format::format_date;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::core::register_manager::LoadMetadata;

const USAGE: &str =
    "register <new <name>|load <name|path>|save [name|path]|rename <name>|seed|backup [note]|backups|restore <backup>|info|list>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "register",
        "Create, open, save and back up asset registers",
        USAGE,
        cmd_register,
    )
    .with_subcommands(&[
        "new", "load", "save", "rename", "seed", "backup", "backups", "restore", "info", "list",
    ])]
}

fn cmd_register(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (subcommand, rest) = split_subcommand(args, USAGE)?;
    match subcommand.as_str() {
        "new" => handle_new(context, rest),
        "load" | "open" => handle_load(context, rest),
        "save" => handle_save(context, rest),
        "rename" => handle_rename(context, rest),
        "seed" => handle_seed(context),
        "backup" => handle_backup(context, rest),
        "backups" | "list-backups" => handle_list_backups(context),
        "restore" => handle_restore(context, rest),
        "info" => handle_info(context),
        "list" => handle_list(context),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown register subcommand `{other}`. Available: new, load, save, rename, seed, backup, backups, restore, info, list"
        ))),
    }
}

/// Explicit file paths are told apart from store names by a separator or
/// a `.json` extension.
fn is_path(arg: &str) -> bool {
    arg.contains('/') || arg.contains('\\') || arg.to_ascii_lowercase().ends_with(".json")
}

fn handle_new(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = args.join(" ");
    if name.trim().is_empty() {
        return Err(usage_error("register new <name>"));
    }
    let register = RegisterService::create(name.trim());
    context.register_manager.set_current(register, None, None);
    io::print_success(format!("Register `{}` created.", name.trim()));
    io::print_info("Use `register seed` for sample data or `register save <name>` to store it.");
    Ok(())
}

fn handle_load(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let target = args
        .first()
        .ok_or_else(|| usage_error("register load <name|path>"))?;
    if is_path(target) {
        let path = PathBuf::from(target);
        let report = context.register_manager.load_from_path(&path)?;
        announce_load(context, &report, &path.display().to_string());
        context.update_last_opened(None)
    } else {
        let report = context.register_manager.load(target)?;
        let name = report.name.clone().unwrap_or_else(|| target.to_string());
        announce_load(context, &report, &name);
        context.update_last_opened(Some(&name))
    }
}

fn announce_load(context: &ShellContext, report: &LoadMetadata, source: &str) {
    context.report_load(&report.warnings);
    let assets = context
        .register_manager
        .with_current(|register| register.assets.len())
        .unwrap_or_default();
    io::print_success(format!("Loaded `{source}` ({assets} assets)."));
}

fn handle_save(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first() {
        Some(target) if is_path(target) => {
            let path = PathBuf::from(target);
            context.register_manager.save_to_path(&path)?;
            io::print_success(format!("Register saved to {}.", path.display()));
            context.update_last_opened(None)
        }
        Some(name) => {
            let slug = context.register_manager.save_as(name)?;
            io::print_success(format!(
                "Register saved as `{slug}` ({}).",
                context.storage.register_path(&slug).display()
            ));
            context.update_last_opened(Some(&slug))
        }
        None => {
            let saved_to = context.register_manager.save()?;
            match (context.register_name(), saved_to) {
                (Some(name), _) => io::print_success(format!("Register `{name}` saved.")),
                (None, Some(path)) => {
                    io::print_success(format!("Register saved to {}.", path.display()))
                }
                (None, None) => io::print_success("Register saved."),
            }
            Ok(())
        }
    }
}

fn handle_rename(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = args.join(" ");
    context.with_register_mut(|register| {
        RegisterService::rename(register, name.as_str())?;
        Ok(())
    })?;
    io::print_success(format!("Register renamed to `{}`.", name.trim()));
    Ok(())
}

fn handle_seed(context: &mut ShellContext) -> CommandResult {
    let seeded = context.with_register_mut(|register| Ok(RegisterService::seed_sample(register)))?;
    if seeded {
        io::print_success("Sample families, locations, account codes and assets added.");
    } else {
        io::print_warning("Register already has families; sample data not added.");
    }
    Ok(())
}

fn handle_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = (!args.is_empty()).then(|| args.join(" "));
    let backup = context.register_manager.backup(note.as_deref())?;
    io::print_success(format!("Backup created: {}", backup.id));
    Ok(())
}

fn handle_list_backups(context: &mut ShellContext) -> CommandResult {
    let name = context
        .register_name()
        .map(str::to_string)
        .ok_or_else(|| {
            CommandError::InvalidArguments(
                "The active register has no name. Use `register save <name>` first.".into(),
            )
        })?;
    let backups = context.storage.list_backup_metadata(&name)?;
    if backups.is_empty() {
        io::print_warning("No backups found.");
        return Ok(());
    }

    output_section(format!("Backups of `{name}`"));
    let mut table = Table::new(vec![
        TableColumn::right("#"),
        TableColumn::left("NAME"),
        TableColumn::left("CREATED"),
        TableColumn::right("SIZE"),
    ]);
    for (index, backup) in backups.iter().enumerate() {
        table.push(vec![
            (index + 1).to_string(),
            backup.name.clone(),
            backup
                .created_at
                .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".into()),
            format_size(backup.size_bytes),
        ]);
    }
    println!("{}", table.render());
    Ok(())
}

fn handle_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let reference = args
        .first()
        .ok_or_else(|| usage_error("register restore <backup name|#>"))?;
    let report = context.register_manager.restore_backup(reference)?;
    context.report_load(&report.warnings);
    io::print_success(format!(
        "Backup `{reference}` restored. Use `register save` to make it current on disk."
    ));
    Ok(())
}

fn handle_info(context: &mut ShellContext) -> CommandResult {
    let summary = context.with_register(|register| Ok(RegisterService::summary(register)))?;
    let amounts = context.amounts();
    output_section(format!("Register: {}", summary.name));
    if let Some(name) = context.register_name() {
        io::print_info(format!("  Stored as      : {name}"));
    }
    if let Some(path) = context.register_manager.current_path() {
        io::print_info(format!("  File           : {}", display_path(path)));
    }
    io::print_info(format!("  Families       : {}", summary.families));
    io::print_info(format!("  Locations      : {}", summary.locations));
    io::print_info(format!("  Account codes  : {}", summary.account_codes));
    io::print_info(format!(
        "  Assets         : {} ({} fully depreciated)",
        summary.assets, summary.fully_depreciated
    ));
    io::print_info(format!(
        "  Original value : {}",
        amounts.money(summary.total_original_value)
    ));
    io::print_info(format!(
        "  Net book value : {}",
        amounts.money(summary.total_net_book_value)
    ));
    Ok(())
}

fn handle_list(context: &mut ShellContext) -> CommandResult {
    let registers = context.storage.list_register_metadata()?;
    if registers.is_empty() {
        io::print_warning("No stored registers.");
        return Ok(());
    }
    let amounts = context.amounts();
    let mut table = Table::new(vec![
        TableColumn::left("NAME"),
        TableColumn::left("TITLE").max(32),
        TableColumn::right("ASSETS"),
        TableColumn::right("NET BOOK VALUE"),
        TableColumn::left("UPDATED"),
    ]);
    for entry in registers {
        table.push(vec![
            entry.slug,
            entry.name,
            entry.asset_count.to_string(),
            amounts.number(entry.total_net_book_value),
            format_date(entry.updated_at.date_naive()),
        ]);
    }
    println!("{}", table.render());
    Ok(())
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

fn format_size(bytes: u64) -> String {
    match bytes {
        b if b >= 1024 * 1024 => format!("{:.1} MB", b as f64 / (1024.0 * 1024.0)),
        b if b >= 1024 => format!("{:.1} KB", b as f64 / 1024.0),
        b => format!("{b} B"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_told_apart_from_names() {
        assert!(is_path("exports/plant.json"));
        assert!(is_path("Plant.JSON"));
        assert!(!is_path("head_office"));
    }

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
    }
}
