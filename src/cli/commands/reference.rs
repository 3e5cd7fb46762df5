//! Reference data: asset families, locations and account codes.

use register_core::{AccountCodeService, FamilyService, LocationService};
use register_domain::{AccountCode, DepreciationMethod, Family, Location};

use crate::cli::args::{parse_method, parse_years, Options};
use crate::cli::commands::{split_subcommand, usage_error};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};

const FAMILY_USAGE: &str = "family <add code=.. label=.. [method=lineaire|degressif|aucun] [years=N] [months=N]|edit <code> key=value..|remove <code>|list>";
const LOCATION_USAGE: &str =
    "location <add code=.. label=..|edit <code> key=value..|remove <code>|list>";
const ACCOUNT_USAGE: &str = "account <add code=.. label=.. depreciation=.. charge=..|edit <code> key=value..|remove <code>|list>";

const CRUD: &[&str] = &["add", "edit", "remove", "list"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "family",
            "Manage asset families and their default plan",
            FAMILY_USAGE,
            cmd_family,
        )
        .with_subcommands(CRUD),
        CommandEntry::new("location", "Manage asset locations", LOCATION_USAGE, cmd_location)
            .with_subcommands(CRUD),
        CommandEntry::new(
            "account",
            "Manage accounting codes",
            ACCOUNT_USAGE,
            cmd_account,
        )
        .with_subcommands(CRUD),
    ]
}

/// `<subcommand> <code> key=value..` target of edit and remove.
fn target_code<'a>(args: &[&'a str], usage: &str) -> Result<(&'a str, Options), CommandError> {
    let (code, rest) = args.split_first().ok_or_else(|| usage_error(usage))?;
    Ok((*code, Options::parse(rest)?))
}

fn cmd_family(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const KEYS: &[&str] = &["code", "label", "method", "years", "months"];
    let (subcommand, rest) = split_subcommand(args, FAMILY_USAGE)?;
    match subcommand.as_str() {
        "add" => {
            let options = Options::parse(rest)?;
            options.ensure_known(KEYS)?;
            let method = options
                .get("method")
                .map(parse_method)
                .transpose()?
                .unwrap_or_default();
            let years = match options.get("years") {
                Some(value) => parse_years(value)?,
                None if method == DepreciationMethod::None => 0,
                None => return Err(CommandError::InvalidArguments("missing option `years=...`".into())),
            };
            let mut family = Family::new(
                options.require(&["code"])?,
                options.require(&["label"])?,
                method,
                years,
            );
            if let Some(months) = options.get("months") {
                family.duration_months = parse_months(months)?;
            }
            let code = family.code.trim().to_string();
            context.with_register_mut(|register| {
                FamilyService::add(register, family)?;
                Ok(())
            })?;
            io::print_success(format!("Family `{code}` added."));
            Ok(())
        }
        "edit" => {
            let (code, options) = target_code(rest, "family edit <code> key=value..")?;
            options.ensure_known(KEYS)?;
            context.with_register_mut(|register| {
                let mut changes = register
                    .family(code)
                    .cloned()
                    .ok_or_else(|| register_core::CoreError::FamilyNotFound(code.to_string()))?;
                if let Some(value) = options.get("code") {
                    changes.code = value.to_string();
                }
                if let Some(value) = options.get("label") {
                    changes.label = value.to_string();
                }
                if let Some(value) = options.get("method") {
                    changes.method = parse_method(value)?;
                }
                if let Some(value) = options.get("years") {
                    changes.duration_years = parse_years(value)?;
                }
                if let Some(value) = options.get("months") {
                    changes.duration_months = parse_months(value)?;
                }
                FamilyService::edit(register, code, changes)?;
                Ok(())
            })?;
            io::print_success(format!("Family `{code}` updated."));
            Ok(())
        }
        "remove" => {
            let (code, _) = target_code(rest, "family remove <code>")?;
            context.with_register_mut(|register| Ok(FamilyService::remove(register, code)?))?;
            io::print_success(format!("Family `{code}` removed."));
            Ok(())
        }
        "list" => context.with_register(|register| {
            let families = FamilyService::list(register);
            if families.is_empty() {
                io::print_warning("No families defined.");
                return Ok(());
            }
            let mut table = Table::new(vec![
                TableColumn::left("CODE"),
                TableColumn::left("LABEL").max(32),
                TableColumn::left("METHOD"),
                TableColumn::right("YEARS"),
                TableColumn::right("ASSETS"),
            ]);
            for family in families {
                let assets = register
                    .assets
                    .iter()
                    .filter(|asset| asset.family_code.eq_ignore_ascii_case(&family.code))
                    .count();
                table.push(vec![
                    family.code.clone(),
                    family.label.clone(),
                    family.method.to_string(),
                    family.duration_years.to_string(),
                    assets.to_string(),
                ]);
            }
            println!("{}", table.render());
            Ok(())
        }),
        other => Err(unknown_subcommand("family", other)),
    }
}

fn cmd_location(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const KEYS: &[&str] = &["code", "label"];
    let (subcommand, rest) = split_subcommand(args, LOCATION_USAGE)?;
    match subcommand.as_str() {
        "add" => {
            let options = Options::parse(rest)?;
            options.ensure_known(KEYS)?;
            let location = Location::new(options.require(&["code"])?, options.require(&["label"])?);
            let code = location.code.trim().to_string();
            context.with_register_mut(|register| {
                LocationService::add(register, location)?;
                Ok(())
            })?;
            io::print_success(format!("Location `{code}` added."));
            Ok(())
        }
        "edit" => {
            let (code, options) = target_code(rest, "location edit <code> key=value..")?;
            options.ensure_known(KEYS)?;
            context.with_register_mut(|register| {
                let mut changes = register
                    .location(code)
                    .cloned()
                    .ok_or_else(|| register_core::CoreError::LocationNotFound(code.to_string()))?;
                if let Some(value) = options.get("code") {
                    changes.code = value.to_string();
                }
                if let Some(value) = options.get("label") {
                    changes.label = value.to_string();
                }
                LocationService::edit(register, code, changes)?;
                Ok(())
            })?;
            io::print_success(format!("Location `{code}` updated."));
            Ok(())
        }
        "remove" => {
            let (code, _) = target_code(rest, "location remove <code>")?;
            context.with_register_mut(|register| Ok(LocationService::remove(register, code)?))?;
            io::print_success(format!("Location `{code}` removed."));
            Ok(())
        }
        "list" => context.with_register(|register| {
            let locations = LocationService::list(register);
            if locations.is_empty() {
                io::print_warning("No locations defined.");
                return Ok(());
            }
            let mut table = Table::new(vec![TableColumn::left("CODE"), TableColumn::left("LABEL")]);
            for location in locations {
                table.push(vec![location.code.clone(), location.label.clone()]);
            }
            println!("{}", table.render());
            Ok(())
        }),
        other => Err(unknown_subcommand("location", other)),
    }
}

fn cmd_account(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    const KEYS: &[&str] = &["code", "label", "depreciation", "charge"];
    let (subcommand, rest) = split_subcommand(args, ACCOUNT_USAGE)?;
    match subcommand.as_str() {
        "add" => {
            let options = Options::parse(rest)?;
            options.ensure_known(KEYS)?;
            let account = AccountCode::new(
                options.require(&["code"])?,
                options.require(&["label"])?,
                options.get("depreciation").unwrap_or_default(),
                options.get("charge").unwrap_or_default(),
            );
            let code = account.code.trim().to_string();
            context.with_register_mut(|register| {
                AccountCodeService::add(register, account)?;
                Ok(())
            })?;
            io::print_success(format!("Account code `{code}` added."));
            Ok(())
        }
        "edit" => {
            let (code, options) = target_code(rest, "account edit <code> key=value..")?;
            options.ensure_known(KEYS)?;
            context.with_register_mut(|register| {
                let mut changes = register.account_code(code).cloned().ok_or_else(|| {
                    register_core::CoreError::AccountCodeNotFound(code.to_string())
                })?;
                if let Some(value) = options.get("code") {
                    changes.code = value.to_string();
                }
                if let Some(value) = options.get("label") {
                    changes.label = value.to_string();
                }
                if let Some(value) = options.get("depreciation") {
                    changes.depreciation_account = value.to_string();
                }
                if let Some(value) = options.get("charge") {
                    changes.charge_account = value.to_string();
                }
                AccountCodeService::edit(register, code, changes)?;
                Ok(())
            })?;
            io::print_success(format!("Account code `{code}` updated."));
            Ok(())
        }
        "remove" => {
            let (code, _) = target_code(rest, "account remove <code>")?;
            context
                .with_register_mut(|register| Ok(AccountCodeService::remove(register, code)?))?;
            io::print_success(format!("Account code `{code}` removed."));
            Ok(())
        }
        "list" => context.with_register(|register| {
            let accounts = AccountCodeService::list(register);
            if accounts.is_empty() {
                io::print_warning("No account codes defined.");
                return Ok(());
            }
            let mut table = Table::new(vec![
                TableColumn::left("CODE"),
                TableColumn::left("LABEL").max(32),
                TableColumn::left("DEPRECIATION"),
                TableColumn::left("CHARGE"),
            ]);
            for account in accounts {
                table.push(vec![
                    account.code.clone(),
                    account.label.clone(),
                    account.depreciation_account.clone(),
                    account.charge_account.clone(),
                ]);
            }
            println!("{}", table.render());
            Ok(())
        }),
        other => Err(unknown_subcommand("account", other)),
    }
}

fn parse_months(value: &str) -> Result<u32, CommandError> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|months| *months < 12)
        .ok_or_else(|| CommandError::InvalidArguments(format!("invalid months `{value}` (0-11)")))
}

fn unknown_subcommand(command: &str, other: &str) -> CommandError {
    CommandError::InvalidArguments(format!(
        "unknown {command} subcommand `{other}`. Available: {}",
        CRUD.join(", ")
    ))
}
