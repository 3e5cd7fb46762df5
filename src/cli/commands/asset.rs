//! Asset records: creation, edits, listings and detail views.

use register_core::{round_cents, AssetDraft, AssetFilter, AssetService, CoreError};
use register_domain::Asset;

use crate::cli::args::{
    parse_amount, parse_date, parse_method, parse_status, parse_years, take_flag, Options,
};
use crate::cli::commands::{split_subcommand, usage_error};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::format::{format_date, AmountFormatter};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};

const USAGE: &str = "asset <add code=.. label=.. family=.. location=.. date=.. value=.. [method=..] [years=..]|edit <code> key=value..|remove <code> [--yes]|list [family=..] [location=..] [status=..]|show <code> [as-of]>";

const FIELDS: &[&str] = &[
    "code", "label", "family", "location", "date", "value", "method", "years",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "asset",
        "Record, edit and inspect fixed assets",
        USAGE,
        cmd_asset,
    )
    .with_subcommands(&["add", "edit", "remove", "list", "show"])]
}

fn cmd_asset(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (subcommand, rest) = split_subcommand(args, USAGE)?;
    match subcommand.as_str() {
        "add" => handle_add(context, rest),
        "edit" => handle_edit(context, rest),
        "remove" | "delete" => handle_remove(context, rest),
        "list" => handle_list(context, rest),
        "show" => handle_show(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown asset subcommand `{other}`. Available: add, edit, remove, list, show"
        ))),
    }
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let options = Options::parse(args)?;
    options.ensure_known(FIELDS)?;
    let draft = AssetDraft {
        code: options.require(&["code"])?.to_string(),
        label: options.require(&["label"])?.to_string(),
        family_code: options.require(&["family"])?.to_string(),
        location_code: options.require(&["location"])?.to_string(),
        acquisition_date: parse_date(options.require(&["date"])?)?,
        original_value: parse_amount(options.require(&["value"])?)?,
        method: options.get("method").map(parse_method).transpose()?,
        duration_years: options.get("years").map(parse_years).transpose()?,
    };
    let as_of = context.as_of(None)?;
    let code = context.with_register_mut(|register| {
        let id = AssetService::add(register, draft, as_of)?;
        Ok(register
            .asset_by_id(id)
            .map(|asset| asset.code.clone())
            .unwrap_or_default())
    })?;
    io::print_success(format!("Asset `{code}` added."));
    Ok(())
}

fn handle_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (code, rest) = args
        .split_first()
        .ok_or_else(|| usage_error("asset edit <code> key=value.."))?;
    let options = Options::parse(rest)?;
    options.ensure_known(FIELDS)?;
    if options.is_empty() {
        return Err(usage_error("asset edit <code> key=value.."));
    }
    let as_of = context.as_of(None)?;
    context.with_register_mut(|register| {
        let asset = register
            .asset(code)
            .ok_or_else(|| CoreError::AssetNotFound(code.to_string()))?;
        let mut draft = AssetDraft::from_asset(asset);
        apply_changes(&mut draft, &options)?;
        AssetService::edit(register, code, draft, as_of)?;
        Ok(())
    })?;
    io::print_success(format!("Asset `{code}` updated."));
    Ok(())
}

fn apply_changes(draft: &mut AssetDraft, options: &Options) -> Result<(), CommandError> {
    if let Some(value) = options.get("code") {
        draft.code = value.to_string();
    }
    if let Some(value) = options.get("label") {
        draft.label = value.to_string();
    }
    if let Some(value) = options.get("family") {
        draft.family_code = value.to_string();
    }
    if let Some(value) = options.get("location") {
        draft.location_code = value.to_string();
    }
    if let Some(value) = options.get("date") {
        draft.acquisition_date = parse_date(value)?;
    }
    if let Some(value) = options.get("value") {
        draft.original_value = parse_amount(value)?;
    }
    if let Some(value) = options.get("method") {
        draft.method = Some(parse_method(value)?);
    }
    if let Some(value) = options.get("years") {
        draft.duration_years = Some(parse_years(value)?);
    }
    Ok(())
}

fn handle_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (args, confirmed) = take_flag(args, "--yes");
    let code = args
        .first()
        .copied()
        .ok_or_else(|| usage_error("asset remove <code> [--yes]"))?;
    context.with_register(|register| {
        register
            .asset(code)
            .map(|_| ())
            .ok_or_else(|| CoreError::AssetNotFound(code.to_string()).into())
    })?;
    if !confirmed
        && context.can_prompt()
        && !io::confirm_action(&context.theme, &format!("Remove asset `{code}`?"), false)?
    {
        io::print_info("Removal cancelled.");
        return Ok(());
    }
    let removed = context.with_register_mut(|register| Ok(AssetService::remove(register, code)?))?;
    io::print_success(format!("Asset `{}` removed.", removed.code));
    Ok(())
}

fn handle_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let options = Options::parse(args)?;
    options.ensure_known(&["family", "location", "status"])?;
    let filter = AssetFilter {
        family_code: options.get("family").map(str::to_string),
        location_code: options.get("location").map(str::to_string),
        status: options.get("status").map(parse_status).transpose()?,
    };
    let amounts = context.amounts();
    context.with_register(|register| {
        let assets = AssetService::list_filtered(register, &filter);
        if assets.is_empty() {
            io::print_warning("No assets match.");
            return Ok(());
        }
        println!("{}", asset_table(&assets, &amounts).render());
        Ok(())
    })
}

/// Listing of stored snapshots with a totals line.
fn asset_table(assets: &[&Asset], amounts: &AmountFormatter) -> Table {
    let mut table = Table::new(vec![
        TableColumn::left("CODE"),
        TableColumn::left("LABEL").max(28),
        TableColumn::left("FAMILY"),
        TableColumn::left("LOC"),
        TableColumn::left("ACQUIRED"),
        TableColumn::left("M"),
        TableColumn::right("VALUE"),
        TableColumn::right("NET BOOK VALUE"),
        TableColumn::left("STATUS"),
    ]);
    for asset in assets {
        table.push(vec![
            asset.code.clone(),
            asset.label.clone(),
            asset.family_code.clone(),
            asset.location_code.clone(),
            format_date(asset.acquisition_date),
            asset.method.initial().to_string(),
            amounts.number(asset.original_value),
            amounts.number(asset.net_book_value),
            asset.status.to_string(),
        ]);
    }
    let original: f64 = assets.iter().map(|asset| asset.original_value).sum();
    let net: f64 = assets.iter().map(|asset| asset.net_book_value).sum();
    table.with_footer(vec![
        format!("{} assets", assets.len()),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        amounts.number(round_cents(original)),
        amounts.number(round_cents(net)),
        String::new(),
    ])
}

fn handle_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let code = args
        .first()
        .copied()
        .ok_or_else(|| usage_error("asset show <code> [as-of]"))?;
    let as_of = context.as_of(args.get(1).copied())?;
    let amounts = context.amounts();
    context.with_register(|register| {
        let asset = register
            .asset(code)
            .ok_or_else(|| CoreError::AssetNotFound(code.to_string()))?;
        let valuation = AssetService::valuation(asset, as_of)?;
        output_section(format!("{} - {}", asset.code, asset.label));
        io::print_info(format!("  Family         : {}", asset.family_code));
        io::print_info(format!("  Location       : {}", asset.location_code));
        io::print_info(format!(
            "  Acquired       : {}",
            format_date(asset.acquisition_date)
        ));
        io::print_info(format!(
            "  Plan           : {} over {} years ({})",
            asset.method,
            asset.duration_years,
            amounts.percent(asset.rate_percent())
        ));
        io::print_info(format!(
            "  Original value : {}",
            amounts.money(asset.original_value)
        ));
        io::print_info(format!("  Valued on      : {}", format_date(as_of)));
        io::print_info(format!(
            "  Depreciation   : {}",
            amounts.money(valuation.accumulated_depreciation)
        ));
        io::print_info(format!(
            "  Net book value : {}",
            amounts.money(valuation.net_book_value)
        ));
        io::print_info(format!("  Status         : {}", valuation.status));
        if (valuation.net_book_value - asset.net_book_value).abs() >= 0.005 {
            io::print_hint("Stored snapshot differs; run `refresh` to update it.");
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use crate::cli::core::process_script;
    use register_domain::{AssetStatus, DepreciationMethod};
    use tempfile::tempdir;

    #[test]
    fn add_values_asset_on_clock_date() {
        let dir = tempdir().unwrap();
        let context = process_script(
            dir.path(),
            &[
                "register new Plant",
                "register seed",
                "asset add code=215500 label=\"PRESSE\" family=MI location=U1 date=30/06/2022 value=\"10 000,00\"",
            ],
        )
        .unwrap();

        context
            .with_register(|register| {
                let asset = register.asset("215500").expect("asset");
                assert_eq!(asset.method, DepreciationMethod::DecliningBalance);
                assert_eq!(asset.duration_years, 5);
                // Valued on 2024-06-30: 3 500 then 35% of 6 500.
                assert!((asset.accumulated_depreciation - 5_775.0).abs() < 0.01);
                assert_eq!(asset.status, AssetStatus::InService);
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn edit_overrides_plan_and_revalues() {
        let dir = tempdir().unwrap();
        let context = process_script(
            dir.path(),
            &[
                "register new Plant",
                "register seed",
                "asset edit 218200 years=2 label=\"UTILITAIRE\"",
            ],
        )
        .unwrap();

        context
            .with_register(|register| {
                let asset = register.asset("218200").expect("asset");
                assert_eq!(asset.label, "UTILITAIRE");
                assert_eq!(asset.duration_years, 2);
                assert_eq!(asset.net_book_value, 0.0);
                assert_eq!(asset.status, AssetStatus::FullyDepreciated);
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn remove_in_script_mode_needs_no_prompt() {
        let dir = tempdir().unwrap();
        let context = process_script(
            dir.path(),
            &["register new Plant", "register seed", "asset remove CHF02"],
        )
        .unwrap();
        let remaining = context
            .with_register(|register| Ok(register.assets.len()))
            .unwrap();
        assert_eq!(remaining, 2);
    }

    #[test]
    fn unknown_asset_is_reported() {
        let dir = tempdir().unwrap();
        let err = process_script(
            dir.path(),
            &["register new Plant", "asset show NOPE"],
        )
        .err()
        .expect("missing asset");
        assert!(err.to_string().contains("asset `NOPE`"), "unexpected: {err}");
    }
}
