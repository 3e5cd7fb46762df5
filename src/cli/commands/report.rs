//! Charges and inventory reports, on screen or as CSV files.

use std::path::PathBuf;

use register_core::{AssetFilter, ChargesReport, InventoryReport, ReportService};

use crate::cli::args::{parse_status, parse_year, split_options, take_flag_value, Options};
use crate::cli::commands::{split_subcommand, usage_error};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::format::{format_date, AmountFormatter};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::reports::{self, CHARGES_FILE_NAME, INVENTORY_FILE_NAME};

const USAGE: &str = "report <charges <year> [as-of]|inventory [as-of] [family=..] [location=..] [status=..]> [--csv [path]]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "report",
        "Yearly depreciation charges and asset inventory",
        USAGE,
        cmd_report,
    )
    .with_subcommands(&["charges", "inventory"])]
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (subcommand, rest) = split_subcommand(args, USAGE)?;
    let (rest, csv) = take_flag_value(rest, "--csv");
    match subcommand.as_str() {
        "charges" | "dotations" => handle_charges(context, &rest, csv),
        "inventory" | "inventaire" => handle_inventory(context, &rest, csv),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown report `{other}`. Available: charges, inventory"
        ))),
    }
}

fn handle_charges(
    context: &mut ShellContext,
    args: &[&str],
    csv: Option<Option<&str>>,
) -> CommandResult {
    let year = parse_year(
        args.first()
            .copied()
            .ok_or_else(|| usage_error("report charges <year> [as-of] [--csv [path]]"))?,
    )?;
    let as_of = context.as_of(args.get(1).copied())?;
    let report =
        context.with_register(|register| Ok(ReportService::charges_for_year(register, year, as_of)?))?;

    if let Some(target) = csv {
        let path = PathBuf::from(target.unwrap_or(CHARGES_FILE_NAME));
        reports::export_charges(&path, &report, context.config.csv_delimiter)?;
        io::print_success(format!(
            "{} rows exported to {}.",
            report.rows.len(),
            path.display()
        ));
        return Ok(());
    }

    render_charges(&report, &context.amounts());
    Ok(())
}

fn render_charges(report: &ChargesReport, amounts: &AmountFormatter) {
    output_section(format!(
        "Depreciation charges {} (as of {})",
        report.year,
        format_date(report.as_of)
    ));
    if report.rows.is_empty() {
        io::print_warning("No depreciation charged in this year.");
        return;
    }
    let mut table = Table::new(vec![
        TableColumn::left("CODE"),
        TableColumn::left("LABEL").max(28),
        TableColumn::left("FAMILY"),
        TableColumn::right("RATE"),
        TableColumn::right("VALUE"),
        TableColumn::right("CHARGE"),
        TableColumn::right("CUMULATIVE"),
        TableColumn::right("NET BOOK VALUE"),
    ]);
    for row in &report.rows {
        table.push(vec![
            row.code.clone(),
            row.label.clone(),
            row.family_code.clone(),
            amounts.percent(row.rate_percent),
            amounts.number(row.original_value),
            amounts.number(row.annual_depreciation),
            amounts.number(row.cumulative_depreciation),
            amounts.number(row.net_book_value),
        ]);
    }
    let table = table.with_footer(vec![
        "TOTAL".into(),
        String::new(),
        String::new(),
        String::new(),
        amounts.number(report.total_original_value),
        amounts.number(report.total_depreciation),
        String::new(),
        amounts.number(report.total_net_book_value),
    ]);
    println!("{}", table.render());
}

fn handle_inventory(
    context: &mut ShellContext,
    args: &[&str],
    csv: Option<Option<&str>>,
) -> CommandResult {
    let (positional, option_args) = split_options(args);
    let options = Options::parse(&option_args)?;
    options.ensure_known(&["family", "location", "status"])?;
    let filter = AssetFilter {
        family_code: options.get("family").map(str::to_string),
        location_code: options.get("location").map(str::to_string),
        status: options.get("status").map(parse_status).transpose()?,
    };
    let as_of = context.as_of(positional.first().copied())?;
    let report = context
        .with_register(|register| Ok(ReportService::inventory(register, &filter, as_of)?))?;

    if let Some(target) = csv {
        let path = PathBuf::from(target.unwrap_or(INVENTORY_FILE_NAME));
        reports::export_inventory(&path, &report, context.config.csv_delimiter)?;
        io::print_success(format!(
            "{} rows exported to {}.",
            report.rows.len(),
            path.display()
        ));
        return Ok(());
    }

    render_inventory(&report, &context.amounts());
    Ok(())
}

fn render_inventory(report: &InventoryReport, amounts: &AmountFormatter) {
    output_section(format!("Asset inventory as of {}", format_date(report.as_of)));
    if report.rows.is_empty() {
        io::print_warning("No assets match.");
        return;
    }
    let mut table = Table::new(vec![
        TableColumn::left("CODE"),
        TableColumn::left("LABEL").max(28),
        TableColumn::left("FAMILY"),
        TableColumn::left("LOC"),
        TableColumn::left("ACQUIRED"),
        TableColumn::right("VALUE"),
        TableColumn::right("DEPRECIATION"),
        TableColumn::right("NET BOOK VALUE"),
        TableColumn::left("STATUS"),
    ]);
    for row in &report.rows {
        table.push(vec![
            row.code.clone(),
            row.label.clone(),
            row.family_code.clone(),
            row.location_code.clone(),
            format_date(row.acquisition_date),
            amounts.number(row.original_value),
            amounts.number(row.accumulated_depreciation),
            amounts.number(row.net_book_value),
            row.status.to_string(),
        ]);
    }
    let table = table.with_footer(vec![
        format!("{} assets", report.rows.len()),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        amounts.number(report.total_original_value),
        amounts.number(report.total_accumulated_depreciation),
        amounts.number(report.total_net_book_value),
        String::new(),
    ]);
    println!("{}", table.render());
}
