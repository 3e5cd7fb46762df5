use register_core::{public_api::api_asset_schedule_json, round_cents, AssetService, CoreError};

use crate::cli::args::take_flag;
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::format::format_date;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::cli::commands::usage_error;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "schedule",
            "Show the depreciation schedule of an asset",
            "schedule <code> [as-of] [--json]",
            cmd_schedule,
        ),
        CommandEntry::new(
            "refresh",
            "Recompute stored net book values",
            "refresh [as-of]",
            cmd_refresh,
        ),
    ]
}

fn cmd_schedule(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (args, as_json) = take_flag(args, "--json");
    let code = args
        .first()
        .copied()
        .ok_or_else(|| usage_error("schedule <code> [as-of] [--json]"))?;
    let as_of = context.as_of(args.get(1).copied())?;

    if as_json {
        let json = context.with_register(|register| Ok(api_asset_schedule_json(register, code, as_of)?))?;
        println!("{json}");
        return Ok(());
    }

    let amounts = context.amounts();
    context.with_register(|register| {
        let asset = register
            .asset(code)
            .ok_or_else(|| CoreError::AssetNotFound(code.to_string()))?;
        let schedule = AssetService::schedule(register, code, as_of)?;

        output_section(format!(
            "{} - {} ({}, {} years, {})",
            asset.code,
            asset.label,
            asset.method,
            asset.duration_years,
            amounts.percent(asset.rate_percent())
        ));
        io::print_info(format!(
            "Acquired {} for {}, as of {}",
            format_date(asset.acquisition_date),
            amounts.money(asset.original_value),
            format_date(as_of)
        ));

        let mut table = Table::new(vec![
            TableColumn::left("YEAR"),
            TableColumn::right("DEPRECIATION"),
            TableColumn::right("CUMULATIVE"),
            TableColumn::right("NET BOOK VALUE"),
        ]);
        for entry in &schedule {
            table.push(vec![
                entry.year.to_string(),
                amounts.number(entry.annual_depreciation),
                amounts.number(entry.cumulative_depreciation),
                amounts.number(entry.net_book_value),
            ]);
        }
        let total: f64 = schedule.iter().map(|entry| entry.annual_depreciation).sum();
        let table = table.with_footer(vec![
            "TOTAL".into(),
            amounts.number(round_cents(total)),
            String::new(),
            String::new(),
        ]);
        println!("{}", table.render());
        Ok(())
    })
}

fn cmd_refresh(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let as_of = context.as_of(args.first().copied())?;
    let summary =
        context.with_register_mut(|register| Ok(AssetService::refresh_valuations(register, as_of)?))?;
    io::print_success(format!(
        "{} assets revalued as of {} ({} fully depreciated).",
        summary.refreshed,
        format_date(as_of),
        summary.fully_depreciated
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli::core::process_script;
    use register_domain::AssetStatus;
    use tempfile::tempdir;

    #[test]
    fn refresh_uses_clock_date_by_default() {
        let dir = tempdir().unwrap();
        let context = process_script(
            dir.path(),
            &["register new Plant", "register seed", "refresh"],
        )
        .unwrap();

        context
            .with_register(|register| {
                let vehicle = register.asset("218200").unwrap();
                // Three full years by 2024-06-30 plus 20 days of the fourth.
                assert!((vehicle.accumulated_depreciation - 19_092.47).abs() < 0.01);
                assert_eq!(vehicle.status, AssetStatus::InService);
                let chairs = register.asset("CHF02").unwrap();
                assert_eq!(chairs.status, AssetStatus::FullyDepreciated);
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn schedules_render_for_depreciable_assets_only() {
        let dir = tempdir().unwrap();
        process_script(
            dir.path(),
            &[
                "register new Plant",
                "register seed",
                "schedule CHF02 2030-01-01",
                "schedule 218200 --json",
            ],
        )
        .unwrap();

        let err = process_script(
            dir.path(),
            &[
                "register new Plant",
                "register seed",
                "asset add code=LAND label=TERRAIN family=TER location=SS date=2020-01-01 value=90000",
                "schedule LAND",
            ],
        )
        .err()
        .expect("land has no schedule");
        assert!(err.to_string().contains("Invalid input"), "unexpected: {err}");
    }
}
