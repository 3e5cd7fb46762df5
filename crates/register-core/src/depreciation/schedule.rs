use chrono::{Datelike, NaiveDate};
use register_domain::shift_years;

use super::{
    declining_balance::DecliningBalance, proration::prorate, round_cents,
    straight_line::StraightLine, AssetInput, ScheduleEntry, ScheduleMethod,
};

/// Average year length used to decide which years have been reached.
const DAYS_PER_YEAR: f64 = 365.25;

/// Position of a schedule year relative to the reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum YearPhase {
    Past,
    Current,
    Future,
}

impl YearPhase {
    fn classify(year_index: u32, years_elapsed: f64) -> Self {
        let index = year_index as f64;
        if index <= years_elapsed {
            YearPhase::Past
        } else if index <= years_elapsed + 1.0 {
            YearPhase::Current
        } else {
            YearPhase::Future
        }
    }
}

enum Strategy {
    StraightLine(StraightLine),
    DecliningBalance(DecliningBalance),
}

impl Strategy {
    fn for_input(input: &AssetInput) -> Self {
        match input.method() {
            ScheduleMethod::StraightLine => Strategy::StraightLine(StraightLine::with_life(
                input.original_value(),
                input.useful_life_years(),
            )),
            ScheduleMethod::DecliningBalance => {
                Strategy::DecliningBalance(DecliningBalance::with_life(input.useful_life_years()))
            }
        }
    }

    fn nominal(&self, year_index: u32, remaining_value: f64) -> f64 {
        match self {
            Strategy::StraightLine(strategy) => strategy.annual_amount(),
            Strategy::DecliningBalance(strategy) => strategy.amount(year_index, remaining_value),
        }
    }
}

/// Year-by-year depreciation table for `input` as seen on `as_of`.
///
/// Years already completed get their full nominal amount, the year in
/// progress is prorated by calendar days, later years are zero. Net book
/// value is floored at zero so float residue never shows as a negative value.
pub fn generate_schedule(input: &AssetInput, as_of: NaiveDate) -> Vec<ScheduleEntry> {
    let strategy = Strategy::for_input(input);
    let acquisition = input.acquisition_date();
    let original = input.original_value();
    let years_elapsed = (as_of - acquisition).num_days() as f64 / DAYS_PER_YEAR;

    let mut remaining = original;
    let mut cumulative = 0.0;
    let mut entries = Vec::with_capacity(input.useful_life_years() as usize);

    for year_index in 1..=input.useful_life_years() {
        let year_start = shift_years(acquisition, (year_index - 1) as i32);
        let actual = match YearPhase::classify(year_index, years_elapsed) {
            YearPhase::Past => strategy.nominal(year_index, remaining),
            YearPhase::Current => {
                strategy.nominal(year_index, remaining) * prorate(year_start, as_of)
            }
            YearPhase::Future => 0.0,
        };

        remaining -= actual;
        cumulative += actual;

        entries.push(ScheduleEntry {
            year: year_start.year(),
            annual_depreciation: round_cents(actual),
            cumulative_depreciation: round_cents(cumulative),
            net_book_value: round_cents((original - cumulative).max(0.0)),
        });
    }

    entries
}
