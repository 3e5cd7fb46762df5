//! Depreciation schedule calculator.
//!
//! Everything in this module is a pure function of its arguments: the
//! reference date is always passed in, nothing is cached between calls, and
//! the running balances live on the stack of a single [`generate_schedule`]
//! invocation. Schedules are safe to compute concurrently from any thread.
//!
//! Amounts are carried unrounded from year to year; only the fields of each
//! [`ScheduleEntry`] are rounded (see [`round_cents`]).

pub mod declining_balance;
pub mod proration;
pub mod schedule;
pub mod straight_line;

use std::fmt;

use chrono::NaiveDate;
use register_domain::{checked_shift_years, Asset, DepreciationMethod};
use serde::{Deserialize, Serialize};

use crate::CoreError;

pub use declining_balance::{DecliningBalance, DECLINING_FLOOR_RATE};
pub use proration::prorate;
pub use schedule::generate_schedule;
pub use straight_line::StraightLine;

/// Methods the calculator knows how to schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScheduleMethod {
    StraightLine,
    DecliningBalance,
}

impl fmt::Display for ScheduleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScheduleMethod::StraightLine => "Straight-line",
            ScheduleMethod::DecliningBalance => "Declining-balance",
        };
        f.write_str(label)
    }
}

impl TryFrom<DepreciationMethod> for ScheduleMethod {
    type Error = CoreError;

    fn try_from(method: DepreciationMethod) -> Result<Self, Self::Error> {
        match method {
            DepreciationMethod::StraightLine => Ok(ScheduleMethod::StraightLine),
            DepreciationMethod::DecliningBalance => Ok(ScheduleMethod::DecliningBalance),
            DepreciationMethod::None => Err(CoreError::InvalidInput(
                "non-depreciable assets have no depreciation schedule".into(),
            )),
        }
    }
}

/// Validated calculator input. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetInput {
    acquisition_date: NaiveDate,
    original_value: f64,
    method: ScheduleMethod,
    useful_life_years: u32,
}

impl AssetInput {
    pub fn new(
        acquisition_date: NaiveDate,
        original_value: f64,
        method: ScheduleMethod,
        useful_life_years: u32,
    ) -> Result<Self, CoreError> {
        if !original_value.is_finite() || original_value < 0.0 {
            return Err(CoreError::InvalidInput(format!(
                "original value must be a non-negative amount, got {original_value}"
            )));
        }
        if useful_life_years == 0 {
            return Err(CoreError::InvalidInput(
                "useful life must be at least one year".into(),
            ));
        }
        let end_of_life = i32::try_from(useful_life_years)
            .ok()
            .and_then(|years| checked_shift_years(acquisition_date, years));
        if end_of_life.is_none() {
            return Err(CoreError::InvalidInput(format!(
                "useful life of {useful_life_years} years from {acquisition_date} ends past the supported calendar"
            )));
        }
        Ok(Self {
            acquisition_date,
            original_value,
            method,
            useful_life_years,
        })
    }

    /// Builds an input from raw field values as they arrive from a form or file.
    pub fn parse(
        acquisition_date: Option<&str>,
        original_value: f64,
        method: &str,
        useful_life_years: i64,
    ) -> Result<Self, CoreError> {
        let raw_date = acquisition_date
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| CoreError::InvalidInput("acquisition date is required".into()))?;
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|_| {
            CoreError::InvalidInput(format!(
                "acquisition date `{raw_date}` is not a YYYY-MM-DD date"
            ))
        })?;
        let method = method
            .parse::<DepreciationMethod>()
            .map_err(|err| CoreError::InvalidInput(err.to_string()))?;
        let life = u32::try_from(useful_life_years).map_err(|_| {
            CoreError::InvalidInput(format!(
                "useful life must be a positive number of years, got {useful_life_years}"
            ))
        })?;
        Self::new(date, original_value, ScheduleMethod::try_from(method)?, life)
    }

    pub fn acquisition_date(&self) -> NaiveDate {
        self.acquisition_date
    }

    pub fn original_value(&self) -> f64 {
        self.original_value
    }

    pub fn method(&self) -> ScheduleMethod {
        self.method
    }

    pub fn useful_life_years(&self) -> u32 {
        self.useful_life_years
    }
}

impl TryFrom<&Asset> for AssetInput {
    type Error = CoreError;

    fn try_from(asset: &Asset) -> Result<Self, Self::Error> {
        let method = ScheduleMethod::try_from(asset.method).map_err(|_| {
            CoreError::InvalidInput(format!(
                "asset `{}` is not depreciable (method {})",
                asset.code,
                asset.method.storage_code()
            ))
        })?;
        Self::new(
            asset.acquisition_date,
            asset.original_value,
            method,
            asset.duration_years,
        )
    }
}

/// One row of a depreciation schedule. Amounts are rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub year: i32,
    pub annual_depreciation: f64,
    pub cumulative_depreciation: f64,
    pub net_book_value: f64,
}

/// Rounds to two decimals, halves away from zero. Negative zero is normalised.
pub fn round_cents(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_zero_life() {
        let err = AssetInput::new(date(2020, 1, 1), 100.0, ScheduleMethod::StraightLine, 0)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn rejects_life_ending_past_calendar_range() {
        let err = AssetInput::new(date(2020, 1, 1), 100.0, ScheduleMethod::StraightLine, 300_000)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
        assert!(
            AssetInput::new(date(2020, 1, 1), 100.0, ScheduleMethod::StraightLine, u32::MAX)
                .is_err()
        );
        assert!(AssetInput::new(date(2020, 1, 1), 100.0, ScheduleMethod::StraightLine, 200).is_ok());
    }

    #[test]
    fn rejects_negative_or_nan_value() {
        assert!(AssetInput::new(date(2020, 1, 1), -1.0, ScheduleMethod::StraightLine, 3).is_err());
        assert!(
            AssetInput::new(date(2020, 1, 1), f64::NAN, ScheduleMethod::StraightLine, 3).is_err()
        );
    }

    #[test]
    fn parse_maps_stored_method_codes() {
        let input = AssetInput::parse(Some("2020-03-15"), 15000.0, "DEGRESSIF", 5).unwrap();
        assert_eq!(input.method(), ScheduleMethod::DecliningBalance);
        assert_eq!(input.acquisition_date(), date(2020, 3, 15));

        let input = AssetInput::parse(Some("1999-01-01"), 446.68, "LINEAIRE", 3).unwrap();
        assert_eq!(input.method(), ScheduleMethod::StraightLine);
    }

    #[test]
    fn parse_rejects_bad_fields() {
        assert!(AssetInput::parse(None, 10.0, "LINEAIRE", 3).is_err());
        assert!(AssetInput::parse(Some("  "), 10.0, "LINEAIRE", 3).is_err());
        assert!(AssetInput::parse(Some("15/03/2020"), 10.0, "LINEAIRE", 3).is_err());
        assert!(AssetInput::parse(Some("2020-03-15"), 10.0, "AUCUN", 3).is_err());
        assert!(AssetInput::parse(Some("2020-03-15"), 10.0, "monthly", 3).is_err());
        assert!(AssetInput::parse(Some("2020-03-15"), 10.0, "LINEAIRE", -2).is_err());
    }

    #[test]
    fn round_cents_halves_away_from_zero() {
        assert_eq!(round_cents(148.893_333), 148.89);
        assert_eq!(round_cents(0.125), 0.13);
        assert_eq!(round_cents(-0.125), -0.13);
        assert_eq!(round_cents(-0.001), 0.0);
        assert!(round_cents(-0.001).is_sign_positive());
    }
}
