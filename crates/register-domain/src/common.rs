//! Shared traits, calendar helpers, and enums for register records.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exposes a stable identifier for entities stored in the register.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Records addressed by a short user-facing code (`MOB`, `SS`, `215400`...).
pub trait Coded {
    fn code(&self) -> &str;

    /// Case-insensitive comparison against a user supplied code.
    fn has_code(&self, candidate: &str) -> bool {
        self.code().trim().eq_ignore_ascii_case(candidate.trim())
    }
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Depreciation method recorded on families and assets.
///
/// Persisted with the register's historical codes (`LINEAIRE`, `DEGRESSIF`,
/// `AUCUN`) so existing data files stay readable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum DepreciationMethod {
    #[default]
    #[serde(rename = "LINEAIRE")]
    StraightLine,
    #[serde(rename = "DEGRESSIF")]
    DecliningBalance,
    /// Non-depreciable assets such as land.
    #[serde(rename = "AUCUN")]
    None,
}

impl DepreciationMethod {
    pub fn storage_code(self) -> &'static str {
        match self {
            DepreciationMethod::StraightLine => "LINEAIRE",
            DepreciationMethod::DecliningBalance => "DEGRESSIF",
            DepreciationMethod::None => "AUCUN",
        }
    }

    /// Single-letter marker used in compact listings.
    pub fn initial(self) -> char {
        match self {
            DepreciationMethod::StraightLine => 'L',
            DepreciationMethod::DecliningBalance => 'D',
            DepreciationMethod::None => 'A',
        }
    }

    pub fn is_depreciable(self) -> bool {
        !matches!(self, DepreciationMethod::None)
    }
}

impl fmt::Display for DepreciationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DepreciationMethod::StraightLine => "Straight-line",
            DepreciationMethod::DecliningBalance => "Declining-balance",
            DepreciationMethod::None => "None",
        };
        f.write_str(label)
    }
}

/// Error returned when a method code cannot be recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl fmt::Display for UnknownMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown depreciation method `{}` (expected LINEAIRE, DEGRESSIF or AUCUN)",
            self.0
        )
    }
}

impl std::error::Error for UnknownMethod {}

impl FromStr for DepreciationMethod {
    type Err = UnknownMethod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lineaire" | "linear" | "straight-line" | "straight_line" | "sl" | "l" => {
                Ok(DepreciationMethod::StraightLine)
            }
            "degressif" | "declining" | "declining-balance" | "declining_balance" | "db"
            | "d" => Ok(DepreciationMethod::DecliningBalance),
            "aucun" | "none" | "a" => Ok(DepreciationMethod::None),
            _ => Err(UnknownMethod(value.to_string())),
        }
    }
}

/// Shifts `date` by whole calendar years keeping month and day.
///
/// February 29 clamps to February 28 when the target year is not a leap year.
/// Saturates at the calendar bounds; use [`checked_shift_years`] to detect that.
pub fn shift_years(date: NaiveDate, years: i32) -> NaiveDate {
    checked_shift_years(date, years).unwrap_or(if years < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}

/// Like [`shift_years`], but `None` when the target year is not representable.
pub fn checked_shift_years(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    let year = date.year().checked_add(years)?;
    if year < NaiveDate::MIN.year() || year > NaiveDate::MAX.year() {
        return None;
    }
    let month = date.month();
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Number of days in the given month of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    if month == 12 {
        return 31;
    }
    match NaiveDate::from_ymd_opt(year, month + 1, 1) {
        Some(first_next) => (first_next - Duration::days(1)).day(),
        None => 28,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn shift_years_keeps_month_and_day() {
        assert_eq!(shift_years(date(2020, 3, 15), 2), date(2022, 3, 15));
        assert_eq!(shift_years(date(2020, 3, 15), 0), date(2020, 3, 15));
    }

    #[test]
    fn shift_years_past_calendar_range() {
        assert_eq!(checked_shift_years(date(2020, 1, 1), 300_000), None);
        assert_eq!(checked_shift_years(date(2020, 1, 1), i32::MAX), None);
        assert_eq!(shift_years(date(2020, 1, 1), 300_000), NaiveDate::MAX);
        assert_eq!(
            checked_shift_years(date(2020, 1, 1), 10),
            Some(date(2030, 1, 1))
        );
    }

    #[test]
    fn shift_years_clamps_leap_day() {
        assert_eq!(shift_years(date(2024, 2, 29), 1), date(2025, 2, 28));
        assert_eq!(shift_years(date(2024, 2, 29), 4), date(2028, 2, 29));
    }

    #[test]
    fn method_parses_storage_codes_and_aliases() {
        assert_eq!(
            "LINEAIRE".parse::<DepreciationMethod>(),
            Ok(DepreciationMethod::StraightLine)
        );
        assert_eq!(
            "degressif".parse::<DepreciationMethod>(),
            Ok(DepreciationMethod::DecliningBalance)
        );
        assert_eq!(
            "none".parse::<DepreciationMethod>(),
            Ok(DepreciationMethod::None)
        );
        assert!("weekly".parse::<DepreciationMethod>().is_err());
    }

    #[test]
    fn method_serializes_with_storage_code() {
        let json = serde_json::to_string(&DepreciationMethod::DecliningBalance).unwrap();
        assert_eq!(json, "\"DEGRESSIF\"");
    }
}
