//! Stable, public-facing helpers that wrap the internal service layer.
//!
//! Frontends (the shell, exports) rely on this module for the external
//! representation of schedules instead of reaching into the calculator.

use chrono::NaiveDate;
use register_domain::Register;
use serde::{Deserialize, Serialize};

use crate::{
    asset_service::AssetService,
    depreciation::{generate_schedule, AssetInput, ScheduleEntry},
    CoreError,
};

/// Schedule row under the field names used by exported documents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApiScheduleRow {
    #[serde(rename = "annee")]
    pub year: i32,
    #[serde(rename = "dotation")]
    pub annual_depreciation: f64,
    #[serde(rename = "cumul")]
    pub cumulative_depreciation: f64,
    #[serde(rename = "valeurNette")]
    pub net_book_value: f64,
}

impl From<ScheduleEntry> for ApiScheduleRow {
    fn from(entry: ScheduleEntry) -> Self {
        Self {
            year: entry.year,
            annual_depreciation: entry.annual_depreciation,
            cumulative_depreciation: entry.cumulative_depreciation,
            net_book_value: entry.net_book_value,
        }
    }
}

/// Computes a schedule from raw stored fields.
pub fn api_schedule(
    acquisition_date: Option<&str>,
    original_value: f64,
    method_code: &str,
    duration_years: i64,
    as_of: NaiveDate,
) -> Result<Vec<ApiScheduleRow>, CoreError> {
    let input = AssetInput::parse(acquisition_date, original_value, method_code, duration_years)?;
    Ok(generate_schedule(&input, as_of)
        .into_iter()
        .map(ApiScheduleRow::from)
        .collect())
}

/// Schedule of a registered asset in its exported representation.
pub fn api_asset_schedule(
    register: &Register,
    code: &str,
    as_of: NaiveDate,
) -> Result<Vec<ApiScheduleRow>, CoreError> {
    Ok(AssetService::schedule(register, code, as_of)?
        .into_iter()
        .map(ApiScheduleRow::from)
        .collect())
}

/// Pretty JSON array of the asset's schedule rows.
pub fn api_asset_schedule_json(
    register: &Register,
    code: &str,
    as_of: NaiveDate,
) -> Result<String, CoreError> {
    let rows = api_asset_schedule(register, code, as_of)?;
    serde_json::to_string_pretty(&rows).map_err(|err| CoreError::Serde(err.to_string()))
}
