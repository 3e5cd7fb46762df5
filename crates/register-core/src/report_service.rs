//! Charges and inventory reports computed from schedules.

use chrono::NaiveDate;
use register_domain::{AssetStatus, DepreciationMethod, Register};
use serde::Serialize;

use crate::{
    asset_service::{AssetFilter, AssetService},
    depreciation::{generate_schedule, round_cents, AssetInput},
    CoreError,
};

/// One asset line of the yearly depreciation charges report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargeRow {
    pub code: String,
    pub label: String,
    pub family_code: String,
    pub method: DepreciationMethod,
    pub rate_percent: f64,
    pub original_value: f64,
    pub annual_depreciation: f64,
    pub cumulative_depreciation: f64,
    pub net_book_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargesReport {
    pub year: i32,
    pub as_of: NaiveDate,
    pub rows: Vec<ChargeRow>,
    pub total_original_value: f64,
    pub total_depreciation: f64,
    pub total_net_book_value: f64,
}

/// One asset line of the inventory report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryRow {
    pub code: String,
    pub label: String,
    pub family_code: String,
    pub location_code: String,
    pub acquisition_date: NaiveDate,
    pub method: DepreciationMethod,
    pub duration_years: u32,
    pub original_value: f64,
    pub accumulated_depreciation: f64,
    pub net_book_value: f64,
    pub status: AssetStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryReport {
    pub as_of: NaiveDate,
    pub rows: Vec<InventoryRow>,
    pub total_original_value: f64,
    pub total_accumulated_depreciation: f64,
    pub total_net_book_value: f64,
}

pub struct ReportService;

impl ReportService {
    /// Depreciation charged in the schedule year `year`, as seen on `as_of`.
    ///
    /// Only depreciable assets whose useful life covers `year` are listed.
    pub fn charges_for_year(
        register: &Register,
        year: i32,
        as_of: NaiveDate,
    ) -> Result<ChargesReport, CoreError> {
        let mut rows = Vec::new();
        for asset in AssetService::list(register) {
            if !asset.method.is_depreciable() {
                continue;
            }
            let input = AssetInput::try_from(asset)?;
            let schedule = generate_schedule(&input, as_of);
            if let Some(entry) = schedule.iter().find(|entry| entry.year == year) {
                rows.push(ChargeRow {
                    code: asset.code.clone(),
                    label: asset.label.clone(),
                    family_code: asset.family_code.clone(),
                    method: asset.method,
                    rate_percent: round_cents(asset.rate_percent()),
                    original_value: asset.original_value,
                    annual_depreciation: entry.annual_depreciation,
                    cumulative_depreciation: entry.cumulative_depreciation,
                    net_book_value: entry.net_book_value,
                });
            }
        }

        Ok(ChargesReport {
            year,
            as_of,
            total_original_value: round_cents(rows.iter().map(|row| row.original_value).sum()),
            total_depreciation: round_cents(rows.iter().map(|row| row.annual_depreciation).sum()),
            total_net_book_value: round_cents(rows.iter().map(|row| row.net_book_value).sum()),
            rows,
        })
    }

    /// Every asset matching `filter`, valued on `as_of`.
    ///
    /// The status criterion applies to the status on `as_of`, not to the
    /// stored snapshot.
    pub fn inventory(
        register: &Register,
        filter: &AssetFilter,
        as_of: NaiveDate,
    ) -> Result<InventoryReport, CoreError> {
        let mut rows = Vec::new();
        for asset in AssetService::list(register) {
            if !filter.matches_placement(asset) {
                continue;
            }
            let valuation = AssetService::valuation(asset, as_of)?;
            if !filter.matches_status(valuation.status) {
                continue;
            }
            rows.push(InventoryRow {
                code: asset.code.clone(),
                label: asset.label.clone(),
                family_code: asset.family_code.clone(),
                location_code: asset.location_code.clone(),
                acquisition_date: asset.acquisition_date,
                method: asset.method,
                duration_years: asset.duration_years,
                original_value: asset.original_value,
                accumulated_depreciation: valuation.accumulated_depreciation,
                net_book_value: valuation.net_book_value,
                status: valuation.status,
            });
        }

        Ok(InventoryReport {
            as_of,
            total_original_value: round_cents(rows.iter().map(|row| row.original_value).sum()),
            total_accumulated_depreciation: round_cents(
                rows.iter().map(|row| row.accumulated_depreciation).sum(),
            ),
            total_net_book_value: round_cents(rows.iter().map(|row| row.net_book_value).sum()),
            rows,
        })
    }
}
