//! CSV export of the charges and inventory reports.

use std::{
    fs::{self, File},
    io::Write,
    path::Path,
};

use csv::WriterBuilder;
use register_core::{ChargesReport, InventoryReport};
use register_domain::AssetStatus;
use serde::Serialize;
use tracing::info;

use crate::core::errors::{RegisterError, Result};

/// Default file name for the yearly charges export.
pub const CHARGES_FILE_NAME: &str = "etat_dotations.csv";
/// Default file name for the inventory export.
pub const INVENTORY_FILE_NAME: &str = "inventaire_immobilisations.csv";

/// Delimiter used by the register exports unless configured otherwise.
pub const DEFAULT_DELIMITER: char = ';';

const CHARGE_HEADERS: [&str; 9] = [
    "code",
    "label",
    "family",
    "method",
    "rate_percent",
    "original_value",
    "annual_depreciation",
    "cumulative_depreciation",
    "net_book_value",
];

const INVENTORY_HEADERS: [&str; 11] = [
    "code",
    "label",
    "family",
    "location",
    "acquisition_date",
    "method",
    "duration_years",
    "original_value",
    "accumulated_depreciation",
    "net_book_value",
    "status",
];

#[derive(Serialize)]
struct ChargeCsvRow<'a> {
    code: &'a str,
    label: &'a str,
    family: &'a str,
    method: &'static str,
    rate_percent: String,
    original_value: String,
    annual_depreciation: String,
    cumulative_depreciation: String,
    net_book_value: String,
}

#[derive(Serialize)]
struct InventoryCsvRow<'a> {
    code: &'a str,
    label: &'a str,
    family: &'a str,
    location: &'a str,
    acquisition_date: String,
    method: &'static str,
    duration_years: u32,
    original_value: String,
    accumulated_depreciation: String,
    net_book_value: String,
    status: &'static str,
}

/// Writes the charges report as delimited text to `writer`.
pub fn write_charges_csv<W: Write>(writer: W, report: &ChargesReport, delimiter: char) -> Result<()> {
    let mut wrt = csv_writer(writer, delimiter)?;
    wrt.write_record(CHARGE_HEADERS)?;
    for row in &report.rows {
        wrt.serialize(ChargeCsvRow {
            code: &row.code,
            label: &row.label,
            family: &row.family_code,
            method: row.method.storage_code(),
            rate_percent: amount(row.rate_percent),
            original_value: amount(row.original_value),
            annual_depreciation: amount(row.annual_depreciation),
            cumulative_depreciation: amount(row.cumulative_depreciation),
            net_book_value: amount(row.net_book_value),
        })?;
    }
    wrt.flush()?;
    Ok(())
}

/// Writes the inventory report as delimited text to `writer`.
pub fn write_inventory_csv<W: Write>(
    writer: W,
    report: &InventoryReport,
    delimiter: char,
) -> Result<()> {
    let mut wrt = csv_writer(writer, delimiter)?;
    wrt.write_record(INVENTORY_HEADERS)?;
    for row in &report.rows {
        wrt.serialize(InventoryCsvRow {
            code: &row.code,
            label: &row.label,
            family: &row.family_code,
            location: &row.location_code,
            acquisition_date: row.acquisition_date.format("%Y-%m-%d").to_string(),
            method: row.method.storage_code(),
            duration_years: row.duration_years,
            original_value: amount(row.original_value),
            accumulated_depreciation: amount(row.accumulated_depreciation),
            net_book_value: amount(row.net_book_value),
            status: status_code(row.status),
        })?;
    }
    wrt.flush()?;
    Ok(())
}

pub fn export_charges(path: &Path, report: &ChargesReport, delimiter: char) -> Result<()> {
    let file = create_file(path)?;
    write_charges_csv(file, report, delimiter)?;
    info!(path = %path.display(), rows = report.rows.len(), "charges report exported");
    Ok(())
}

pub fn export_inventory(path: &Path, report: &InventoryReport, delimiter: char) -> Result<()> {
    let file = create_file(path)?;
    write_inventory_csv(file, report, delimiter)?;
    info!(path = %path.display(), rows = report.rows.len(), "inventory report exported");
    Ok(())
}

fn create_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}

/// Header rows are written explicitly so empty reports keep their columns.
fn csv_writer<W: Write>(writer: W, delimiter: char) -> Result<csv::Writer<W>> {
    Ok(WriterBuilder::new()
        .has_headers(false)
        .delimiter(delimiter_byte(delimiter)?)
        .from_writer(writer))
}

fn delimiter_byte(delimiter: char) -> Result<u8> {
    u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            RegisterError::InvalidInput(format!("CSV delimiter `{delimiter}` must be ASCII"))
        })
}

fn amount(value: f64) -> String {
    format!("{value:.2}")
}

fn status_code(status: AssetStatus) -> &'static str {
    match status {
        AssetStatus::InService => "En cours",
        AssetStatus::FullyDepreciated => "Amorti",
    }
}
