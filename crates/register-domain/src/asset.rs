use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Floor rate applied by the declining-balance method, in percent.
pub const DECLINING_BALANCE_FLOOR_PERCENT: f64 = 35.0;

/// A fixed asset recorded in the register.
///
/// `accumulated_depreciation`, `net_book_value` and `status` are a stored
/// snapshot refreshed from the depreciation schedule; the schedule itself is
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Asset {
    pub id: Uuid,
    pub code: String,
    pub label: String,
    pub family_code: String,
    pub location_code: String,
    pub acquisition_date: NaiveDate,
    pub original_value: f64,
    pub method: DepreciationMethod,
    pub duration_years: u32,
    #[serde(default)]
    pub accumulated_depreciation: f64,
    pub net_book_value: f64,
    #[serde(default)]
    pub status: AssetStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Asset {
    /// Creates a new, not yet depreciated asset.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        code: impl Into<String>,
        label: impl Into<String>,
        family_code: impl Into<String>,
        location_code: impl Into<String>,
        acquisition_date: NaiveDate,
        original_value: f64,
        method: DepreciationMethod,
        duration_years: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            code: code.into(),
            label: label.into(),
            family_code: family_code.into(),
            location_code: location_code.into(),
            acquisition_date,
            original_value,
            method,
            duration_years,
            accumulated_depreciation: 0.0,
            net_book_value: original_value,
            status: AssetStatus::InService,
            created_at: now,
            updated_at: now,
        }
    }

    /// Annual depreciation rate in percent implied by the method and life.
    pub fn rate_percent(&self) -> f64 {
        if self.duration_years == 0 {
            return 0.0;
        }
        let straight = 100.0 / self.duration_years as f64;
        match self.method {
            DepreciationMethod::StraightLine => straight,
            DepreciationMethod::DecliningBalance => straight.max(DECLINING_BALANCE_FLOOR_PERCENT),
            DepreciationMethod::None => 0.0,
        }
    }

    pub fn is_fully_depreciated(&self) -> bool {
        self.status == AssetStatus::FullyDepreciated
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Identifiable for Asset {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Coded for Asset {
    fn code(&self) -> &str {
        &self.code
    }
}

impl Displayable for Asset {
    fn display_label(&self) -> String {
        format!("{} - {} ({})", self.code, self.label, self.family_code)
    }
}

/// Depreciation progress of an asset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum AssetStatus {
    #[default]
    #[serde(rename = "En cours")]
    InService,
    #[serde(rename = "Amorti")]
    FullyDepreciated,
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AssetStatus::InService => "In service",
            AssetStatus::FullyDepreciated => "Fully depreciated",
        };
        f.write_str(label)
    }
}
