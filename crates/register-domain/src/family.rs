use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Asset family: a category of fixed assets sharing a default depreciation plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Family {
    pub id: Uuid,
    pub code: String,
    pub label: String,
    #[serde(default)]
    pub method: DepreciationMethod,
    pub duration_years: u32,
    #[serde(default)]
    pub duration_months: u32,
    pub created_at: DateTime<Utc>,
}

impl Family {
    /// Creates a family with a default method and useful life in years.
    pub fn new(
        code: impl Into<String>,
        label: impl Into<String>,
        method: DepreciationMethod,
        duration_years: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            code: code.into(),
            label: label.into(),
            method,
            duration_years,
            duration_months: 0,
            created_at: Utc::now(),
        }
    }
}

impl Identifiable for Family {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Coded for Family {
    fn code(&self) -> &str {
        &self.code
    }
}

impl Displayable for Family {
    fn display_label(&self) -> String {
        format!("{} - {}", self.code, self.label)
    }
}
